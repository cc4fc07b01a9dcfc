//! Parsing and validation of the model's classification answer.

use crate::{Error, Result};
use jsonschema::{Draft, JSONSchema};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Folder path and tags inferred for one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    #[serde(rename = "folderPath")]
    pub folder_path: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Response body of `POST /chat/completions`, reduced to what we read.
#[derive(Debug, Deserialize)]
pub(crate) struct ChatCompletion {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

impl ChatCompletion {
    /// Content of the first choice; empty content is treated as missing.
    pub(crate) fn into_content(self) -> Result<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| Error::malformed("no response content received from AI provider"))
    }
}

static CODE_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n?```(?:json)?\n?").expect("code fence pattern is valid"));

static CLASSIFICATION_SCHEMA: Lazy<JSONSchema> = Lazy::new(|| {
    let schema = serde_json::json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "type": "object",
        "required": ["folderPath"],
        "properties": {
            "folderPath": {
                "type": "array",
                "minItems": 1,
                "items": { "type": "string" }
            },
            "tags": {
                "type": ["array", "null"],
                "items": { "type": "string" }
            }
        }
    });
    JSONSchema::options()
        .with_draft(Draft::Draft7)
        .compile(&schema)
        .expect("classification schema is valid")
});

/// Removes Markdown code fences (```` ```json ```` / ```` ``` ````) around the answer.
pub fn strip_code_fences(content: &str) -> String {
    CODE_FENCE.replace_all(content, "").trim().to_string()
}

/// Parses the model answer into a [`ClassificationResult`].
///
/// The answer must be a JSON object with a non-empty string array `folderPath`;
/// `tags`, when present, must be a string array. The folder path is truncated to
/// `max_depth` entries.
pub fn parse_classification(content: &str, max_depth: usize) -> Result<ClassificationResult> {
    let cleaned = strip_code_fences(content);
    let value: serde_json::Value = serde_json::from_str(&cleaned)
        .map_err(|e| Error::malformed(format!("response is not valid JSON: {}", e)))?;

    if let Err(errors) = CLASSIFICATION_SCHEMA.validate(&value) {
        let details: Vec<String> = errors
            .map(|e| format!("{} at '{}'", e, e.instance_path))
            .collect();
        return Err(Error::malformed(format!(
            "invalid classification: {}",
            details.join("; ")
        )));
    }

    let raw: RawClassification = serde_json::from_value(value)
        .map_err(|e| Error::malformed(format!("invalid classification: {}", e)))?;
    let mut folder_path = raw.folder_path;
    folder_path.truncate(max_depth);

    Ok(ClassificationResult {
        folder_path,
        tags: raw.tags.unwrap_or_default(),
    })
}

#[derive(Deserialize)]
struct RawClassification {
    #[serde(rename = "folderPath")]
    folder_path: Vec<String>,
    #[serde(default)]
    tags: Option<Vec<String>>,
}
