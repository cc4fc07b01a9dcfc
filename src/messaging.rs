//! Message boundary between the classifier and the folder materializer.
//!
//! Requests are JSON objects tagged by `action`:
//!
//! ```json
//! {"action": "CREATE_BOOKMARK",
//!  "data": {"url": "...", "title": "...", "classification": {"folderPath": [...], "tags": [...]}}}
//! ```
//!
//! and every request gets a `{success, bookmark?, error?}` response.

use crate::bookmarks::{BookmarkNode, FolderMaterializer};
use crate::classifier::ClassificationResult;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const CREATE_BOOKMARK: &str = "CREATE_BOOKMARK";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "data")]
pub enum BookmarkMessage {
    #[serde(rename = "CREATE_BOOKMARK")]
    CreateBookmark(CreateBookmark),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateBookmark {
    pub url: String,
    pub title: String,
    pub classification: ClassificationResult,
}

impl BookmarkMessage {
    pub fn create_bookmark(
        url: impl Into<String>,
        title: impl Into<String>,
        classification: ClassificationResult,
    ) -> Self {
        BookmarkMessage::CreateBookmark(CreateBookmark {
            url: url.into(),
            title: title.into(),
            classification,
        })
    }

    pub fn to_value(&self) -> crate::Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bookmark: Option<BookmarkNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BookmarkResponse {
    pub fn ok(bookmark: BookmarkNode) -> Self {
        Self {
            success: true,
            bookmark: Some(bookmark),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            bookmark: None,
            error: Some(error.into()),
        }
    }
}

/// Dispatches one raw message to the materializer. Never fails: every problem is
/// reported in the response.
pub async fn handle_message(materializer: &FolderMaterializer, request: &Value) -> BookmarkResponse {
    let action = request.get("action").and_then(Value::as_str).unwrap_or("");
    tracing::debug!(action, "handling message");
    if action != CREATE_BOOKMARK {
        tracing::warn!(action, "unknown action");
        return BookmarkResponse::failure("Unknown action");
    }

    let message: BookmarkMessage = match serde_json::from_value(request.clone()) {
        Ok(message) => message,
        Err(e) => return BookmarkResponse::failure(format!("Invalid message: {}", e)),
    };

    match message {
        BookmarkMessage::CreateBookmark(data) => {
            match materializer
                .create_bookmark(&data.url, &data.title, &data.classification.folder_path)
                .await
            {
                Ok(bookmark) => BookmarkResponse::ok(bookmark),
                Err(e) => {
                    tracing::error!(error = %e, "failed to create bookmark");
                    BookmarkResponse::failure(e.to_string())
                }
            }
        }
    }
}
