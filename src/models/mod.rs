//! Dynamic model catalog of the OpenRouter provider.
//!
//! ## Key Components
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`ModelCatalog`] | Fetches the model list, caches it in the local scope with a TTL, serves stale data when a refetch fails |
//! | [`ModelCacheEnvelope`] | The cached record: one fetch worth of models plus its timestamp |
//! | [`select_default`] | Picks a known-good model out of a catalog |
//!
//! ## Cache lifecycle
//!
//! The envelope is written on the first successful fetch and replaced wholesale on every
//! later one; it is never merged. Within the TTL it is served without any network call.
//! After the TTL a refetch is attempted, and if that fails the expired envelope is
//! still served.

mod catalog;
mod selector;

pub use catalog::ModelCatalog;
pub use selector::{select_default, PREFERRED_MODELS};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Architecture {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokenizer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modality: Option<String>,
}

/// One entry of the catalog. `id` is always vendor qualified (`vendor/model`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    pub id: String,
    #[serde(rename = "name")]
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_length: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub architecture: Option<Architecture>,
}

impl ModelDescriptor {
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            display_name: id.clone(),
            id,
            description: None,
            context_length: None,
            architecture: None,
        }
    }

    /// `vendor` part of `vendor/model`.
    pub fn vendor(&self) -> Option<&str> {
        self.id.split_once('/').map(|(vendor, _)| vendor)
    }

    /// Projects one raw `data[]` entry of the models endpoint. Entries without a
    /// string id, or whose id is not vendor qualified, yield `None`. Optional fields
    /// of an unexpected type are dropped, never the entry.
    pub(crate) fn from_wire(value: Value) -> Option<Self> {
        let id = value.get("id").and_then(Value::as_str)?;
        if !id.contains('/') {
            return None;
        }
        let text = |field: &str| {
            value
                .get(field)
                .and_then(Value::as_str)
                .map(str::to_string)
        };
        Some(Self {
            id: id.to_string(),
            display_name: text("name")
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| id.to_string()),
            description: text("description"),
            context_length: value.get("context_length").and_then(wire_context_length),
            architecture: value
                .get("architecture")
                .and_then(|a| serde_json::from_value(a.clone()).ok()),
        })
    }
}

// Some providers report integral token counts as floats.
fn wire_context_length(value: &Value) -> Option<u64> {
    value.as_u64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.is_finite() && *f >= 0.0 && f.fract() == 0.0)
            .map(|f| f as u64)
    })
}

/// The cached catalog as stored under the local scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelCacheEnvelope {
    #[serde(rename = "updatedAt")]
    pub fetched_at_epoch_millis: u64,
    pub models: Vec<ModelDescriptor>,
}

impl ModelCacheEnvelope {
    pub fn new(models: Vec<ModelDescriptor>, fetched_at_epoch_millis: u64) -> Self {
        Self {
            fetched_at_epoch_millis,
            models,
        }
    }

    /// Envelope stamped with the current time.
    pub fn now(models: Vec<ModelDescriptor>) -> Self {
        Self::new(models, now_millis())
    }

    pub fn age_millis(&self, now: u64) -> u64 {
        now.saturating_sub(self.fetched_at_epoch_millis)
    }

    /// Fresh means younger than `ttl_millis` and holding at least one model.
    pub fn is_fresh(&self, now: u64, ttl_millis: u64) -> bool {
        !self.models.is_empty() && self.age_millis(now) < ttl_millis
    }
}

pub(crate) fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_wire_requires_vendor_qualified_id() {
        assert!(ModelDescriptor::from_wire(json!({"id": "not-vendor-qualified"})).is_none());
        assert!(ModelDescriptor::from_wire(json!({"id": 42})).is_none());
        assert!(ModelDescriptor::from_wire(json!({"name": "no id"})).is_none());

        let model = ModelDescriptor::from_wire(json!({"id": "openai/gpt-4o-mini"})).unwrap();
        assert_eq!(model.id, "openai/gpt-4o-mini");
        assert_eq!(model.display_name, "openai/gpt-4o-mini");
        assert_eq!(model.vendor(), Some("openai"));
    }

    #[test]
    fn test_from_wire_keeps_metadata() {
        let model = ModelDescriptor::from_wire(json!({
            "id": "anthropic/claude-3-haiku",
            "name": "Anthropic: Claude 3 Haiku",
            "description": "fast",
            "context_length": 200000,
            "architecture": {"tokenizer": "Claude", "modality": "text+image->text", "instruct_type": null},
            "pricing": {"prompt": "0.00000025"}
        }))
        .unwrap();
        assert_eq!(model.display_name, "Anthropic: Claude 3 Haiku");
        assert_eq!(model.context_length, Some(200_000));
        assert_eq!(
            model.architecture.unwrap().tokenizer.as_deref(),
            Some("Claude")
        );
    }

    #[test]
    fn test_from_wire_tolerates_odd_optional_fields() {
        let float_ctx =
            ModelDescriptor::from_wire(json!({"id": "a/b", "context_length": 8192.0})).unwrap();
        assert_eq!(float_ctx.context_length, Some(8192));

        let numeric_name = ModelDescriptor::from_wire(json!({"id": "a/c", "name": 7})).unwrap();
        assert_eq!(numeric_name.display_name, "a/c");

        let odd_arch = ModelDescriptor::from_wire(json!({
            "id": "a/d",
            "architecture": {"tokenizer": ["x"]}
        }))
        .unwrap();
        assert_eq!(odd_arch.architecture, None);

        let negative =
            ModelDescriptor::from_wire(json!({"id": "a/e", "context_length": -1})).unwrap();
        assert_eq!(negative.context_length, None);

        let null_desc =
            ModelDescriptor::from_wire(json!({"id": "a/f", "description": null})).unwrap();
        assert_eq!(null_desc.description, None);
    }

    #[test]
    fn test_envelope_freshness() {
        let envelope = ModelCacheEnvelope::new(vec![ModelDescriptor::new("a/b")], 1_000);
        let ttl = 15 * 60 * 1000;
        assert!(envelope.is_fresh(1_000 + ttl - 1, ttl));
        assert!(!envelope.is_fresh(1_000 + ttl, ttl));

        let empty = ModelCacheEnvelope::new(Vec::new(), 1_000);
        assert!(!empty.is_fresh(1_000, ttl));
    }

    #[test]
    fn test_envelope_storage_shape() {
        let envelope = ModelCacheEnvelope::new(vec![ModelDescriptor::new("a/b")], 5);
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value["updatedAt"], 5);
        assert_eq!(value["models"][0]["name"], "a/b");
    }
}
