//! Mock HTTP server setup for integration tests
#![allow(dead_code)]

use bookmark_classifier::events::InMemoryEventSink;
use bookmark_classifier::storage::{keys, MemoryStore, Storage, StorageScope};
use bookmark_classifier::{Classifier, ClassifierConfig, ModelCacheEnvelope, ModelDescriptor};
use mockito::{Matcher, Mock, Server, ServerGuard};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Test fixture bundling a mock server, shared storage and an event recorder
pub struct MockServerFixture {
    pub server: ServerGuard,
    pub base_url: String,
    pub store: MemoryStore,
    pub events: Arc<InMemoryEventSink>,
}

impl MockServerFixture {
    pub async fn new() -> Self {
        let server = Server::new_async().await;
        let base_url = server.url();
        Self {
            server,
            base_url,
            store: MemoryStore::new(),
            events: Arc::new(InMemoryEventSink::default()),
        }
    }

    pub fn models_url(&self) -> String {
        format!("{}/models", self.base_url)
    }

    pub fn storage(&self) -> Storage {
        Storage::new(self.store.clone())
    }

    /// Classifier with every provider and the catalog pointed at the mock server
    pub fn classifier(&self) -> Classifier {
        Classifier::builder()
            .config(ClassifierConfig::default())
            .base_url_override(&self.base_url)
            .models_url(self.models_url())
            .storage(self.storage())
            .event_sink(self.events.clone())
            .build()
            .expect("Failed to build classifier")
    }

    /// Same storage, but requests go to a port nothing listens on
    pub fn unreachable_classifier(&self) -> Classifier {
        Classifier::builder()
            .config(ClassifierConfig::default())
            .base_url_override("http://127.0.0.1:9")
            .models_url("http://127.0.0.1:9/models")
            .http_timeout(Duration::from_secs(2))
            .storage(self.storage())
            .event_sink(self.events.clone())
            .build()
            .expect("Failed to build classifier")
    }

    /// Mock `GET /models` returning the given model ids
    pub async fn mock_models(&mut self, ids: &[&str], hits: usize) -> Mock {
        let data: Vec<serde_json::Value> = ids
            .iter()
            .map(|id| serde_json::json!({"id": id, "name": id.to_uppercase()}))
            .collect();
        let body = serde_json::json!({ "data": data }).to_string();
        self.server
            .mock("GET", "/models")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
            .expect(hits)
            .create_async()
            .await
    }

    /// Mock `GET /models` failing with `status`
    pub async fn mock_models_error(&mut self, status: usize, hits: usize) -> Mock {
        self.server
            .mock("GET", "/models")
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error":{"message":"catalog unavailable"}}"#)
            .expect(hits)
            .create_async()
            .await
    }

    /// Mock a successful completion for requests asking for `model`
    pub async fn mock_completion(&mut self, model: &str, content: &str, hits: usize) -> Mock {
        let body = serde_json::json!({
            "id": "chatcmpl-123",
            "object": "chat.completion",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": content},
                "finish_reason": "stop"
            }]
        })
        .to_string();
        self.server
            .mock("POST", "/chat/completions")
            .match_body(Matcher::PartialJson(serde_json::json!({ "model": model })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
            .expect(hits)
            .create_async()
            .await
    }

    /// Mock a rejected completion for requests asking for `model`
    pub async fn mock_completion_error(&mut self, model: &str, status: usize, hits: usize) -> Mock {
        let body = serde_json::json!({
            "error": {"message": format!("request for {} rejected", model), "code": status}
        })
        .to_string();
        self.server
            .mock("POST", "/chat/completions")
            .match_body(Matcher::PartialJson(serde_json::json!({ "model": model })))
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body)
            .expect(hits)
            .create_async()
            .await
    }

    /// Write a cache envelope that is `age` old
    pub async fn seed_cache(&self, ids: &[&str], age: Duration) {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_millis() as u64;
        let envelope = ModelCacheEnvelope::new(
            ids.iter().map(|id| ModelDescriptor::new(*id)).collect(),
            now - age.as_millis() as u64,
        );
        self.storage()
            .set_json(StorageScope::Local, keys::MODEL_CACHE, &envelope)
            .await
            .unwrap();
    }

    pub async fn cached_ids(&self) -> Vec<String> {
        let envelope: Option<ModelCacheEnvelope> = self
            .storage()
            .get_json(StorageScope::Local, keys::MODEL_CACHE)
            .await
            .unwrap();
        envelope
            .map(|e| e.models.into_iter().map(|m| m.id).collect())
            .unwrap_or_default()
    }
}

pub const CLASSIFICATION: &str =
    r#"{"folderPath":["💻 Technology","🖥️ Software","🛠️ Coding","📦 Crates"],"tags":["rust","async"]}"#;
