//! Storage backend implementations.

use super::StorageScope;
use crate::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// The host's "get/set/remove a value by string key within a named scope" capability.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, scope: StorageScope, key: &str) -> Result<Option<Value>>;
    async fn set(&self, scope: StorageScope, key: &str, value: Value) -> Result<()>;
    async fn remove(&self, scope: StorageScope, key: &str) -> Result<()>;
    fn name(&self) -> &'static str;
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<HashMap<(StorageScope, String), Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently held in `scope`.
    pub async fn len(&self, scope: StorageScope) -> usize {
        self.entries
            .read()
            .await
            .keys()
            .filter(|(s, _)| *s == scope)
            .count()
    }

    pub async fn is_empty(&self, scope: StorageScope) -> bool {
        self.len(scope).await == 0
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, scope: StorageScope, key: &str) -> Result<Option<Value>> {
        let entries = self.entries.read().await;
        Ok(entries.get(&(scope, key.to_string())).cloned())
    }

    async fn set(&self, scope: StorageScope, key: &str, value: Value) -> Result<()> {
        self.entries
            .write()
            .await
            .insert((scope, key.to_string()), value);
        Ok(())
    }

    async fn remove(&self, scope: StorageScope, key: &str) -> Result<()> {
        self.entries.write().await.remove(&(scope, key.to_string()));
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
