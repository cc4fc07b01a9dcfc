//! Typed access over a [`KeyValueStore`].

use super::{KeyValueStore, StorageScope};
use crate::{Error, ErrorContext, Result};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// Cheaply clonable handle shared by the credential store, preferences and the
/// model catalog cache.
#[derive(Clone)]
pub struct Storage {
    backend: Arc<dyn KeyValueStore>,
}

impl Storage {
    pub fn new(backend: impl KeyValueStore + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    pub fn from_arc(backend: Arc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        scope: StorageScope,
        key: &str,
    ) -> Result<Option<T>> {
        match self.backend.get(scope, key).await? {
            None | Some(Value::Null) => Ok(None),
            Some(value) => serde_json::from_value(value).map(Some).map_err(|e| {
                Error::storage_with_context(
                    format!("stored value has unexpected shape: {}", e),
                    ErrorContext::new()
                        .with_field_path(format!("{}:{}", scope, key))
                        .with_source(self.backend.name()),
                )
            }),
        }
    }

    pub async fn set_json<T: Serialize>(&self, scope: StorageScope, key: &str, value: &T) -> Result<()> {
        let value = serde_json::to_value(value)?;
        self.backend.set(scope, key, value).await
    }

    /// Reads a string value; empty strings read as absent.
    pub async fn get_string(&self, scope: StorageScope, key: &str) -> Result<Option<String>> {
        Ok(self
            .get_json::<String>(scope, key)
            .await?
            .filter(|s| !s.is_empty()))
    }

    pub async fn set_string(&self, scope: StorageScope, key: &str, value: &str) -> Result<()> {
        self.backend
            .set(scope, key, Value::String(value.to_string()))
            .await
    }

    pub async fn remove(&self, scope: StorageScope, key: &str) -> Result<()> {
        self.backend.remove(scope, key).await
    }
}
