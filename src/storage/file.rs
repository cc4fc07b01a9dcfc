//! File-backed store: one JSON object per scope (`sync.json`, `local.json`).

use super::{KeyValueStore, StorageScope};
use crate::{Error, ErrorContext, Result};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

pub struct JsonFileStore {
    dir: PathBuf,
    // Serializes read-modify-write cycles so single-key updates stay atomic.
    lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, scope: StorageScope) -> PathBuf {
        self.dir.join(format!("{}.json", scope.as_str()))
    }

    async fn read_scope(&self, scope: StorageScope) -> Result<Map<String, Value>> {
        let path = self.path_for(scope);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(io_error(e, &path, "read")),
        };
        if bytes.is_empty() {
            return Ok(Map::new());
        }
        match serde_json::from_slice::<Value>(&bytes)? {
            Value::Object(map) => Ok(map),
            _ => Err(Error::storage_with_context(
                "scope file is not a JSON object",
                ErrorContext::new()
                    .with_field_path(path.display().to_string())
                    .with_source("json_file_store"),
            )),
        }
    }

    async fn write_scope(&self, scope: StorageScope, map: Map<String, Value>) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| io_error(e, &self.dir, "create directory"))?;
        let path = self.path_for(scope);
        let tmp = path.with_extension("json.tmp");
        let data = serde_json::to_vec_pretty(&Value::Object(map))?;
        tokio::fs::write(&tmp, data)
            .await
            .map_err(|e| io_error(e, &tmp, "write"))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| io_error(e, &path, "rename"))
    }
}

fn io_error(e: std::io::Error, path: &Path, op: &str) -> Error {
    Error::storage_with_context(
        format!("failed to {}: {}", op, e),
        ErrorContext::new()
            .with_field_path(path.display().to_string())
            .with_source("json_file_store"),
    )
}

#[async_trait]
impl KeyValueStore for JsonFileStore {
    async fn get(&self, scope: StorageScope, key: &str) -> Result<Option<Value>> {
        let _guard = self.lock.lock().await;
        Ok(self.read_scope(scope).await?.remove(key))
    }

    async fn set(&self, scope: StorageScope, key: &str, value: Value) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut map = self.read_scope(scope).await?;
        map.insert(key.to_string(), value);
        self.write_scope(scope, map).await
    }

    async fn remove(&self, scope: StorageScope, key: &str) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut map = self.read_scope(scope).await?;
        if map.remove(key).is_some() {
            self.write_scope(scope, map).await?;
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "json_file"
    }
}
