//! Scoped key-value persistence.
//!
//! The host offers two storage scopes: a **synced** scope that follows the user across
//! devices (credential, provider preference, selected model) and a **local** scope for
//! device-only data (the model catalog cache envelope). Each read or write is atomic
//! for a single key; nothing here needs multi-key transactions.
//!
//! ## Key Components
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`KeyValueStore`] | Trait the host storage capability is adapted to |
//! | [`Storage`] | Typed (serde) access on top of a [`KeyValueStore`] |
//! | [`MemoryStore`] | In-memory backend for tests and embedding |
//! | [`JsonFileStore`] | One JSON document per scope on disk |
//!
//! ## Example
//!
//! ```rust
//! use bookmark_classifier::storage::{keys, MemoryStore, Storage, StorageScope};
//!
//! # tokio_test::block_on(async {
//! let storage = Storage::new(MemoryStore::new());
//! storage
//!     .set_string(StorageScope::Sync, keys::PROVIDER_PREFERENCE, "groq")
//!     .await?;
//! let pref = storage
//!     .get_string(StorageScope::Sync, keys::PROVIDER_PREFERENCE)
//!     .await?;
//! assert_eq!(pref.as_deref(), Some("groq"));
//! # Ok::<(), bookmark_classifier::Error>(())
//! # });
//! ```

mod backend;
mod file;
mod manager;

pub use backend::{KeyValueStore, MemoryStore};
pub use file::JsonFileStore;
pub use manager::Storage;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Named storage scope of the host capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageScope {
    Sync,
    Local,
}

impl StorageScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageScope::Sync => "sync",
            StorageScope::Local => "local",
        }
    }
}

impl fmt::Display for StorageScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Storage keys shared with the extension's existing data.
pub mod keys {
    /// Synced: base64-encoded provider credential.
    pub const CREDENTIAL: &str = "encrypted_api_key";
    /// Synced: explicit provider id, absent for auto-detect.
    pub const PROVIDER_PREFERENCE: &str = "provider_preference";
    /// Synced: model id chosen for the dynamic-catalog provider.
    pub const SELECTED_MODEL: &str = "openrouter_selected_model";
    /// Local: model catalog cache envelope.
    pub const MODEL_CACHE: &str = "openrouter_models_cache";
}
