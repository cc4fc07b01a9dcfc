//! Synced user choices: provider preference and the selected dynamic-catalog model.

use crate::provider::ProviderId;
use crate::storage::{keys, Storage, StorageScope};
use crate::Result;

#[derive(Clone)]
pub struct Preferences {
    storage: Storage,
}

impl Preferences {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    /// Stored provider id, or `None` for auto-detect.
    pub async fn provider_preference(&self) -> Result<Option<String>> {
        self.storage
            .get_string(StorageScope::Sync, keys::PROVIDER_PREFERENCE)
            .await
    }

    /// Stores a provider id; an empty value switches back to auto-detect.
    pub async fn set_provider_preference(&self, preference: &str) -> Result<()> {
        let preference = preference.trim();
        if preference.is_empty() {
            return self
                .storage
                .remove(StorageScope::Sync, keys::PROVIDER_PREFERENCE)
                .await;
        }
        if ProviderId::from_id(preference).is_none() {
            tracing::warn!(preference, "storing unknown provider preference; auto-detect will be used");
        }
        self.storage
            .set_string(StorageScope::Sync, keys::PROVIDER_PREFERENCE, preference)
            .await
    }

    pub async fn selected_model(&self) -> Result<Option<String>> {
        self.storage
            .get_string(StorageScope::Sync, keys::SELECTED_MODEL)
            .await
    }

    pub async fn set_selected_model(&self, model_id: &str) -> Result<()> {
        self.storage
            .set_string(StorageScope::Sync, keys::SELECTED_MODEL, model_id)
            .await
    }

    pub async fn clear_selected_model(&self) -> Result<()> {
        self.storage
            .remove(StorageScope::Sync, keys::SELECTED_MODEL)
            .await
    }
}
