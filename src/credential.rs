//! Credential persistence in the synced storage scope.
//!
//! The credential is stored base64 encoded under [`keys::CREDENTIAL`]. This is
//! obfuscation, not encryption: anyone who can read the synced scope can recover the
//! key. The encoding is kept so existing installs keep working; hosts that need real
//! confidentiality should plug a platform secret store in as the [`KeyValueStore`]
//! backing the synced scope.
//!
//! [`KeyValueStore`]: crate::storage::KeyValueStore

use crate::storage::{keys, Storage, StorageScope};
use crate::{Error, ErrorContext, Result};
use base64::Engine as _;
use std::fmt;

const REDACTED_PREFIX_CHARS: usize = 10;

/// A non-empty, trimmed provider credential.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Returns `None` when `raw` is empty after trimming.
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Character count of the trimmed credential.
    pub fn len(&self) -> usize {
        self.0.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Bounded prefix safe for diagnostics, e.g. `sk-or-v1-a...`.
    pub fn redacted(&self) -> String {
        let prefix: String = self.0.chars().take(REDACTED_PREFIX_CHARS).collect();
        format!("{}...", prefix)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Credential").field(&self.redacted()).finish()
    }
}

#[derive(Clone)]
pub struct CredentialStore {
    storage: Storage,
}

impl CredentialStore {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    pub async fn save(&self, raw: &str) -> Result<()> {
        let credential = Credential::new(raw).ok_or_else(|| {
            Error::configuration_with_context(
                "credential must not be empty",
                ErrorContext::new()
                    .with_field_path(keys::CREDENTIAL)
                    .with_source("credential_store"),
            )
        })?;
        let encoded = base64::engine::general_purpose::STANDARD.encode(credential.as_str());
        self.storage
            .set_string(StorageScope::Sync, keys::CREDENTIAL, &encoded)
            .await?;
        tracing::info!(length = credential.len(), "credential stored");
        Ok(())
    }

    /// Reads the stored credential. Storage or decoding failures are logged and read
    /// as "no credential", which the classifier reports as a missing credential.
    pub async fn load(&self) -> Option<Credential> {
        let encoded = match self
            .storage
            .get_string(StorageScope::Sync, keys::CREDENTIAL)
            .await
        {
            Ok(Some(encoded)) => encoded,
            Ok(None) => {
                tracing::debug!("no credential found in storage");
                return None;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to read credential");
                return None;
            }
        };

        let decoded = base64::engine::general_purpose::STANDARD
            .decode(encoded.as_bytes())
            .ok()
            .and_then(|bytes| String::from_utf8(bytes).ok());
        match decoded {
            Some(raw) => {
                let credential = Credential::new(&raw);
                if let Some(c) = &credential {
                    tracing::debug!(length = c.len(), "credential retrieved");
                }
                credential
            }
            None => {
                tracing::warn!("stored credential is not valid base64 text");
                None
            }
        }
    }

    pub async fn clear(&self) -> Result<()> {
        self.storage
            .remove(StorageScope::Sync, keys::CREDENTIAL)
            .await
    }
}
