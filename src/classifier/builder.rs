use super::Classifier;
use crate::config::ClassifierConfig;
use crate::credential::CredentialStore;
use crate::events::{noop_sink, EventSink};
use crate::models::ModelCatalog;
use crate::preferences::Preferences;
use crate::storage::{MemoryStore, Storage};
use crate::transport::HttpTransport;
use crate::Result;
use std::sync::Arc;
use std::time::Duration;

/// Builder for [`Classifier`].
///
/// Starts from [`ClassifierConfig::from_env`]; anything set on the builder wins over
/// the environment.
pub struct ClassifierBuilder {
    config: ClassifierConfig,
    storage: Option<Storage>,
    events: Arc<dyn EventSink>,
}

impl ClassifierBuilder {
    pub fn new() -> Self {
        Self {
            config: ClassifierConfig::from_env(),
            storage: None,
            events: noop_sink(),
        }
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: ClassifierConfig) -> Self {
        self.config = config;
        self
    }

    /// Host storage holding both the synced and the local scope.
    ///
    /// Defaults to an in-memory store, which forgets everything on drop.
    pub fn storage(mut self, storage: Storage) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Inject an event sink. Default is a no-op sink.
    pub fn event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.events = sink;
        self
    }

    /// Override every provider's base URL.
    ///
    /// This is primarily for testing with mock servers.
    pub fn base_url_override(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url_override = Some(base_url.into());
        self
    }

    /// Model catalog endpoint (defaults to OpenRouter's `/models`).
    pub fn models_url(mut self, url: impl Into<String>) -> Self {
        self.config.models_url = url.into();
        self
    }

    pub fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.config.cache_ttl = ttl;
        self
    }

    pub fn http_timeout(mut self, timeout: Duration) -> Self {
        self.config.http_timeout = timeout;
        self
    }

    pub fn build(self) -> Result<Classifier> {
        self.config.validate()?;

        let storage = self
            .storage
            .unwrap_or_else(|| Storage::new(MemoryStore::new()));
        let transport = Arc::new(HttpTransport::new(&self.config)?);
        let catalog = ModelCatalog::new(
            transport.clone(),
            storage.clone(),
            &self.config,
            self.events.clone(),
        );

        tracing::debug!(
            storage = storage.backend_name(),
            models_url = %self.config.models_url,
            "classifier built"
        );

        Ok(Classifier {
            credentials: CredentialStore::new(storage.clone()),
            preferences: Preferences::new(storage),
            catalog,
            transport,
            events: self.events,
            config: self.config,
        })
    }
}

impl Default for ClassifierBuilder {
    fn default() -> Self {
        Self::new()
    }
}
