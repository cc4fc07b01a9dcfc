use super::{now_millis, ModelCacheEnvelope, ModelDescriptor};
use crate::config::ClassifierConfig;
use crate::error_code::RemoteErrorCode;
use crate::events::{emit, ClassifierEvent, EventSink};
use crate::provider::ProviderId;
use crate::storage::{keys, Storage, StorageScope};
use crate::transport::HttpTransport;
use crate::{Error, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

pub struct ModelCatalog {
    transport: Arc<HttpTransport>,
    storage: Storage,
    models_url: String,
    ttl: Duration,
    events: Arc<dyn EventSink>,
}

impl ModelCatalog {
    pub fn new(
        transport: Arc<HttpTransport>,
        storage: Storage,
        config: &ClassifierConfig,
        events: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            transport,
            storage,
            models_url: config.models_url.clone(),
            ttl: config.cache_ttl,
            events,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the model catalog, from cache when fresh.
    ///
    /// With `force_refresh == false` a fresh, non-empty envelope is served without a
    /// network call. Otherwise the catalog is refetched; if that fails for any reason
    /// the last cached envelope is served regardless of age. The error only surfaces
    /// when there is nothing cached to fall back to.
    pub async fn fetch_models(
        &self,
        credential: &str,
        force_refresh: bool,
    ) -> Result<Vec<ModelDescriptor>> {
        if !force_refresh {
            if let Some(envelope) = self.cached_envelope().await {
                if envelope.is_fresh(now_millis(), self.ttl.as_millis() as u64) {
                    debug!(count = envelope.models.len(), "model catalog cache hit");
                    return Ok(envelope.models);
                }
            }
        }

        match self.fetch_remote(credential).await {
            Ok(models) => {
                if let Err(e) = self.store_envelope(models.clone()).await {
                    warn!(error = %e, "failed to cache model catalog");
                }
                info!(count = models.len(), "fetched model catalog");
                emit(
                    &self.events,
                    ClassifierEvent::ModelsFetched {
                        count: models.len(),
                    },
                )
                .await;
                Ok(models)
            }
            Err(e) => {
                warn!(error = %e, "model catalog fetch failed");
                match self.cached_envelope().await {
                    Some(envelope) if !envelope.models.is_empty() => {
                        info!(
                            count = envelope.models.len(),
                            age_ms = envelope.age_millis(now_millis()),
                            "serving stale model catalog"
                        );
                        emit(
                            &self.events,
                            ClassifierEvent::ModelsServedStale {
                                count: envelope.models.len(),
                                reason: e.to_string(),
                            },
                        )
                        .await;
                        Ok(envelope.models)
                    }
                    _ => Err(e),
                }
            }
        }
    }

    /// Reads the cached envelope; an unreadable cache counts as no cache.
    pub async fn cached_envelope(&self) -> Option<ModelCacheEnvelope> {
        match self
            .storage
            .get_json::<ModelCacheEnvelope>(StorageScope::Local, keys::MODEL_CACHE)
            .await
        {
            Ok(envelope) => envelope,
            Err(e) => {
                debug!(error = %e, "ignoring unreadable model catalog cache");
                None
            }
        }
    }

    /// Overwrites the cache with `models`, stamped now.
    pub async fn store_envelope(&self, models: Vec<ModelDescriptor>) -> Result<ModelCacheEnvelope> {
        let envelope = ModelCacheEnvelope::now(models);
        self.storage
            .set_json(StorageScope::Local, keys::MODEL_CACHE, &envelope)
            .await?;
        Ok(envelope)
    }

    async fn fetch_remote(&self, credential: &str) -> Result<Vec<ModelDescriptor>> {
        let response = self.transport.get_json(&self.models_url, credential).await?;
        if !response.is_success() {
            return Err(RemoteErrorCode::catalog_error(
                response.status,
                ProviderId::OpenRouter.descriptor().display_name.as_str(),
                &response.body,
            ));
        }

        let body: serde_json::Value = response.json().map_err(|e| Error::CatalogFetch {
            status: response.status,
            message: format!("model catalog is not valid JSON: {}", e),
        })?;
        let entries = match body.get("data") {
            Some(serde_json::Value::Array(entries)) => entries.clone(),
            _ => Vec::new(),
        };
        let total = entries.len();
        let models: Vec<ModelDescriptor> = entries
            .into_iter()
            .filter_map(ModelDescriptor::from_wire)
            .collect();
        if models.len() < total {
            debug!(dropped = total - models.len(), "dropped catalog entries without vendor/model id");
        }
        Ok(models)
    }
}
