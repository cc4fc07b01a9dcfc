//! Classification request orchestration.
//!
//! One call to [`Classifier::classify`] walks this sequence, awaiting each step:
//!
//! ```text
//! Idle → CredentialLoaded → ProviderResolved → RequestSent ─┬─ Success
//!                                                           ├─ Failure
//!                                                           └─ RetryableFailure → RequestSent(fallback) ─┬─ Success
//!                                                                                                       └─ Failure
//! ```
//!
//! The only retry edge is taken when the provider is the dynamic-catalog one, the
//! rejection is a 404 (model not found), and the request was the first attempt. See
//! [`Attempt`].

mod builder;
mod prompt;
mod response;

pub use builder::ClassifierBuilder;
pub use prompt::build_prompt;
pub use response::{parse_classification, strip_code_fences, ClassificationResult};

use crate::config::ClassifierConfig;
use crate::credential::{Credential, CredentialStore};
use crate::error_code::RemoteErrorCode;
use crate::events::{emit, ClassifierEvent, EventSink};
use crate::models::ModelCatalog;
use crate::preferences::Preferences;
use crate::provider::{resolve_provider, ProviderDescriptor};
use crate::transport::HttpTransport;
use crate::{Error, Result};
use response::ChatCompletion;
use std::sync::Arc;
use tracing::{info, warn, Instrument};
use uuid::Uuid;

/// Which request of a classification call is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attempt {
    Primary,
    Fallback,
}

impl Attempt {
    /// Transition taken after `err`: `Some(Fallback)` only for a first-attempt 404 from
    /// the dynamic-catalog provider. Every other failure is terminal.
    pub fn after_failure(self, provider: &ProviderDescriptor, err: &Error) -> Option<Attempt> {
        match self {
            Attempt::Primary if provider.is_dynamic_catalog() && err.is_model_not_found() => {
                Some(Attempt::Fallback)
            }
            _ => None,
        }
    }
}

/// Classifies pages by asking the resolved provider's chat-completion endpoint.
pub struct Classifier {
    pub(crate) config: ClassifierConfig,
    pub(crate) transport: Arc<HttpTransport>,
    pub(crate) credentials: CredentialStore,
    pub(crate) preferences: Preferences,
    pub(crate) catalog: ModelCatalog,
    pub(crate) events: Arc<dyn EventSink>,
}

impl Classifier {
    pub fn builder() -> ClassifierBuilder {
        ClassifierBuilder::new()
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    pub fn catalog(&self) -> &ModelCatalog {
        &self.catalog
    }

    /// Provider (and model) the next classification would use. Mirrors steps 1–4 of
    /// [`classify`](Self::classify) without sending anything.
    pub async fn current_provider(&self) -> Result<ProviderDescriptor> {
        let credential = self.credentials.load().await.ok_or(Error::MissingCredential)?;
        Ok(self.resolve(&credential).await)
    }

    /// Classifies `url`/`title` into a folder path and tags.
    ///
    /// Failures keep their specific kind (missing or invalid credential, rate limit,
    /// forbidden, model not found, malformed response); anything else is wrapped in
    /// [`Error::Classification`].
    pub async fn classify(&self, url: &str, title: &str) -> Result<ClassificationResult> {
        let request_id = Uuid::new_v4().to_string();
        let span = tracing::info_span!("classify", request_id = %request_id);

        let outcome = self.classify_inner(&request_id, url, title).instrument(span).await;
        match outcome {
            Ok(result) => Ok(result),
            Err(e) => {
                let e = e.into_classification_error();
                warn!(request_id = %request_id, error = %e, "classification failed");
                emit(
                    &self.events,
                    ClassifierEvent::ClassificationFailed {
                        request_id,
                        reason: e.to_string(),
                    },
                )
                .await;
                Err(e)
            }
        }
    }

    async fn classify_inner(
        &self,
        request_id: &str,
        url: &str,
        title: &str,
    ) -> Result<ClassificationResult> {
        // Always reloaded: the user may have just saved a new key.
        let credential = self.credentials.load().await.ok_or(Error::MissingCredential)?;
        info!(credential = %credential.redacted(), "using API key");

        let mut provider = self.resolve(&credential).await;
        info!(provider = %provider.display_name, model = %provider.model, "using provider");

        let prompt = build_prompt(url, title);
        let mut attempt = Attempt::Primary;
        let content = loop {
            match self.complete(&credential, &provider, &prompt).await {
                Ok(content) => break content,
                Err(err) => match attempt.after_failure(&provider, &err) {
                    Some(next) => {
                        warn!(
                            model = %provider.model,
                            error = %err,
                            "model rejected; attempting fallback model"
                        );
                        provider = self.apply_fallback(&credential, provider, err).await?;
                        attempt = next;
                    }
                    None => return Err(err),
                },
            }
        };

        let result = parse_classification(&content, self.config.max_folder_depth)?;
        info!(folder_path = ?result.folder_path, tags = ?result.tags, "classification successful");
        emit(
            &self.events,
            ClassifierEvent::ClassificationSucceeded {
                request_id: request_id.to_string(),
                provider: provider.id.to_string(),
                model: provider.model.clone(),
                retried: attempt == Attempt::Fallback,
            },
        )
        .await;
        Ok(result)
    }

    /// Resolves the provider from stored preferences. Preference read failures are
    /// logged and treated as "no preference".
    async fn resolve(&self, credential: &Credential) -> ProviderDescriptor {
        let preference = self
            .preferences
            .provider_preference()
            .await
            .unwrap_or_else(|e| {
                warn!(error = %e, "failed to load provider preference");
                None
            });
        let selected_model = self.preferences.selected_model().await.unwrap_or_else(|e| {
            warn!(error = %e, "failed to load selected model");
            None
        });

        let provider = resolve_provider(credential.as_str(), preference.as_deref());
        match selected_model {
            Some(model) if provider.is_dynamic_catalog() => provider.with_model(model),
            _ => provider,
        }
    }

    /// Clears the rejected model, picks a replacement from the catalog and persists it.
    async fn apply_fallback(
        &self,
        credential: &Credential,
        provider: ProviderDescriptor,
        rejection: Error,
    ) -> Result<ProviderDescriptor> {
        self.preferences.clear_selected_model().await?;

        let Some(fallback) = self.catalog.choose_default(credential.as_str()).await else {
            return Err(match rejection {
                Error::ModelNotFound {
                    provider: provider_name,
                    model,
                    ..
                } => Error::ModelNotFound {
                    provider: provider_name,
                    model,
                    message: "no fallback model available".to_string(),
                },
                other => other,
            });
        };

        self.preferences.set_selected_model(&fallback).await?;
        info!(from = %provider.model, to = %fallback, "retrying with fallback model");
        emit(
            &self.events,
            ClassifierEvent::ModelFallbackApplied {
                from: provider.model.clone(),
                to: fallback.clone(),
            },
        )
        .await;
        Ok(provider.with_model(fallback))
    }

    /// Sends one chat-completion request and returns the raw message content.
    async fn complete(
        &self,
        credential: &Credential,
        provider: &ProviderDescriptor,
        prompt: &str,
    ) -> Result<String> {
        let url = provider.completions_url(self.config.base_url_override.as_deref());
        let body = serde_json::json!({
            "model": provider.model,
            "messages": [{ "role": "user", "content": prompt }],
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temperature,
        });

        let response = self
            .transport
            .post_json(&url, credential.as_str(), &body)
            .await?;
        if !response.is_success() {
            return Err(RemoteErrorCode::completion_error(
                response.status,
                &provider.display_name,
                &provider.model,
                &response.body,
            ));
        }

        let completion: ChatCompletion = serde_json::from_str(&response.body)
            .map_err(|e| Error::malformed(format!("unexpected completion body: {}", e)))?;
        completion.into_content()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ProviderId;

    fn not_found() -> Error {
        Error::ModelNotFound {
            provider: "OpenRouter".into(),
            model: "vendor/gone".into(),
            message: "No endpoints found".into(),
        }
    }

    #[test]
    fn test_only_first_404_on_dynamic_provider_retries() {
        let openrouter = ProviderId::OpenRouter.descriptor();
        assert_eq!(
            Attempt::Primary.after_failure(&openrouter, &not_found()),
            Some(Attempt::Fallback)
        );
        assert_eq!(Attempt::Fallback.after_failure(&openrouter, &not_found()), None);
    }

    #[test]
    fn test_static_providers_never_retry() {
        let openai = ProviderId::OpenAI.descriptor();
        assert_eq!(Attempt::Primary.after_failure(&openai, &not_found()), None);
    }

    #[test]
    fn test_other_failures_never_retry() {
        let openrouter = ProviderId::OpenRouter.descriptor();
        let unauthorized = Error::InvalidCredential {
            provider: "OpenRouter".into(),
            status: 401,
        };
        assert_eq!(Attempt::Primary.after_failure(&openrouter, &unauthorized), None);
        let limited = Error::RateLimited {
            provider: "OpenRouter".into(),
        };
        assert_eq!(Attempt::Primary.after_failure(&openrouter, &limited), None);
    }
}
