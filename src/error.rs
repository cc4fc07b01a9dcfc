use crate::transport::TransportError;
use thiserror::Error;

/// Structured error context for storage and configuration failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorContext {
    /// Storage key or configuration field that caused the error (e.g., "sync:encrypted_api_key")
    pub field_path: Option<String>,
    /// Additional context about the error (e.g., expected type, actual value)
    pub details: Option<String>,
    /// Source of the error (e.g., "json_file_store", "classifier_config")
    pub source: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self {
            field_path: None,
            details: None,
            source: None,
        }
    }

    pub fn with_field_path(mut self, path: impl Into<String>) -> Self {
        self.field_path = Some(path.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Unified error type for bookmark classification.
///
/// Remote rejections keep their specific kind all the way to the caller so that the
/// UI layer can render an accurate message. Anything without a specific kind
/// (transport failures, storage hiccups during a classification) ends up wrapped in
/// [`Error::Classification`].
#[derive(Debug, Error)]
pub enum Error {
    #[error("API key not configured. Please save your API key first.")]
    MissingCredential,

    #[error("Invalid API key for {provider} (HTTP {status})")]
    InvalidCredential { provider: String, status: u16 },

    #[error("Rate limited by {provider} (HTTP 429)")]
    RateLimited { provider: String },

    #[error("API access forbidden by {provider} (HTTP 403): {message}")]
    Forbidden { provider: String, message: String },

    #[error("Failed to fetch models (HTTP {status}): {message}")]
    CatalogFetch { status: u16, message: String },

    #[error("Model '{model}' not found on {provider}: {message}")]
    ModelNotFound {
        provider: String,
        model: String,
        message: String,
    },

    #[error("API error from {provider} (HTTP {status}): {message}")]
    Api {
        provider: String,
        status: u16,
        message: String,
    },

    #[error("Malformed response: {message}")]
    MalformedResponse { message: String },

    #[error("Classification failed: {message}")]
    Classification {
        message: String,
        #[source]
        source: Option<Box<Error>>,
    },

    #[error("Storage error: {message}{}", format_context(.context))]
    Storage {
        message: String,
        context: ErrorContext,
    },

    #[error("Bookmark error: {message}")]
    Bookmark { message: String },

    #[error("Configuration error: {message}{}", format_context(.context))]
    Configuration {
        message: String,
        context: ErrorContext,
    },

    #[error("Network transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

// Helper function to format error context for display
fn format_context(ctx: &ErrorContext) -> String {
    let mut parts = Vec::new();
    if let Some(ref field) = ctx.field_path {
        parts.push(format!("field: {}", field));
    }
    if let Some(ref details) = ctx.details {
        parts.push(format!("details: {}", details));
    }
    if let Some(ref source) = ctx.source {
        parts.push(format!("source: {}", source));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

impl Error {
    /// Create a new storage error with structured context
    pub fn storage_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Storage {
            message: msg.into(),
            context,
        }
    }

    /// Create a new configuration error with structured context
    pub fn configuration_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Configuration {
            message: msg.into(),
            context,
        }
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Error::MalformedResponse {
            message: msg.into(),
        }
    }

    /// Extract error context if available
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::Storage { context, .. } | Error::Configuration { context, .. } => Some(context),
            _ => None,
        }
    }

    /// HTTP status reported by the remote service, when the error came from one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::InvalidCredential { status, .. }
            | Error::CatalogFetch { status, .. }
            | Error::Api { status, .. } => Some(*status),
            Error::RateLimited { .. } => Some(429),
            Error::Forbidden { .. } => Some(403),
            Error::ModelNotFound { .. } => Some(404),
            Error::Classification {
                source: Some(inner),
                ..
            } => inner.status(),
            _ => None,
        }
    }

    pub fn is_model_not_found(&self) -> bool {
        matches!(self, Error::ModelNotFound { .. })
    }

    /// Whether this error already carries a kind the caller can act on.
    pub fn is_specific(&self) -> bool {
        matches!(
            self,
            Error::MissingCredential
                | Error::InvalidCredential { .. }
                | Error::RateLimited { .. }
                | Error::Forbidden { .. }
                | Error::CatalogFetch { .. }
                | Error::ModelNotFound { .. }
                | Error::Api { .. }
                | Error::MalformedResponse { .. }
                | Error::Classification { .. }
        )
    }

    /// Wrap anything without a specific kind into [`Error::Classification`].
    pub fn into_classification_error(self) -> Self {
        if self.is_specific() {
            return self;
        }
        Error::Classification {
            message: self.to_string(),
            source: Some(Box::new(self)),
        }
    }

    /// Short text suitable for a toast in the popup.
    pub fn user_message(&self) -> String {
        match self {
            Error::MissingCredential => {
                "API key not configured. Please save your API key first.".to_string()
            }
            Error::InvalidCredential { .. } => {
                "Invalid API key. Please check your credentials.".to_string()
            }
            Error::RateLimited { .. } => "Rate limit exceeded. Please try again later.".to_string(),
            Error::Forbidden { .. } => {
                "API access forbidden. Check your API key permissions.".to_string()
            }
            Error::Api {
                status, message, ..
            } => format!("API Error ({}): {}", status, message),
            Error::ModelNotFound { model, .. } => {
                format!("API Error (404): model '{}' is not available", model)
            }
            other => other.to_string(),
        }
    }
}
