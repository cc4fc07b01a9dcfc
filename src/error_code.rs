//! Classification of remote HTTP rejections.
//!
//! Both outbound calls (chat completion and model catalog) report failures through an
//! HTTP status. This module maps the status onto a small set of error classes and then
//! onto the crate's [`Error`] kinds, so the two call sites agree on what a 401 or a 429
//! means.
//!
//! | Status | Class               | Completion error          | Catalog error            |
//! |--------|---------------------|---------------------------|--------------------------|
//! | 401    | `authentication`    | `InvalidCredential`       | `InvalidCredential`      |
//! | 403    | `permission_denied` | `Forbidden`               | `CatalogFetch`           |
//! | 404    | `not_found`         | `ModelNotFound`           | `CatalogFetch`           |
//! | 429    | `rate_limited`      | `RateLimited`             | `RateLimited`            |
//! | other  | `server_error`/...  | `Api`                     | `CatalogFetch`           |

use crate::Error;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemoteErrorCode {
    /// Malformed request or unsupported parameters
    InvalidRequest,
    /// Invalid, expired, or missing API key
    Authentication,
    /// Valid credentials but insufficient permissions
    PermissionDenied,
    /// Requested model or endpoint does not exist
    NotFound,
    /// Request rate limit exceeded
    RateLimited,
    /// Internal server error on provider side
    ServerError,
    /// Provider service temporarily overloaded
    Overloaded,
    /// Status could not be classified
    Unknown,
}

impl RemoteErrorCode {
    /// Returns the standard name (e.g., `"rate_limited"`).
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Self::InvalidRequest => "invalid_request",
            Self::Authentication => "authentication",
            Self::PermissionDenied => "permission_denied",
            Self::NotFound => "not_found",
            Self::RateLimited => "rate_limited",
            Self::ServerError => "server_error",
            Self::Overloaded => "overloaded",
            Self::Unknown => "unknown",
        }
    }

    /// Maps an HTTP status code to the most likely `RemoteErrorCode`.
    pub fn from_http_status(status: u16) -> Self {
        match status {
            400 | 413 | 422 => Self::InvalidRequest,
            401 => Self::Authentication,
            403 => Self::PermissionDenied,
            404 => Self::NotFound,
            429 => Self::RateLimited,
            500 | 502 => Self::ServerError,
            503 | 529 => Self::Overloaded,
            _ => Self::Unknown,
        }
    }

    /// Builds the error for a rejected chat-completion request.
    pub fn completion_error(status: u16, provider: &str, model: &str, body: &str) -> Error {
        let message = extract_error_message(body).unwrap_or_else(|| format!("HTTP {}", status));
        match Self::from_http_status(status) {
            Self::Authentication => Error::InvalidCredential {
                provider: provider.to_string(),
                status,
            },
            Self::PermissionDenied => Error::Forbidden {
                provider: provider.to_string(),
                message,
            },
            Self::NotFound => Error::ModelNotFound {
                provider: provider.to_string(),
                model: model.to_string(),
                message,
            },
            Self::RateLimited => Error::RateLimited {
                provider: provider.to_string(),
            },
            _ => Error::Api {
                provider: provider.to_string(),
                status,
                message,
            },
        }
    }

    /// Builds the error for a rejected model catalog request.
    pub fn catalog_error(status: u16, provider: &str, body: &str) -> Error {
        match Self::from_http_status(status) {
            Self::Authentication => Error::InvalidCredential {
                provider: provider.to_string(),
                status,
            },
            Self::RateLimited => Error::RateLimited {
                provider: provider.to_string(),
            },
            _ => Error::CatalogFetch {
                status,
                message: extract_error_message(body).unwrap_or_else(|| format!("HTTP {}", status)),
            },
        }
    }
}

impl fmt::Display for RemoteErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Pulls a human readable message out of an OpenAI-style error body
/// (`{"error": {"message": "..."}}` or `{"error": "..."}`).
fn extract_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let error = value.get("error")?;
    error
        .get("message")
        .and_then(|m| m.as_str())
        .or_else(|| error.as_str())
        .map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_http_status() {
        assert_eq!(RemoteErrorCode::from_http_status(401), RemoteErrorCode::Authentication);
        assert_eq!(RemoteErrorCode::from_http_status(403), RemoteErrorCode::PermissionDenied);
        assert_eq!(RemoteErrorCode::from_http_status(404), RemoteErrorCode::NotFound);
        assert_eq!(RemoteErrorCode::from_http_status(429), RemoteErrorCode::RateLimited);
        assert_eq!(RemoteErrorCode::from_http_status(503), RemoteErrorCode::Overloaded);
        assert_eq!(RemoteErrorCode::from_http_status(418), RemoteErrorCode::Unknown);
    }

    #[test]
    fn test_completion_error_kinds() {
        let body = r#"{"error":{"message":"No endpoints found for vendor/model"}}"#;
        match RemoteErrorCode::completion_error(404, "OpenRouter", "vendor/model", body) {
            Error::ModelNotFound { model, message, .. } => {
                assert_eq!(model, "vendor/model");
                assert_eq!(message, "No endpoints found for vendor/model");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(matches!(
            RemoteErrorCode::completion_error(401, "OpenAI", "gpt-3.5-turbo", ""),
            Error::InvalidCredential { status: 401, .. }
        ));
        assert!(matches!(
            RemoteErrorCode::completion_error(403, "OpenAI", "gpt-3.5-turbo", ""),
            Error::Forbidden { .. }
        ));
        assert!(matches!(
            RemoteErrorCode::completion_error(500, "OpenAI", "gpt-3.5-turbo", "oops"),
            Error::Api { status: 500, .. }
        ));
    }

    #[test]
    fn test_catalog_error_kinds() {
        assert!(matches!(
            RemoteErrorCode::catalog_error(401, "OpenRouter", ""),
            Error::InvalidCredential { .. }
        ));
        assert!(matches!(
            RemoteErrorCode::catalog_error(429, "OpenRouter", ""),
            Error::RateLimited { .. }
        ));
        assert!(matches!(
            RemoteErrorCode::catalog_error(502, "OpenRouter", ""),
            Error::CatalogFetch { status: 502, .. }
        ));
    }

    #[test]
    fn test_error_message_extraction() {
        assert_eq!(
            extract_error_message(r#"{"error":"bad key"}"#).as_deref(),
            Some("bad key")
        );
        assert_eq!(extract_error_message("<html>"), None);
    }
}
