//! Runtime configuration with environment overrides.
//!
//! Defaults mirror the values the extension has always shipped with. Any of them can
//! be changed through the builder or through `BOOKMARK_CLASSIFIER_*` variables:
//!
//! - `BOOKMARK_CLASSIFIER_HTTP_TIMEOUT_SECS` (default 30)
//! - `BOOKMARK_CLASSIFIER_PROXY_URL`
//! - `BOOKMARK_CLASSIFIER_CACHE_TTL_SECS` (default 900)
//! - `BOOKMARK_CLASSIFIER_MODELS_URL` (default `https://openrouter.ai/api/v1/models`)

use crate::{Error, ErrorContext, Result};
use std::env;
use std::time::Duration;
use url::Url;

pub const DEFAULT_MODELS_URL: &str = "https://openrouter.ai/api/v1/models";
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(15 * 60);
pub const DEFAULT_MAX_TOKENS: u32 = 300;
pub const DEFAULT_TEMPERATURE: f64 = 0.2;
pub const DEFAULT_MAX_FOLDER_DEPTH: usize = 3;

#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    /// Model listing endpoint of the dynamic-catalog provider.
    pub models_url: String,
    /// How long a fetched model catalog is served without refetching.
    pub cache_ttl: Duration,
    pub http_timeout: Duration,
    pub proxy_url: Option<String>,
    pub max_tokens: u32,
    pub temperature: f64,
    /// Folder paths deeper than this are truncated.
    pub max_folder_depth: usize,
    /// Replaces every provider's base endpoint (mock servers in tests).
    pub base_url_override: Option<String>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            models_url: DEFAULT_MODELS_URL.to_string(),
            cache_ttl: DEFAULT_CACHE_TTL,
            http_timeout: Duration::from_secs(30),
            proxy_url: None,
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            max_folder_depth: DEFAULT_MAX_FOLDER_DEPTH,
            base_url_override: None,
        }
    }
}

impl ClassifierConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults with `BOOKMARK_CLASSIFIER_*` environment overrides applied.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(secs) = env_u64("BOOKMARK_CLASSIFIER_HTTP_TIMEOUT_SECS").filter(|s| *s > 0) {
            config.http_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = env_u64("BOOKMARK_CLASSIFIER_CACHE_TTL_SECS") {
            config.cache_ttl = Duration::from_secs(secs);
        }
        if let Ok(proxy) = env::var("BOOKMARK_CLASSIFIER_PROXY_URL") {
            let proxy = proxy.trim();
            if !proxy.is_empty() {
                config.proxy_url = Some(proxy.to_string());
            }
        }
        if let Ok(url) = env::var("BOOKMARK_CLASSIFIER_MODELS_URL") {
            let url = url.trim();
            if !url.is_empty() {
                config.models_url = url.to_string();
            }
        }

        config
    }

    pub fn with_models_url(mut self, url: impl Into<String>) -> Self {
        self.models_url = url.into();
        self
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    pub fn with_http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = timeout;
        self
    }

    pub fn with_base_url_override(mut self, base_url: impl Into<String>) -> Self {
        self.base_url_override = Some(base_url.into());
        self
    }

    /// Checks that configured URLs parse and that numeric knobs are usable.
    pub fn validate(&self) -> Result<()> {
        check_url(&self.models_url, "models_url")?;
        if let Some(base) = &self.base_url_override {
            check_url(base, "base_url_override")?;
        }
        if self.max_folder_depth == 0 {
            return Err(Error::configuration_with_context(
                "max_folder_depth must be at least 1",
                ErrorContext::new()
                    .with_field_path("max_folder_depth")
                    .with_source("classifier_config"),
            ));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(Error::configuration_with_context(
                "temperature must be within 0.0..=2.0",
                ErrorContext::new()
                    .with_field_path("temperature")
                    .with_details(self.temperature.to_string())
                    .with_source("classifier_config"),
            ));
        }
        Ok(())
    }
}

fn env_u64(key: &str) -> Option<u64> {
    env::var(key).ok().and_then(|s| s.trim().parse::<u64>().ok())
}

fn check_url(value: &str, field: &str) -> Result<()> {
    let parsed = Url::parse(value).map_err(|e| {
        Error::configuration_with_context(
            format!("invalid URL: {}", e),
            ErrorContext::new()
                .with_field_path(field)
                .with_details(value)
                .with_source("classifier_config"),
        )
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(Error::configuration_with_context(
            format!("unsupported URL scheme '{}'", other),
            ErrorContext::new()
                .with_field_path(field)
                .with_source("classifier_config"),
        )),
    }
}
