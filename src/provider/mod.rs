//! Provider catalog and resolution.
//!
//! The catalog is an immutable static table. Lookups hand out owned
//! [`ProviderDescriptor`] values, so overriding the model for one request
//! ([`ProviderDescriptor::with_model`]) never leaks into later resolutions.

mod resolver;

pub use resolver::{detect_provider, resolve_provider};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Known chat-completion backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    OpenAI,
    Moonshot,
    Grok,
    OpenRouter,
    Groq,
}

impl ProviderId {
    pub const ALL: [ProviderId; 5] = [
        ProviderId::OpenAI,
        ProviderId::Moonshot,
        ProviderId::Grok,
        ProviderId::OpenRouter,
        ProviderId::Groq,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            ProviderId::OpenAI => "openai",
            ProviderId::Moonshot => "moonshot",
            ProviderId::Grok => "grok",
            ProviderId::OpenRouter => "openrouter",
            ProviderId::Groq => "groq",
        }
    }

    /// Exact, case-sensitive match against the stored preference ids.
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.id() == id)
    }

    /// Only OpenRouter exposes its model list at runtime.
    pub fn is_dynamic_catalog(&self) -> bool {
        matches!(self, ProviderId::OpenRouter)
    }

    pub fn descriptor(&self) -> ProviderDescriptor {
        self.entry().to_descriptor()
    }

    fn entry(&self) -> &'static ProviderEntry {
        match self {
            ProviderId::OpenAI => &OPENAI,
            ProviderId::Moonshot => &MOONSHOT,
            ProviderId::Grok => &GROK,
            ProviderId::OpenRouter => &OPENROUTER,
            ProviderId::Groq => &GROQ,
        }
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ProviderId {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_id(s).ok_or_else(|| {
            crate::Error::configuration_with_context(
                format!("unknown provider '{}'", s),
                crate::ErrorContext::new()
                    .with_field_path(crate::storage::keys::PROVIDER_PREFERENCE)
                    .with_details(format!(
                        "expected one of: {}",
                        Self::ALL.map(|p| p.id()).join(", ")
                    )),
            )
        })
    }
}

struct ProviderEntry {
    id: ProviderId,
    display_name: &'static str,
    base_endpoint: &'static str,
    default_model: &'static str,
}

impl ProviderEntry {
    fn to_descriptor(&self) -> ProviderDescriptor {
        ProviderDescriptor {
            id: self.id,
            display_name: self.display_name.to_string(),
            base_endpoint: self.base_endpoint.to_string(),
            model: self.default_model.to_string(),
        }
    }
}

static OPENAI: ProviderEntry = ProviderEntry {
    id: ProviderId::OpenAI,
    display_name: "OpenAI",
    base_endpoint: "https://api.openai.com/v1",
    default_model: "gpt-3.5-turbo",
};

static MOONSHOT: ProviderEntry = ProviderEntry {
    id: ProviderId::Moonshot,
    display_name: "Moonshot (Kimi)",
    base_endpoint: "https://api.moonshot.ai/v1",
    default_model: "kimi-k2-0711-preview",
};

static GROK: ProviderEntry = ProviderEntry {
    id: ProviderId::Grok,
    display_name: "Grok",
    base_endpoint: "https://api.x.ai/v1",
    default_model: "grok-beta",
};

static OPENROUTER: ProviderEntry = ProviderEntry {
    id: ProviderId::OpenRouter,
    display_name: "OpenRouter",
    base_endpoint: "https://openrouter.ai/api/v1",
    default_model: "openai/gpt-4o-mini",
};

static GROQ: ProviderEntry = ProviderEntry {
    id: ProviderId::Groq,
    display_name: "Groq",
    base_endpoint: "https://api.groq.com/openai/v1",
    default_model: "llama-3.3-70b-versatile",
};

/// Owned copy of a catalog entry; `model` starts as the provider default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderDescriptor {
    pub id: ProviderId,
    pub display_name: String,
    pub base_endpoint: String,
    pub model: String,
}

impl ProviderDescriptor {
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn is_dynamic_catalog(&self) -> bool {
        self.id.is_dynamic_catalog()
    }

    /// `{base}/chat/completions`, honoring an optional base override.
    pub fn completions_url(&self, base_override: Option<&str>) -> String {
        let base = base_override.unwrap_or(&self.base_endpoint);
        format!("{}/chat/completions", base.trim_end_matches('/'))
    }
}
