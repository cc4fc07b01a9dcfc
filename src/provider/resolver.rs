use super::{ProviderDescriptor, ProviderId};

/// Credentials longer than this (in characters) are assumed to be Moonshot keys
/// when nothing more specific matched.
const LONG_CREDENTIAL_CHARS: usize = 40;

/// Picks the provider for a classification request.
///
/// A `preference` naming a known provider id always wins. Otherwise the provider is
/// inferred from the credential text. The returned descriptor is an owned copy and
/// may be customized freely.
pub fn resolve_provider(credential: &str, preference: Option<&str>) -> ProviderDescriptor {
    let explicit = preference
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .and_then(ProviderId::from_id);
    explicit
        .unwrap_or_else(|| detect_provider(credential))
        .descriptor()
}

/// Ordered credential heuristics; the first matching rule wins.
///
/// The order matters: an `sk-or-v1-` key is excluded from the OpenAI rule only by its
/// `or-v1` marker, and any long generic token lands on Moonshot before the Grok rule
/// is consulted.
pub fn detect_provider(credential: &str) -> ProviderId {
    if credential.starts_with("gsk_") {
        ProviderId::Groq
    } else if credential.starts_with("sk-")
        && !credential.contains("kimi")
        && !credential.contains("or-v1")
    {
        ProviderId::OpenAI
    } else if credential.starts_with("sk-or-v1-") || credential.contains("openrouter") {
        ProviderId::OpenRouter
    } else if credential.contains("kimi") || credential.chars().count() > LONG_CREDENTIAL_CHARS {
        ProviderId::Moonshot
    } else if credential.contains("grok") || credential.starts_with("xai-") {
        ProviderId::Grok
    } else {
        // OpenRouter aggregates many vendors, so an unknown key has the best odds there.
        ProviderId::OpenRouter
    }
}
