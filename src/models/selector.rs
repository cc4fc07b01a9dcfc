use super::{ModelCatalog, ModelDescriptor};

/// Known-good models, most preferred first.
pub const PREFERRED_MODELS: [&str; 8] = [
    "openai/gpt-4o-mini",
    "openai/gpt-4o",
    "anthropic/claude-3.5-sonnet",
    "anthropic/claude-3-opus",
    "anthropic/claude-3-haiku",
    "google/gemini-flash-1.5",
    "meta/llama-3.1-70b-instruct",
    "meta/llama-3.1-8b-instruct",
];

// Families that are reliably chat-capable.
const CHAT_FAMILIES: [&str; 4] = ["gpt", "claude", "llama", "gemini"];

/// Picks a default model out of `models`.
///
/// The first [`PREFERRED_MODELS`] entry present wins; then the first model from a
/// well-known chat family; then simply the first model. `None` only for an empty
/// catalog.
pub fn select_default(models: &[ModelDescriptor]) -> Option<String> {
    let first = models.first()?;

    if let Some(preferred) = PREFERRED_MODELS
        .iter()
        .find(|preferred| models.iter().any(|m| m.id == **preferred))
    {
        return Some(preferred.to_string());
    }

    let heuristic = models.iter().find(|m| {
        let id = m.id.to_lowercase();
        CHAT_FAMILIES.iter().any(|family| id.contains(family))
    });

    Some(heuristic.unwrap_or(first).id.clone())
}

impl ModelCatalog {
    /// Chooses a default model from the (possibly cached) catalog.
    ///
    /// Catalog failures are logged and reported as `None`: having no default is an
    /// expected outcome the caller handles, not an error.
    pub async fn choose_default(&self, credential: &str) -> Option<String> {
        match self.fetch_models(credential, false).await {
            Ok(models) => {
                let choice = select_default(&models);
                tracing::debug!(choice = ?choice, available = models.len(), "chose default model");
                choice
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to choose default model");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog(ids: &[&str]) -> Vec<ModelDescriptor> {
        ids.iter().map(|id| ModelDescriptor::new(*id)).collect()
    }

    #[test]
    fn test_first_preferred_wins_regardless_of_catalog_order() {
        let models = catalog(&[
            "anthropic/claude-3-haiku",
            "openai/gpt-4o",
            "openai/gpt-4o-mini",
        ]);
        assert_eq!(select_default(&models).as_deref(), Some("openai/gpt-4o-mini"));
    }

    #[test]
    fn test_lower_ranked_preferred_model() {
        let models = catalog(&["mistral/mixtral", "meta/llama-3.1-8b-instruct"]);
        assert_eq!(
            select_default(&models).as_deref(),
            Some("meta/llama-3.1-8b-instruct")
        );
    }

    #[test]
    fn test_heuristic_match_is_case_insensitive() {
        let models = catalog(&["mistral/mixtral-8x7b", "Vendor/Custom-GPT-Mini", "x/claude-next"]);
        assert_eq!(
            select_default(&models).as_deref(),
            Some("Vendor/Custom-GPT-Mini")
        );
    }

    #[test]
    fn test_first_entry_when_nothing_matches() {
        let models = catalog(&["mistral/mixtral-8x7b", "qwen/qwen-2-72b"]);
        assert_eq!(select_default(&models).as_deref(), Some("mistral/mixtral-8x7b"));
    }

    #[test]
    fn test_empty_catalog() {
        assert_eq!(select_default(&[]), None);
    }
}
