//! Provider registry for model lookups and pricing resolution.
//!
//! The registry provides:
//! - Provider lookup by service host or display name
//! - Tokenizer family resolution (GPT fallback for unknown providers)
//! - Model resolution with fallback to the provider's default model
//! - Model detection from free-form labels ("GPT-4o mini", "Claude Opus")
//!
//! The registry is built once and never mutated afterwards; alternate
//! catalogs are injected through [`ModelRegistry::with_providers`].

use std::collections::HashMap;

use serde::Serialize;

use crate::models::card::{ModelCard, ProviderCard, TokenizerFamily};
use crate::models::embedded::get_embedded_providers;

/// A provider/model pair resolved against the catalog
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedModel {
    /// Provider host
    pub provider: String,
    /// Provider display name
    pub provider_name: String,
    /// Tokenizer family for estimation
    pub family: TokenizerFamily,
    /// The resolved model card
    pub model: ModelCard,
    /// True when the requested model was unknown and the default was used
    pub fell_back: bool,
}

/// Immutable provider registry
///
/// # Example
/// ```
/// use tokentrim::models::{ModelRegistry, TokenizerFamily};
///
/// let registry = ModelRegistry::new();
///
/// // Lookup by host
/// let provider = registry.get("claude.ai").unwrap();
/// assert_eq!(provider.family, TokenizerFamily::Claude);
///
/// // Resolve a model, falling back to the provider default
/// let resolved = registry.resolve("chat.openai.com", "gpt-9").unwrap();
/// assert_eq!(resolved.model.id, "gpt-4o");
/// assert!(resolved.fell_back);
/// ```
#[derive(Debug, Clone)]
pub struct ModelRegistry {
    /// Providers in catalog order
    providers: Vec<ProviderCard>,

    /// Lowercased host or display name -> index into `providers`
    index: HashMap<String, usize>,
}

impl Default for ModelRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelRegistry {
    /// Create a new registry with the embedded catalog loaded
    pub fn new() -> Self {
        Self::with_providers(get_embedded_providers())
    }

    /// Create a registry from an explicit catalog
    ///
    /// Later entries with a host already present replace the earlier one.
    pub fn with_providers(cards: impl IntoIterator<Item = ProviderCard>) -> Self {
        let mut registry = Self {
            providers: Vec::new(),
            index: HashMap::new(),
        };

        for card in cards {
            registry.insert(card);
        }
        registry
    }

    fn insert(&mut self, card: ProviderCard) {
        let host_key = card.host.to_lowercase();
        let name_key = card.name.to_lowercase();

        let slot = if let Some(&existing) = self.index.get(&host_key) {
            self.providers[existing] = card;
            existing
        } else {
            self.providers.push(card);
            self.providers.len() - 1
        };

        self.index.insert(host_key, slot);
        // Display names are a convenience alias; hosts win on collision
        self.index.entry(name_key).or_insert(slot);
    }

    /// Get a provider by host or display name (case-insensitive)
    pub fn get(&self, provider: &str) -> Option<&ProviderCard> {
        self.index
            .get(&provider.trim().to_lowercase())
            .map(|&i| &self.providers[i])
    }

    /// Check if a provider exists in the registry
    pub fn contains(&self, provider: &str) -> bool {
        self.get(provider).is_some()
    }

    /// Get the tokenizer family for a provider (GPT for unknown providers)
    pub fn family_for(&self, provider: &str) -> TokenizerFamily {
        self.get(provider).map(|p| p.family).unwrap_or_default()
    }

    /// Resolve a provider/model pair
    ///
    /// Unknown models under a known provider resolve to the provider's
    /// default model. Unknown providers, or providers with no models,
    /// resolve to `None`.
    pub fn resolve(&self, provider: &str, model: &str) -> Option<ResolvedModel> {
        let card = self.get(provider)?;

        let (model_card, fell_back) = match card.find_model(model) {
            Some(found) => (found, false),
            None => {
                let default = card.default_model()?;
                tracing::debug!(
                    provider = %card.host,
                    requested = model,
                    fallback = %default.id,
                    "unknown model, using provider default"
                );
                (default, true)
            },
        };

        Some(ResolvedModel {
            provider: card.host.clone(),
            provider_name: card.name.clone(),
            family: card.family,
            model: model_card.clone(),
            fell_back,
        })
    }

    /// Map a free-form model label onto a catalog model ID
    ///
    /// Matches model IDs and display names as case-insensitive substrings,
    /// preferring the longest match so "gpt-4o-mini" beats "gpt-4o".
    /// Falls back to the provider default when nothing matches.
    pub fn detect_model(&self, provider: &str, label: &str) -> Option<&ModelCard> {
        let card = self.get(provider)?;
        let label = label.to_lowercase().replace(' ', "-");

        card.models
            .iter()
            .filter_map(|m| {
                let id = m.id.to_lowercase();
                let name = m.name.to_lowercase().replace(' ', "-");
                let id_hit = label.contains(&id).then_some(id.len());
                let name_hit = label.contains(&name).then_some(name.len());
                let variant_hit = model_variant(&id)
                    .filter(|v| label.contains(v))
                    .map(str::len);
                id_hit.max(name_hit).max(variant_hit).map(|len| (len, m))
            })
            .max_by_key(|(len, _)| *len)
            .map(|(_, m)| m)
            .or_else(|| card.default_model())
    }

    /// Iterate over all providers in catalog order
    pub fn iter(&self) -> impl Iterator<Item = &ProviderCard> {
        self.providers.iter()
    }

    /// Number of providers
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Check if registry is empty
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

/// Distinctive variant word of a model ID ("claude-3-opus" -> "opus")
fn model_variant(id: &str) -> Option<&str> {
    const VARIANTS: &[&str] = &["opus", "sonnet", "haiku", "flash", "coder", "mini"];
    VARIANTS.iter().copied().find(|v| id.contains(v))
}
