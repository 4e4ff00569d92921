//! Embedded provider and model definitions.
//!
//! This module contains the compile-time catalog of chat services, keyed by
//! the host the service is reached on. Rates are USD per million tokens.
//!
//! Covered services:
//! - OpenAI (chat.openai.com)
//! - Anthropic (claude.ai)
//! - Google (gemini.google.com)
//! - Meta (llama.meta.ai)
//! - DeepSeek (deepseek.com)
//! - X.AI (grok.x.ai)
//! - Mistral (mistral.ai)
//! - Lovable (lovable.io, Claude-backed)

use crate::models::{ModelCard, ModelPricing, ProviderCard, TokenizerFamily};

/// Embedded model definition tuple: (id, display name, input $/1M, output $/1M)
pub type EmbeddedModel = (&'static str, &'static str, f64, f64);

/// Embedded provider definition tuple: (host, display name, family, models)
///
/// The first model of each provider is its default.
pub type EmbeddedProvider = (
    &'static str,
    &'static str,
    TokenizerFamily,
    &'static [EmbeddedModel],
);

/// All embedded provider definitions
pub static EMBEDDED_PROVIDERS: &[EmbeddedProvider] = &[
    (
        "chat.openai.com",
        "OpenAI",
        TokenizerFamily::Gpt,
        &[
            ("gpt-4o", "GPT-4o", 2.50, 10.00),
            ("gpt-4o-mini", "GPT-4o Mini", 0.15, 0.60),
            ("gpt-4-turbo", "GPT-4 Turbo", 10.00, 30.00),
            ("gpt-3.5-turbo", "GPT-3.5 Turbo", 0.50, 1.50),
        ],
    ),
    (
        "claude.ai",
        "Anthropic",
        TokenizerFamily::Claude,
        &[
            ("claude-3-5-sonnet", "Claude 3.5 Sonnet", 3.00, 15.00),
            ("claude-3-opus", "Claude 3 Opus", 15.00, 75.00),
            ("claude-3-haiku", "Claude 3 Haiku", 0.25, 1.25),
        ],
    ),
    (
        "gemini.google.com",
        "Google",
        TokenizerFamily::Gemini,
        &[
            ("gemini-1.5-pro", "Gemini 1.5 Pro", 1.25, 5.00),
            ("gemini-1.5-flash", "Gemini 1.5 Flash", 0.075, 0.30),
            ("gemini-1.0-pro", "Gemini 1.0 Pro", 0.50, 1.50),
        ],
    ),
    (
        "llama.meta.ai",
        "Meta",
        TokenizerFamily::Llama,
        &[
            ("llama-3.1-70b", "Llama 3.1 70B", 0.99, 2.99),
            ("llama-3.1-405b", "Llama 3.1 405B", 5.32, 16.00),
            ("llama-3.1-8b", "Llama 3.1 8B", 0.20, 0.20),
        ],
    ),
    (
        "deepseek.com",
        "DeepSeek",
        TokenizerFamily::DeepSeek,
        &[
            ("deepseek-v2.5", "DeepSeek V2.5", 0.14, 0.28),
            ("deepseek-coder-v2", "DeepSeek Coder V2", 0.14, 0.28),
        ],
    ),
    (
        "grok.x.ai",
        "xAI",
        TokenizerFamily::Grok,
        &[("grok-beta", "Grok Beta", 5.00, 15.00)],
    ),
    (
        "mistral.ai",
        "Mistral",
        TokenizerFamily::Mistral,
        &[
            ("mistral-large-2", "Mistral Large 2", 2.00, 6.00),
            ("mistral-small", "Mistral Small", 0.20, 0.60),
        ],
    ),
    (
        "lovable.io",
        "Lovable",
        TokenizerFamily::Claude,
        &[(
            "claude-3-5-sonnet",
            "Claude 3.5 Sonnet (Lovable)",
            3.00,
            15.00,
        )],
    ),
];

/// Convert an embedded definition to a ProviderCard
fn provider_from_embedded(def: &EmbeddedProvider) -> ProviderCard {
    let (host, name, family, models) = *def;
    models.iter().fold(
        ProviderCard::new(host, name, family),
        |card, &(id, model_name, input, output)| {
            card.model(ModelCard::new(
                id,
                model_name,
                ModelPricing::per_million(input, output),
            ))
        },
    )
}

/// Get all embedded providers as ProviderCards, in catalog order
pub fn get_embedded_providers() -> Vec<ProviderCard> {
    EMBEDDED_PROVIDERS.iter().map(provider_from_embedded).collect()
}

/// Get an embedded provider by host
pub fn get_embedded_by_host(host: &str) -> Option<ProviderCard> {
    EMBEDDED_PROVIDERS
        .iter()
        .find(|(h, _, _, _)| h.eq_ignore_ascii_case(host))
        .map(provider_from_embedded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_embedded_providers_load() {
        let providers = get_embedded_providers();
        assert_eq!(providers.len(), EMBEDDED_PROVIDERS.len());
        assert!(providers.iter().all(|p| !p.models.is_empty()));
    }

    #[test]
    fn test_no_duplicate_hosts() {
        let mut seen = HashSet::new();
        for (host, _, _, _) in EMBEDDED_PROVIDERS {
            assert!(seen.insert(*host), "Duplicate host: {host}");
        }
    }

    #[test]
    fn test_rates_non_negative() {
        for provider in get_embedded_providers() {
            for model in &provider.models {
                assert!(model.pricing.input_per_million >= 0.0, "{}", model.id);
                assert!(model.pricing.output_per_million >= 0.0, "{}", model.id);
            }
        }
    }

    #[test]
    fn test_lookup_by_host() {
        let claude = get_embedded_by_host("claude.ai").unwrap();
        assert_eq!(claude.family, TokenizerFamily::Claude);
        assert_eq!(
            claude.default_model().map(|m| m.id.as_str()),
            Some("claude-3-5-sonnet")
        );
        assert!(get_embedded_by_host("example.com").is_none());
    }
}
