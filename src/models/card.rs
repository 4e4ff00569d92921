//! Model card data structures.
//!
//! This module defines the core types for provider/model metadata:
//! - `TokenizerFamily`: which estimation formula a provider's text is counted with
//! - `ModelPricing`: per-million-token input/output rates
//! - `ModelCard`: a single model with its pricing
//! - `ProviderCard`: a chat service (keyed by host) with its family and models
//!
//! Families are a static classification standing in for each provider's
//! proprietary tokenizer; nothing here talks to a live model.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Tokenizer family used to pick an estimation formula
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TokenizerFamily {
    /// OpenAI GPT models
    #[default]
    Gpt,
    /// Anthropic Claude models
    Claude,
    /// Google Gemini models
    Gemini,
    /// Meta Llama models
    Llama,
    /// DeepSeek models (counted with the GPT formula)
    DeepSeek,
    /// X.AI Grok models (counted with the GPT formula)
    Grok,
    /// Mistral AI models
    Mistral,
}

impl TokenizerFamily {
    /// Every family, in display order
    pub const ALL: [TokenizerFamily; 7] = [
        TokenizerFamily::Gpt,
        TokenizerFamily::Claude,
        TokenizerFamily::Gemini,
        TokenizerFamily::Llama,
        TokenizerFamily::DeepSeek,
        TokenizerFamily::Grok,
        TokenizerFamily::Mistral,
    ];

    /// Get family name as string
    pub fn name(&self) -> &'static str {
        match self {
            TokenizerFamily::Gpt => "gpt",
            TokenizerFamily::Claude => "claude",
            TokenizerFamily::Gemini => "gemini",
            TokenizerFamily::Llama => "llama",
            TokenizerFamily::DeepSeek => "deepseek",
            TokenizerFamily::Grok => "grok",
            TokenizerFamily::Mistral => "mistral",
        }
    }

    /// Parse a family name, falling back to `Gpt` for anything unrecognized
    ///
    /// # Examples
    /// ```
    /// use tokentrim::models::TokenizerFamily;
    ///
    /// assert_eq!(TokenizerFamily::from_name("Claude"), TokenizerFamily::Claude);
    /// assert_eq!(TokenizerFamily::from_name("palm"), TokenizerFamily::Gpt);
    /// ```
    pub fn from_name(name: &str) -> Self {
        name.parse().unwrap_or_default()
    }
}

impl fmt::Display for TokenizerFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TokenizerFamily {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gpt" | "openai" => Ok(TokenizerFamily::Gpt),
            "claude" | "anthropic" => Ok(TokenizerFamily::Claude),
            "gemini" | "google" => Ok(TokenizerFamily::Gemini),
            "llama" | "meta" => Ok(TokenizerFamily::Llama),
            "deepseek" => Ok(TokenizerFamily::DeepSeek),
            "grok" | "xai" => Ok(TokenizerFamily::Grok),
            "mistral" => Ok(TokenizerFamily::Mistral),
            other => Err(format!("unknown tokenizer family: {other}")),
        }
    }
}

/// Token pricing information (USD per million tokens)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelPricing {
    /// Cost per million input tokens (USD)
    pub input_per_million: f64,
    /// Cost per million output tokens (USD)
    pub output_per_million: f64,
}

impl ModelPricing {
    /// Create pricing from per-million token rates
    pub const fn per_million(input_per_million: f64, output_per_million: f64) -> Self {
        Self {
            input_per_million,
            output_per_million,
        }
    }

    /// Input rate expressed per single token
    pub fn input_per_token(&self) -> f64 {
        self.input_per_million / 1_000_000.0
    }

    /// Output rate expressed per single token
    pub fn output_per_token(&self) -> f64 {
        self.output_per_million / 1_000_000.0
    }
}

/// Model metadata card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelCard {
    /// Model ID as the service reports it (e.g., "gpt-4o")
    pub id: String,

    /// Display name (e.g., "GPT-4o")
    pub name: String,

    /// Pricing information
    pub pricing: ModelPricing,
}

impl ModelCard {
    /// Create a new model card
    pub fn new(id: impl Into<String>, name: impl Into<String>, pricing: ModelPricing) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            pricing,
        }
    }
}

/// Chat service metadata card
///
/// The first model in `models` is the service's default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderCard {
    /// Service host, used as the provider key (e.g., "claude.ai")
    pub host: String,

    /// Display name (e.g., "Anthropic")
    pub name: String,

    /// Tokenizer family for token estimation
    pub family: TokenizerFamily,

    /// Models offered by the service, default first
    pub models: Vec<ModelCard>,
}

impl ProviderCard {
    /// Create a provider with no models
    pub fn new(host: impl Into<String>, name: impl Into<String>, family: TokenizerFamily) -> Self {
        Self {
            host: host.into(),
            name: name.into(),
            family,
            models: Vec::new(),
        }
    }

    /// Builder: add a model (the first added becomes the default)
    pub fn model(mut self, card: ModelCard) -> Self {
        self.models.push(card);
        self
    }

    /// The default model, if the provider lists any
    pub fn default_model(&self) -> Option<&ModelCard> {
        self.models.first()
    }

    /// Find a model by exact ID (case-insensitive)
    pub fn find_model(&self, id: &str) -> Option<&ModelCard> {
        self.models.iter().find(|m| m.id.eq_ignore_ascii_case(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_family_parse() {
        assert_eq!("gpt".parse::<TokenizerFamily>(), Ok(TokenizerFamily::Gpt));
        assert_eq!(" Mistral ".parse::<TokenizerFamily>(), Ok(TokenizerFamily::Mistral));
        assert!("bert".parse::<TokenizerFamily>().is_err());
    }

    #[test]
    fn test_family_fallback() {
        assert_eq!(TokenizerFamily::from_name(""), TokenizerFamily::Gpt);
        assert_eq!(TokenizerFamily::from_name("unknown"), TokenizerFamily::Gpt);
        assert_eq!(TokenizerFamily::from_name("grok"), TokenizerFamily::Grok);
    }

    #[test]
    fn test_family_serde() {
        let json = serde_json::to_string(&TokenizerFamily::DeepSeek).unwrap();
        assert_eq!(json, "\"deepseek\"");
        let back: TokenizerFamily = serde_json::from_str(&json).unwrap();
        assert_eq!(back, TokenizerFamily::DeepSeek);
    }

    #[test]
    fn test_pricing_per_token() {
        let pricing = ModelPricing::per_million(2.5, 10.0);
        assert!((pricing.input_per_token() - 0.0000025).abs() < 1e-12);
        assert!((pricing.output_per_token() - 0.00001).abs() < 1e-12);
    }

    #[test]
    fn test_provider_default_model() {
        let provider = ProviderCard::new("example.ai", "Example", TokenizerFamily::Llama)
            .model(ModelCard::new("big", "Big", ModelPricing::per_million(1.0, 2.0)))
            .model(ModelCard::new("small", "Small", ModelPricing::per_million(0.1, 0.2)));

        assert_eq!(provider.default_model().map(|m| m.id.as_str()), Some("big"));
        assert_eq!(provider.find_model("SMALL").map(|m| m.name.as_str()), Some("Small"));
        assert!(provider.find_model("medium").is_none());
    }
}
