//! Optimization reports.
//!
//! Composes the rewrite engine with token estimation and pricing: one
//! rewrite, two estimates (before and after), two costs. The report is
//! plain data with no references back into the optimizer.

use serde::Serialize;

use crate::config::Config;
use crate::error::{Result, TrimError};
use crate::models::{ModelRegistry, ResolvedModel, TokenizerFamily};
use crate::rewrite::{OptimizationResult, RewriteEngine};
use crate::tokenizer::{estimate_savings, CostEstimator};

/// Before/after token and cost comparison for one prompt
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptimizationReport {
    /// Provider host
    pub provider: String,
    /// Provider display name
    pub provider_name: String,
    /// Model ID used for pricing
    pub model: String,
    /// True when the requested model was unknown and the default was used
    pub model_fell_back: bool,
    /// Tokenizer family used for estimation
    pub family: TokenizerFamily,
    /// Estimated tokens before rewriting
    pub original_tokens: usize,
    /// Estimated tokens after rewriting
    pub optimized_tokens: usize,
    /// Tokens saved (negative if the rewrite grew the prompt)
    pub tokens_saved: i64,
    /// Tokens saved as a percentage of the original
    pub savings_percent: f64,
    /// Estimated cost of the original prompt (USD)
    pub original_cost: f64,
    /// Estimated cost of the optimized prompt (USD)
    pub optimized_cost: f64,
    /// Cost saved (USD)
    pub cost_saved: f64,
    /// The rewrite itself
    pub optimization: OptimizationResult,
}

/// Builds [`OptimizationReport`]s
///
/// # Example
/// ```
/// use tokentrim::report::Optimizer;
///
/// let optimizer = Optimizer::new();
/// let report = optimizer
///     .report("Could you please help me write an email in order to request a meeting?", "claude.ai", "")
///     .unwrap();
///
/// assert_eq!(report.model, "claude-3-5-sonnet");
/// assert!(report.optimized_tokens < report.original_tokens);
/// assert!(report.cost_saved > 0.0);
/// ```
#[derive(Debug, Default)]
pub struct Optimizer {
    registry: ModelRegistry,
    engine: RewriteEngine,
    costs: CostEstimator,
}

impl Optimizer {
    /// Create an optimizer with the built-in catalog, rules and cost model
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an optimizer from configuration
    pub fn from_config(config: &Config) -> Self {
        Self {
            registry: ModelRegistry::new(),
            engine: RewriteEngine::with_config(&config.engine),
            costs: CostEstimator::new().with_output_ratio(config.cost.output_ratio),
        }
    }

    /// Builder: replace the provider registry
    pub fn with_registry(mut self, registry: ModelRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Builder: replace the rewrite engine
    pub fn with_engine(mut self, engine: RewriteEngine) -> Self {
        self.engine = engine;
        self
    }

    /// Builder: replace the cost estimator
    pub fn with_cost_estimator(mut self, costs: CostEstimator) -> Self {
        self.costs = costs;
        self
    }

    /// The provider registry
    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    /// The rewrite engine
    pub fn engine(&self) -> &RewriteEngine {
        &self.engine
    }

    /// Optimize `text` and price it for a provider/model pair
    ///
    /// An unknown model under a known provider is priced with the
    /// provider's default model; an unknown provider is an error.
    pub fn report(&self, text: &str, provider: &str, model: &str) -> Result<OptimizationReport> {
        let resolved = self
            .registry
            .resolve(provider, model)
            .ok_or_else(|| TrimError::UnknownProvider(provider.to_string()))?;
        Ok(self.report_for(text, &resolved))
    }

    /// Optimize `text` and price it for an already-resolved model
    pub fn report_for(&self, text: &str, resolved: &ResolvedModel) -> OptimizationReport {
        let optimization = self.engine.optimize(text);
        let (original_tokens, optimized_tokens, tokens_saved, savings_percent) =
            estimate_savings(text, &optimization.optimized_text, resolved.family);

        let pricing = &resolved.model.pricing;
        let original_cost = self.costs.for_pricing(original_tokens, pricing);
        let optimized_cost = self.costs.for_pricing(optimized_tokens, pricing);

        tracing::debug!(
            provider = %resolved.provider,
            model = %resolved.model.id,
            original_tokens,
            optimized_tokens,
            "report built"
        );

        OptimizationReport {
            provider: resolved.provider.clone(),
            provider_name: resolved.provider_name.clone(),
            model: resolved.model.id.clone(),
            model_fell_back: resolved.fell_back,
            family: resolved.family,
            original_tokens,
            optimized_tokens,
            tokens_saved,
            savings_percent,
            original_cost,
            optimized_cost,
            cost_saved: original_cost - optimized_cost,
            optimization,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ModelCard, ModelPricing, ProviderCard};
    use crate::tokenizer::{calculate_cost, estimate_tokens};

    const PROMPT: &str = "Could you please help me write an email in order to request a meeting?";

    #[test]
    fn test_report_matches_components() {
        let report = Optimizer::new().report(PROMPT, "chat.openai.com", "gpt-4o").unwrap();

        let optimized = "write an email to request a meeting?";
        assert_eq!(report.optimization.optimized_text, optimized);
        assert_eq!(report.original_tokens, estimate_tokens(PROMPT, TokenizerFamily::Gpt));
        assert_eq!(report.optimized_tokens, estimate_tokens(optimized, TokenizerFamily::Gpt));
        assert_eq!(
            report.original_cost,
            calculate_cost(report.original_tokens, 2.5, Some(10.0))
        );
        assert!(report.tokens_saved > 0);
        assert!((report.cost_saved - (report.original_cost - report.optimized_cost)).abs() < 1e-15);
        assert!(!report.model_fell_back);
    }

    #[test]
    fn test_report_uses_provider_family() {
        let report = Optimizer::new().report(PROMPT, "mistral.ai", "").unwrap();
        assert_eq!(report.family, TokenizerFamily::Mistral);
        assert_eq!(report.model, "mistral-large-2");
        assert!(report.model_fell_back);
    }

    #[test]
    fn test_unknown_provider() {
        let err = Optimizer::new().report(PROMPT, "example.com", "x").unwrap_err();
        assert!(matches!(err, TrimError::UnknownProvider(p) if p == "example.com"));
    }

    #[test]
    fn test_empty_prompt() {
        let report = Optimizer::new().report("", "claude.ai", "").unwrap();
        assert_eq!(report.original_tokens, 0);
        assert_eq!(report.optimized_tokens, 0);
        assert_eq!(report.original_cost, 0.0);
        assert_eq!(report.savings_percent, 0.0);
        assert!(report.optimization.changes.is_empty());
    }

    #[test]
    fn test_custom_registry_and_ratio() {
        let registry = ModelRegistry::with_providers([ProviderCard::new(
            "local.test",
            "Local",
            TokenizerFamily::Llama,
        )
        .model(ModelCard::new("tiny", "Tiny", ModelPricing::per_million(1.0, 100.0)))]);

        let optimizer = Optimizer::new()
            .with_registry(registry)
            .with_cost_estimator(CostEstimator::new().with_output_ratio(0.0));
        let report = optimizer.report(PROMPT, "local.test", "tiny").unwrap();

        assert_eq!(report.family, TokenizerFamily::Llama);
        // Output ratio 0 leaves only the input rate
        let expected = report.original_tokens as f64 / 1_000_000.0;
        assert!((report.original_cost - expected).abs() < 1e-15);
    }

    #[test]
    fn test_from_config() {
        let mut config = Config::default();
        config.engine.conciseness = false;

        let report = Optimizer::from_config(&config)
            .report(PROMPT, "chat.openai.com", "")
            .unwrap();
        assert!(report
            .optimization
            .optimized_text
            .starts_with("Could you please"));
    }

    #[test]
    fn test_report_serializes() {
        let report = Optimizer::new().report(PROMPT, "claude.ai", "").unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["family"], "claude");
        assert_eq!(json["optimization"]["changes"][0]["kind"], "filler_removal");
    }
}
