//! Cost estimation for chat prompts.
//!
//! Costs are USD computed from per-million-token rates. When an output rate
//! is supplied, the completion is assumed to be a fixed fraction of the
//! prompt's token count. That fraction is a heuristic, not a measurement, so
//! it is exposed as [`DEFAULT_OUTPUT_RATIO`] and overridable per estimator.

use serde::{Deserialize, Serialize};

use crate::models::ModelPricing;

/// Assumed completion size as a fraction of prompt tokens
pub const DEFAULT_OUTPUT_RATIO: f64 = 0.3;

const PER_MILLION: f64 = 1_000_000.0;

/// Calculate the cost of `tokens` input tokens
///
/// With an output rate, adds the cost of an estimated completion of
/// `tokens * 0.3` tokens. Never negative.
///
/// # Example
/// ```
/// use tokentrim::tokenizer::calculate_cost;
///
/// assert_eq!(calculate_cost(1_000_000, 2.50, None), 2.50);
/// assert_eq!(calculate_cost(0, 3.0, Some(15.0)), 0.0);
/// ```
pub fn calculate_cost(tokens: usize, input_rate: f64, output_rate: Option<f64>) -> f64 {
    CostEstimator::default().estimate(tokens, input_rate, output_rate)
}

/// Cost breakdown for one prompt
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CostBreakdown {
    /// Cost of the prompt tokens
    pub input: f64,
    /// Cost of the estimated completion tokens
    pub output: f64,
}

impl CostBreakdown {
    /// Input plus estimated output
    pub fn total(&self) -> f64 {
        self.input + self.output
    }
}

/// Cost estimator with a configurable output-token ratio
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostEstimator {
    output_ratio: f64,
}

impl Default for CostEstimator {
    fn default() -> Self {
        Self {
            output_ratio: DEFAULT_OUTPUT_RATIO,
        }
    }
}

impl CostEstimator {
    /// Create an estimator with the default output ratio
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set the output ratio (negative or NaN values become 0)
    pub fn with_output_ratio(mut self, ratio: f64) -> Self {
        self.output_ratio = ratio.max(0.0);
        self
    }

    /// The configured output ratio
    pub fn output_ratio(&self) -> f64 {
        self.output_ratio
    }

    /// Split cost into input and estimated output parts
    pub fn breakdown(&self, tokens: usize, input_rate: f64, output_rate: Option<f64>) -> CostBreakdown {
        let tokens = tokens as f64;
        let input = tokens / PER_MILLION * input_rate.max(0.0);
        let output = output_rate.map_or(0.0, |rate| {
            tokens * self.output_ratio / PER_MILLION * rate.max(0.0)
        });

        CostBreakdown { input, output }
    }

    /// Total estimated cost in USD
    pub fn estimate(&self, tokens: usize, input_rate: f64, output_rate: Option<f64>) -> f64 {
        self.breakdown(tokens, input_rate, output_rate).total()
    }

    /// Total estimated cost for a model's pricing (input and output)
    pub fn for_pricing(&self, tokens: usize, pricing: &ModelPricing) -> f64 {
        self.estimate(
            tokens,
            pricing.input_per_million,
            Some(pricing.output_per_million),
        )
    }
}
