//! Token estimation implementation.
//!
//! Each tokenizer family has a fixed arithmetic formula over the surface
//! metrics of the text (words, characters, ASCII symbols, non-ASCII
//! characters). No vocabulary is loaded and no model is called, so
//! estimation is deterministic and never fails.
//!
//! Character counts are Unicode scalar values; text outside the Basic
//! Multilingual Plane counts one character per scalar.

use crate::models::{ModelRegistry, TokenizerFamily};
use crate::text::TextMetrics;

/// Estimate tokens for a text with the given tokenizer family
///
/// Returns 0 for empty or whitespace-only text, and at least 1 otherwise.
///
/// # Example
/// ```
/// use tokentrim::tokenizer::estimate_tokens;
/// use tokentrim::models::TokenizerFamily;
///
/// assert_eq!(estimate_tokens("Hello world", TokenizerFamily::Gpt), 3);
/// assert_eq!(estimate_tokens("   ", TokenizerFamily::Claude), 0);
/// ```
pub fn estimate_tokens(text: &str, family: TokenizerFamily) -> usize {
    if text.trim().is_empty() {
        return 0;
    }

    let m = TextMetrics::measure(text);
    let estimate = match family {
        TokenizerFamily::Gpt | TokenizerFamily::DeepSeek | TokenizerFamily::Grok => gpt(&m),
        TokenizerFamily::Claude => claude(&m),
        TokenizerFamily::Gemini => gemini(&m),
        TokenizerFamily::Llama => llama(&m),
        TokenizerFamily::Mistral => mistral(&m),
    };

    estimate.max(1)
}

/// Estimate tokens for a family given by name (unknown names use GPT)
pub fn estimate_tokens_by_name(text: &str, family: &str) -> usize {
    estimate_tokens(text, TokenizerFamily::from_name(family))
}

fn gpt(m: &TextMetrics) -> usize {
    let words = (m.words as f64 * 1.3).ceil();
    let chars = (m.chars as f64 / 4.0).ceil() * 0.1;
    let symbols = m.symbols as f64 * 0.5;
    let non_ascii = m.non_ascii as f64 * 0.3;
    (words + chars + symbols + non_ascii).round() as usize
}

fn claude(m: &TextMetrics) -> usize {
    let base = (m.chars as f64 / 3.5).ceil();
    let word_bonus = (m.words as f64 * 0.2).ceil();
    (base + word_bonus) as usize
}

fn gemini(m: &TextMetrics) -> usize {
    (m.chars as f64 / 4.0 + m.words as f64 * 0.3).ceil() as usize
}

fn llama(m: &TextMetrics) -> usize {
    (m.words as f64 * 1.2 + m.chars as f64 / 4.5).ceil() as usize
}

fn mistral(m: &TextMetrics) -> usize {
    (m.words as f64 * 1.1 + m.chars as f64 / 4.2).ceil() as usize
}

/// Token counter bound to one tokenizer family
///
/// # Example
/// ```
/// use tokentrim::tokenizer::TokenCounter;
/// use tokentrim::models::{ModelRegistry, TokenizerFamily};
///
/// let counter = TokenCounter::for_provider(&ModelRegistry::new(), "claude.ai");
/// assert_eq!(counter.family(), TokenizerFamily::Claude);
///
/// let total = counter.count_many(&["Hello", "World"]);
/// assert!(total >= 2);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenCounter {
    family: TokenizerFamily,
}

impl TokenCounter {
    /// Create a new token counter for the specified family
    pub fn new(family: TokenizerFamily) -> Self {
        Self { family }
    }

    /// Create a token counter for a provider (GPT for unknown providers)
    pub fn for_provider(registry: &ModelRegistry, provider: &str) -> Self {
        Self::new(registry.family_for(provider))
    }

    /// Count tokens in text
    pub fn count(&self, text: &str) -> usize {
        estimate_tokens(text, self.family)
    }

    /// Count tokens in multiple texts
    pub fn count_many(&self, texts: &[&str]) -> usize {
        texts.iter().map(|t| self.count(t)).sum()
    }

    /// Get the family used by this counter
    pub fn family(&self) -> TokenizerFamily {
        self.family
    }
}

/// Estimate token savings from a rewrite
///
/// Returns (original_tokens, optimized_tokens, savings, savings_percent).
/// Savings are negative when the rewrite grew the text.
pub fn estimate_savings(
    original: &str,
    optimized: &str,
    family: TokenizerFamily,
) -> (usize, usize, i64, f64) {
    let original_tokens = estimate_tokens(original, family);
    let optimized_tokens = estimate_tokens(optimized, family);
    let savings = original_tokens as i64 - optimized_tokens as i64;
    let savings_percent = if original_tokens > 0 {
        (savings as f64 / original_tokens as f64) * 100.0
    } else {
        0.0
    };

    (original_tokens, optimized_tokens, savings, savings_percent)
}
