//! Token estimation and cost utilities.
//!
//! This module approximates provider tokenizers with per-family arithmetic
//! heuristics instead of running a real tokenizer, and prices the result
//! from per-million-token rates.
//!
//! # Families
//!
//! | Family               | Formula                                                        |
//! |----------------------|----------------------------------------------------------------|
//! | gpt, deepseek, grok  | `round(ceil(w*1.3) + 0.1*ceil(c/4) + 0.5*sym + 0.3*nonascii)`  |
//! | claude               | `ceil(c/3.5) + ceil(w*0.2)`                                    |
//! | gemini               | `ceil(c/4 + w*0.3)`                                            |
//! | llama                | `ceil(w*1.2 + c/4.5)`                                          |
//! | mistral              | `ceil(w*1.1 + c/4.2)`                                          |
//!
//! Every family floors at 1 for non-blank text and returns 0 for blank text.
//!
//! # Example
//!
//! ```
//! use tokentrim::tokenizer::{calculate_cost, estimate_tokens};
//! use tokentrim::models::TokenizerFamily;
//!
//! let tokens = estimate_tokens("Hello world", TokenizerFamily::Gpt);
//! assert_eq!(tokens, 3);
//!
//! let cost = calculate_cost(tokens, 2.50, Some(10.00));
//! assert!(cost > 0.0);
//! ```

mod cost;
mod counter;

pub use cost::{calculate_cost, CostBreakdown, CostEstimator, DEFAULT_OUTPUT_RATIO};
pub use counter::{estimate_savings, estimate_tokens, estimate_tokens_by_name, TokenCounter};
