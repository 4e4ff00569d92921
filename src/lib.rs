//! # TokenTrim
//!
//! Heuristic token estimation and deterministic prompt rewriting for LLM
//! chat interfaces.
//!
//! TokenTrim estimates how many tokens a prompt will cost on a given chat
//! service, rewrites it into a shorter equivalent with a fixed pipeline of
//! rule-based stages, and reports the before/after token and dollar
//! figures. Everything is pure string processing: no tokenizer downloads,
//! no network, no model calls.
//!
//! ## Features
//!
//! - **Token estimation**: per-family arithmetic approximations of the GPT,
//!   Claude, Gemini, Llama and Mistral tokenizers
//! - **Cost estimation**: input cost plus an assumed output share (30% of
//!   the input tokens by default)
//! - **Prompt rewriting**: filler removal, phrase condensing, abbreviations,
//!   context trimming, numbered task splitting and punctuation cleanup,
//!   with a record of every change
//! - **Reports**: one rewrite priced against a provider's model catalog
//! - **Sensitive-data scanning**: emails, card numbers, keys and other
//!   personal data detected and redacted before a prompt leaves the machine
//!
//! ## Rewrite Pipeline
//!
//! | Stage               | Effect                                                   |
//! |---------------------|----------------------------------------------------------|
//! | Conciseness         | Drops filler words, shortens verbose phrases             |
//! | Abbreviation        | "machine learning" → "ML", "application" → "app"         |
//! | Context trimming    | Keeps only sentences with a task verb in long prompts    |
//! | Semantic chunking   | "do X, and then Y, also Z" → a numbered list             |
//! | Pattern cleanup     | Fixes stray punctuation and spacing left by earlier steps |
//!
//! ## Quick Start
//!
//! ```
//! use tokentrim::{estimate_tokens, RewriteEngine, TokenizerFamily};
//!
//! let engine = RewriteEngine::new();
//! let result = engine.optimize(
//!     "Could you please help me write an email in order to request a meeting?",
//! );
//!
//! assert_eq!(result.optimized_text, "write an email to request a meeting?");
//! assert!(result.stats.reduction_percent > 40);
//!
//! let before = estimate_tokens("Could you please help me write an email", TokenizerFamily::Gpt);
//! let after = estimate_tokens(&result.optimized_text, TokenizerFamily::Gpt);
//! assert!(after < before);
//! ```
//!
//! ## Reports
//!
//! ```
//! use tokentrim::Optimizer;
//!
//! let report = Optimizer::new()
//!     .report("Please summarize the documentation for me", "claude.ai", "")
//!     .unwrap();
//!
//! assert_eq!(report.provider_name, "Anthropic");
//! assert!(report.cost_saved >= 0.0);
//! ```
//!
//! ## Modules
//!
//! - [`tokenizer`]: Token estimation and cost arithmetic
//! - [`models`]: Provider catalog, model pricing and tokenizer families
//! - [`rewrite`]: Rewrite engine, rule tables and word diff
//! - [`report`]: Before/after optimization reports
//! - [`security`]: Sensitive-data detection and redaction
//! - [`config`]: Configuration management
//! - [`text`]: Shared string utilities
//! - [`error`]: Error types and result aliases

pub mod config;
pub mod error;
pub mod models;
pub mod report;
pub mod rewrite;
pub mod security;
pub mod text;
pub mod tokenizer;

// Re-exports for convenience
pub use config::Config;
pub use error::{Result, TrimError};
pub use models::{ModelCard, ModelRegistry, ProviderCard, TokenizerFamily};
pub use report::{OptimizationReport, Optimizer};
pub use rewrite::{
    generate_diff, Change, ChangeKind, DiffSegment, OptimizationResult, OptimizationStats,
    RewriteEngine,
};
pub use security::{RiskLevel, ScanResult, SensitiveDataScanner};
pub use tokenizer::{calculate_cost, estimate_tokens, CostEstimator, TokenCounter};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
