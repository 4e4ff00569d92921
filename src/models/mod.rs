//! Provider catalog and model metadata.
//!
//! This module provides provider cards with metadata including:
//! - Tokenizer family used for token estimation
//! - Models offered by each chat service
//! - Per-million-token input/output pricing
//!
//! # Example
//!
//! ```
//! use tokentrim::models::{ModelRegistry, TokenizerFamily};
//!
//! let registry = ModelRegistry::new();
//!
//! let resolved = registry.resolve("claude.ai", "claude-3-haiku").unwrap();
//! assert_eq!(resolved.family, TokenizerFamily::Claude);
//! assert_eq!(resolved.model.pricing.input_per_million, 0.25);
//! ```

mod card;
mod embedded;
mod registry;

pub use card::{ModelCard, ModelPricing, ProviderCard, TokenizerFamily};
pub use embedded::{get_embedded_by_host, get_embedded_providers, EMBEDDED_PROVIDERS};
pub use registry::{ModelRegistry, ResolvedModel};
