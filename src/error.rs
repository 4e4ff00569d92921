//! TokenTrim error types.
//!
//! Token estimation, cost arithmetic, rewriting and diffing are total over
//! any input string and never return these errors. Errors only surface at
//! the edges: loading configuration, resolving a provider for a report,
//! compiling caller-supplied rule tables, and scanning oversized content.

use thiserror::Error;

/// TokenTrim errors.
#[derive(Error, Debug)]
pub enum TrimError {
    /// Configuration file or value could not be used.
    #[error("Config error: {0}")]
    Config(String),

    /// Provider is not present in the model registry.
    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    /// A caller-supplied rewrite rule could not be compiled.
    #[error("Invalid rule: {0}")]
    InvalidRule(String),

    /// Content exceeds the configured scan limit.
    #[error("Content too large: {size} bytes exceeds limit of {limit}")]
    ContentTooLarge {
        /// Size of the rejected content in bytes.
        size: usize,
        /// Configured limit in bytes.
        limit: usize,
    },

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for TokenTrim operations
pub type Result<T> = std::result::Result<T, TrimError>;

impl From<toml::de::Error> for TrimError {
    fn from(err: toml::de::Error) -> Self {
        TrimError::Config(err.to_string())
    }
}

impl From<regex::Error> for TrimError {
    fn from(err: regex::Error) -> Self {
        TrimError::InvalidRule(err.to_string())
    }
}
