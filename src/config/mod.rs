//! Configuration management.
//!
//! Supports configuration from:
//! - TOML config files
//! - Environment variables (`TOKENTRIM_*`)
//! - CLI arguments (for the `tokentrim` binary)
//!
//! Every section defaults field by field, so a config file only has to
//! name the values it changes:
//!
//! ```toml
//! [engine]
//! semantic_chunking = false
//!
//! [cost]
//! output_ratio = 0.5
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, TrimError};
use crate::tokenizer::DEFAULT_OUTPUT_RATIO;

/// Main configuration struct
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Rewrite pipeline configuration
    #[serde(default)]
    pub engine: EngineConfig,

    /// Cost estimation configuration
    #[serde(default)]
    pub cost: CostConfig,

    /// Report defaults
    #[serde(default)]
    pub report: ReportConfig,

    /// Sensitive-data scan configuration
    #[serde(default)]
    pub scan: ScanConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            TrimError::Config(format!("Failed to read config file {}: {e}", path.display()))
        })?;

        toml::from_str(&content)
            .map_err(|e| TrimError::Config(format!("Failed to parse config: {e}")))
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env(|key| std::env::var(key).ok());
        config
    }

    /// Load the user config file (if any), then overlay the environment
    pub fn load() -> Result<Self> {
        let mut config = match Self::default_path() {
            Some(path) if path.exists() => Self::from_file(&path)?,
            _ => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Default config file location (`<config dir>/tokentrim/config.toml`)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("tokentrim").join("config.toml"))
    }

    /// Overlay values from an environment lookup
    ///
    /// Unparseable values are ignored and the current value is kept.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        // Cost settings
        if let Some(ratio) = lookup("TOKENTRIM_OUTPUT_RATIO") {
            if let Ok(ratio) = ratio.trim().parse::<f64>() {
                self.cost.output_ratio = ratio.max(0.0);
            }
        }

        // Report settings
        if let Some(provider) = lookup("TOKENTRIM_DEFAULT_PROVIDER") {
            if !provider.trim().is_empty() {
                self.report.default_provider = provider.trim().to_string();
            }
        }

        // Engine settings
        if let Some(min_chunks) = lookup("TOKENTRIM_CHUNKING_MIN_CHUNKS") {
            if let Ok(min_chunks) = min_chunks.trim().parse() {
                self.engine.chunking.min_chunks = min_chunks;
            }
        }
        if let Some(disable) = lookup("TOKENTRIM_DISABLE_CHUNKING") {
            if matches!(disable.trim(), "1" | "true" | "yes") {
                self.engine.semantic_chunking = false;
            }
        }
    }

    /// Merge with another config (other takes precedence)
    ///
    /// A section of `other` wins when it differs from that section's
    /// defaults.
    pub fn merge(self, other: Self) -> Self {
        fn pick<T: PartialEq + Default>(base: T, over: T) -> T {
            if over != T::default() {
                over
            } else {
                base
            }
        }

        Self {
            engine: pick(self.engine, other.engine),
            cost: pick(self.cost, other.cost),
            report: pick(self.report, other.report),
            scan: pick(self.scan, other.scan),
        }
    }
}

/// Rewrite pipeline configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Remove fillers and collapse verbose phrases
    pub conciseness: bool,

    /// Substitute long-form terms with abbreviations
    pub abbreviations: bool,

    /// Drop non-essential sentences and redundant meta-phrases
    pub context_trimming: bool,

    /// Restructure multi-task prompts into numbered lists
    pub semantic_chunking: bool,

    /// Normalize punctuation and whitespace
    pub pattern_cleanup: bool,

    /// Context trimming thresholds
    pub trimming: TrimmingConfig,

    /// Semantic chunking thresholds
    pub chunking: ChunkingConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            conciseness: true,
            abbreviations: true,
            context_trimming: true,
            semantic_chunking: true,
            pattern_cleanup: true,
            trimming: TrimmingConfig::default(),
            chunking: ChunkingConfig::default(),
        }
    }
}

/// Context trimming thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrimmingConfig {
    /// Minimum sentence count before any sentence is dropped
    pub min_sentences: usize,
}

impl Default for TrimmingConfig {
    fn default() -> Self {
        Self { min_sentences: 4 }
    }
}

/// Semantic chunking thresholds
///
/// One canonical set: the split must yield more than two raw segments,
/// each kept segment must be longer than ten characters once trimmed, and
/// at least two segments must survive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Minimum raw segments produced by splitting on connectives
    pub min_split_segments: usize,

    /// Minimum trimmed characters for a segment to become a task
    pub min_segment_chars: usize,

    /// Minimum surviving segments to restructure
    pub min_chunks: usize,

    /// Maximum surviving segments to restructure (0 = unbounded)
    pub max_chunks: usize,

    /// Minimum text length in characters (0 = any length)
    pub min_text_chars: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            min_split_segments: 3,
            min_segment_chars: 11,
            min_chunks: 2,
            max_chunks: 0,
            min_text_chars: 0,
        }
    }
}

/// Cost estimation configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostConfig {
    /// Estimated completion size as a fraction of prompt tokens
    pub output_ratio: f64,
}

impl Default for CostConfig {
    fn default() -> Self {
        Self {
            output_ratio: DEFAULT_OUTPUT_RATIO,
        }
    }
}

/// Report defaults
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Provider host used when none is given
    pub default_provider: String,

    /// Model used when none is given (empty = provider default)
    pub default_model: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            default_provider: "chat.openai.com".to_string(),
            default_model: String::new(),
        }
    }
}

/// Sensitive-data scan configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Extra case-insensitive keywords reported as custom findings
    pub custom_keywords: Vec<String>,

    /// Maximum content size to scan (bytes)
    pub max_scan_size: usize,

    /// Characters either side of a match searched for context keywords
    pub context_window: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            custom_keywords: Vec::new(),
            max_scan_size: 1024 * 1024, // 1MB
            context_window: 20,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::Write;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.engine.semantic_chunking);
        assert_eq!(config.engine.chunking.min_chunks, 2);
        assert_eq!(config.engine.trimming.min_sentences, 4);
        assert_eq!(config.cost.output_ratio, 0.3);
        assert_eq!(config.report.default_provider, "chat.openai.com");
        assert_eq!(config.scan.max_scan_size, 1024 * 1024);
    }

    #[test]
    fn test_config_from_toml() {
        let toml = r#"
            [engine]
            abbreviations = false

            [engine.chunking]
            min_chunks = 3
            max_chunks = 6

            [cost]
            output_ratio = 0.5

            [scan]
            custom_keywords = ["project-x"]
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert!(!config.engine.abbreviations);
        assert!(config.engine.conciseness);
        assert_eq!(config.engine.chunking.min_chunks, 3);
        assert_eq!(config.engine.chunking.max_chunks, 6);
        assert_eq!(config.engine.chunking.min_segment_chars, 11);
        assert_eq!(config.cost.output_ratio, 0.5);
        assert_eq!(config.scan.custom_keywords, vec!["project-x".to_string()]);
        assert_eq!(config.report, ReportConfig::default());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[report]\ndefault_provider = \"claude.ai\"").unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.report.default_provider, "claude.ai");
    }

    #[test]
    fn test_from_file_errors() {
        let err = Config::from_file("/nonexistent/tokentrim.toml").unwrap_err();
        assert!(matches!(err, TrimError::Config(_)));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[cost]\noutput_ratio = \"lots\"").unwrap();
        let err = Config::from_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));
    }

    #[test]
    fn test_apply_env() {
        let vars: HashMap<&str, &str> = [
            ("TOKENTRIM_OUTPUT_RATIO", "0.25"),
            ("TOKENTRIM_DEFAULT_PROVIDER", "mistral.ai"),
            ("TOKENTRIM_CHUNKING_MIN_CHUNKS", "not-a-number"),
            ("TOKENTRIM_DISABLE_CHUNKING", "true"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_env(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.cost.output_ratio, 0.25);
        assert_eq!(config.report.default_provider, "mistral.ai");
        assert_eq!(config.engine.chunking.min_chunks, 2);
        assert!(!config.engine.semantic_chunking);
    }

    #[test]
    fn test_merge() {
        let base = Config {
            cost: CostConfig { output_ratio: 0.9 },
            ..Config::default()
        };
        let over = Config {
            report: ReportConfig {
                default_provider: "grok.x.ai".into(),
                ..ReportConfig::default()
            },
            ..Config::default()
        };

        let merged = base.merge(over);
        assert_eq!(merged.cost.output_ratio, 0.9);
        assert_eq!(merged.report.default_provider, "grok.x.ai");
    }
}
