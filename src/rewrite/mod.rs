//! Prompt rewriting pipeline.
//!
//! The engine runs a fixed sequence of stages, each consuming the previous
//! stage's output:
//!
//! | # | Stage               | Change kinds                                 |
//! |---|---------------------|----------------------------------------------|
//! | 1 | [`Conciseness`]     | `filler_removal`, `phrase_simplification`    |
//! | 2 | [`Abbreviation`]    | `abbreviation`                               |
//! | 3 | [`ContextTrimming`] | `context_trimming`, `redundancy_removal`     |
//! | 4 | [`SemanticChunking`]| `semantic_chunking`                          |
//! | 5 | [`PatternCleanup`]  | `pattern_cleanup`                            |
//!
//! Rules come from a [`RuleSet`] compiled from static tables. One
//! [`Change`] is logged per rule that fired, carrying its occurrence count,
//! so the change log grows with the number of techniques used and not
//! with the length of the text.
//!
//! # Usage
//!
//! ```
//! use tokentrim::rewrite::{generate_diff, DiffKind, RewriteEngine};
//!
//! let engine = RewriteEngine::new();
//! let result = engine.optimize("Please summarize the documentation");
//!
//! assert_eq!(result.optimized_text, "summarize the docs");
//! assert_eq!(result.changes.len(), 2);
//!
//! let diff = generate_diff("Please summarize the documentation", &result.optimized_text);
//! assert!(diff.iter().any(|seg| seg.kind == DiffKind::Removed));
//! ```

mod diff;
mod engine;
mod rules;
mod stages;
pub mod tables;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use diff::{generate_diff, DiffKind, DiffSegment, DiffSummary};
pub use engine::RewriteEngine;
pub use rules::{CleanupRule, RewriteRule, RuleAction, RuleSet, RuleTables};
pub use stages::{
    Abbreviation, Conciseness, ContextTrimming, PatternCleanup, RewriteStage, SemanticChunking,
    StageOutput,
};

/// Rewrite technique that produced a change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    /// Filler word or politeness marker removed
    FillerRemoval,
    /// Verbose phrase shortened or removed
    PhraseSimplification,
    /// Long-form term abbreviated
    Abbreviation,
    /// Non-essential sentences dropped
    ContextTrimming,
    /// Redundant meta-phrase removed
    RedundancyRemoval,
    /// Multi-task prompt split into a numbered list
    SemanticChunking,
    /// Punctuation or whitespace normalized
    PatternCleanup,
}

impl ChangeKind {
    /// Wire name (`filler_removal`, ...)
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::FillerRemoval => "filler_removal",
            ChangeKind::PhraseSimplification => "phrase_simplification",
            ChangeKind::Abbreviation => "abbreviation",
            ChangeKind::ContextTrimming => "context_trimming",
            ChangeKind::RedundancyRemoval => "redundancy_removal",
            ChangeKind::SemanticChunking => "semantic_chunking",
            ChangeKind::PatternCleanup => "pattern_cleanup",
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One rewrite rule that fired, with how often it matched
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Change {
    /// Technique used
    pub kind: ChangeKind,
    /// Human-readable description
    pub description: String,
    /// Number of occurrences rewritten
    pub count: usize,
}

impl Change {
    /// Create a change record
    pub fn new(kind: ChangeKind, description: impl Into<String>, count: usize) -> Self {
        Self {
            kind,
            description: description.into(),
            count,
        }
    }
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.count > 1 {
            write!(f, "{} ({}x)", self.description, self.count)
        } else {
            f.write_str(&self.description)
        }
    }
}

/// Length statistics for a rewrite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OptimizationStats {
    /// Original length in characters
    pub original_length: usize,
    /// Optimized length in characters
    pub optimized_length: usize,
    /// Rounded percentage of characters removed (negative if the text grew)
    pub reduction_percent: i64,
}

impl OptimizationStats {
    /// Compute stats from two character lengths (0% for an empty original)
    pub fn new(original_length: usize, optimized_length: usize) -> Self {
        let reduction_percent = if original_length == 0 {
            0
        } else {
            let removed = original_length as f64 - optimized_length as f64;
            (removed / original_length as f64 * 100.0).round() as i64
        };

        Self {
            original_length,
            optimized_length,
            reduction_percent,
        }
    }
}

/// Output of [`RewriteEngine::optimize`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimizationResult {
    /// The rewritten prompt
    pub optimized_text: String,
    /// Changes in stage execution order
    pub changes: Vec<Change>,
    /// Length statistics
    pub stats: OptimizationStats,
}

impl OptimizationResult {
    /// True when no rule fired
    pub fn is_unchanged(&self) -> bool {
        self.changes.is_empty()
    }

    /// Total occurrences rewritten by changes of `kind`
    pub fn count_of(&self, kind: ChangeKind) -> usize {
        self.changes
            .iter()
            .filter(|c| c.kind == kind)
            .map(|c| c.count)
            .sum()
    }
}
