//! Rewrite engine: runs the stage pipeline over a prompt.

use super::rules::RuleSet;
use super::stages::{
    Abbreviation, Conciseness, ContextTrimming, PatternCleanup, RewriteStage, SemanticChunking,
};
use super::{OptimizationResult, OptimizationStats};
use crate::config::EngineConfig;

/// Prompt rewrite engine with an ordered stage list
///
/// # Example
/// ```
/// use tokentrim::rewrite::{ChangeKind, RewriteEngine};
///
/// let engine = RewriteEngine::new();
/// let result = engine.optimize("Could you please help me write an email in order to request a meeting?");
///
/// assert_eq!(result.optimized_text, "write an email to request a meeting?");
/// assert!(result
///     .changes
///     .iter()
///     .any(|c| c.kind == ChangeKind::PhraseSimplification && c.description.contains("in order to")));
/// ```
#[derive(Debug)]
pub struct RewriteEngine {
    /// Compiled rule tables shared by every stage
    rules: RuleSet,
    /// Stages in execution order
    stages: Vec<Box<dyn RewriteStage>>,
}

impl Default for RewriteEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl RewriteEngine {
    /// Create an engine with the built-in rules and all five stages
    pub fn new() -> Self {
        Self::with_config(&EngineConfig::default())
    }

    /// Create an engine with stages enabled and tuned by `config`
    pub fn with_config(config: &EngineConfig) -> Self {
        let mut stages: Vec<Box<dyn RewriteStage>> = Vec::with_capacity(5);

        if config.conciseness {
            stages.push(Box::new(Conciseness));
        }
        if config.abbreviations {
            stages.push(Box::new(Abbreviation));
        }
        if config.context_trimming {
            stages.push(Box::new(ContextTrimming {
                min_sentences: config.trimming.min_sentences,
            }));
        }
        if config.semantic_chunking {
            stages.push(Box::new(SemanticChunking {
                config: config.chunking,
            }));
        }
        if config.pattern_cleanup {
            stages.push(Box::new(PatternCleanup));
        }

        Self {
            rules: RuleSet::builtin(),
            stages,
        }
    }

    /// Builder: replace the rule set
    pub fn with_rules(mut self, rules: RuleSet) -> Self {
        self.rules = rules;
        self
    }

    /// Builder: replace the stage list
    pub fn with_stages(mut self, stages: Vec<Box<dyn RewriteStage>>) -> Self {
        self.stages = stages;
        self
    }

    /// The rule set in use
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Stage names in execution order
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Rewrite a prompt to use fewer tokens
    ///
    /// Empty or whitespace-only input comes back unchanged with no changes.
    /// A rewrite that would delete every token returns the trimmed input
    /// instead, also with no changes.
    pub fn optimize(&self, text: &str) -> OptimizationResult {
        let original_length = text.chars().count();
        if text.trim().is_empty() {
            return OptimizationResult {
                optimized_text: text.to_string(),
                changes: Vec::new(),
                stats: OptimizationStats::new(original_length, original_length),
            };
        }

        let mut current = text.trim().to_string();
        let mut changes = Vec::new();

        for stage in &self.stages {
            let output = stage.apply(&current, &self.rules);
            tracing::trace!(
                stage = stage.name(),
                changes = output.changes.len(),
                length = output.text.len(),
                "stage applied"
            );
            changes.extend(output.changes);
            current = output.text;
        }

        let mut optimized_text = current.trim().to_string();
        if optimized_text.is_empty() {
            // Nothing left to send; keep the prompt rather than erase it
            tracing::debug!("rewrite removed every token, keeping original");
            optimized_text = text.trim().to_string();
            changes.clear();
        }
        let stats = OptimizationStats::new(original_length, optimized_text.chars().count());

        tracing::debug!(
            original_length = stats.original_length,
            optimized_length = stats.optimized_length,
            reduction_percent = stats.reduction_percent,
            changes = changes.len(),
            "prompt optimized"
        );

        OptimizationResult {
            optimized_text,
            changes,
            stats,
        }
    }
}
