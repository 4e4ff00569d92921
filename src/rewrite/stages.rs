//! Rewrite pipeline stages.
//!
//! Each stage is a pure function of its input text and the shared
//! [`RuleSet`]: it returns the rewritten text together with the changes it
//! made, and keeps no state between calls. The engine threads one stage's
//! output into the next.

use super::rules::{RewriteRule, RuleSet};
use super::{Change, ChangeKind};
use crate::config::ChunkingConfig;
use crate::text::{bare_word, normalize_whitespace, split_sentences};

/// Output of one stage: new text plus the changes that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageOutput {
    /// Rewritten text
    pub text: String,
    /// Changes in the order they were applied
    pub changes: Vec<Change>,
}

impl StageOutput {
    fn unchanged(text: &str) -> Self {
        Self {
            text: text.to_string(),
            changes: Vec::new(),
        }
    }
}

/// A single pipeline stage
pub trait RewriteStage: std::fmt::Debug + Send + Sync {
    /// Stage name for logging
    fn name(&self) -> &'static str;

    /// Rewrite `text` using `rules`
    fn apply(&self, text: &str, rules: &RuleSet) -> StageOutput;
}

/// Change log that groups repeated firings of one rule into one entry
#[derive(Debug, Default)]
struct ChangeLog {
    changes: Vec<Change>,
}

impl ChangeLog {
    fn record(&mut self, kind: ChangeKind, description: &str, count: usize) {
        match self
            .changes
            .iter_mut()
            .find(|c| c.kind == kind && c.description == description)
        {
            Some(existing) => existing.count += count,
            None => self.changes.push(Change::new(kind, description, count)),
        }
    }

    /// Apply each rule in order, recording the ones that fired
    fn apply_all(&mut self, text: &mut String, rules: &[RewriteRule]) -> bool {
        let mut fired = false;
        for rule in rules {
            let (next, count) = rule.apply(text.as_str());
            if count == 0 {
                continue;
            }
            let next = next.into_owned();
            *text = next;
            self.record(rule.kind, &rule.label, count);
            fired = true;
        }
        fired
    }
}

/// Stage 1: filler removal and verbose-phrase compression
///
/// Runs until no rule fires, so that removing one phrase cannot expose a
/// filler that a second `optimize` call would then find. Every pass must
/// shorten the text, which bounds the loop.
#[derive(Debug, Clone, Copy, Default)]
pub struct Conciseness;

impl RewriteStage for Conciseness {
    fn name(&self) -> &'static str {
        "conciseness"
    }

    fn apply(&self, text: &str, rules: &RuleSet) -> StageOutput {
        let mut current = text.to_string();
        let mut log = ChangeLog::default();

        loop {
            let before = current.len();
            let fillers = log.apply_all(&mut current, rules.fillers());
            let phrases = log.apply_all(&mut current, rules.phrases());
            if !(fillers || phrases) {
                break;
            }
            current = normalize_whitespace(&current);
            if current.len() >= before {
                break;
            }
        }

        StageOutput {
            text: normalize_whitespace(&current),
            changes: log.changes,
        }
    }
}

/// Stage 2: long-form term abbreviation
#[derive(Debug, Clone, Copy, Default)]
pub struct Abbreviation;

impl RewriteStage for Abbreviation {
    fn name(&self) -> &'static str {
        "abbreviation"
    }

    fn apply(&self, text: &str, rules: &RuleSet) -> StageOutput {
        let mut current = text.to_string();
        let mut log = ChangeLog::default();
        log.apply_all(&mut current, rules.abbreviations());

        StageOutput {
            text: current,
            changes: log.changes,
        }
    }
}

/// Stage 3: drop sentences without an action keyword, strip meta-phrases
#[derive(Debug, Clone, Copy)]
pub struct ContextTrimming {
    /// Sentence count at which trimming starts
    pub min_sentences: usize,
}

impl Default for ContextTrimming {
    fn default() -> Self {
        Self { min_sentences: 4 }
    }
}

impl ContextTrimming {
    fn keep_essential(&self, text: &str, rules: &RuleSet) -> Option<(String, usize)> {
        let sentences = split_sentences(text);
        if sentences.len() < self.min_sentences {
            return None;
        }

        let kept: Vec<&str> = sentences
            .iter()
            .copied()
            .filter(|s| {
                s.split_whitespace()
                    .any(|w| rules.is_action_keyword(&bare_word(w)))
            })
            .collect();

        if kept.is_empty() || kept.len() == sentences.len() {
            return None;
        }
        Some((format!("{}.", kept.join(". ")), sentences.len() - kept.len()))
    }
}

impl RewriteStage for ContextTrimming {
    fn name(&self) -> &'static str {
        "context_trimming"
    }

    fn apply(&self, text: &str, rules: &RuleSet) -> StageOutput {
        let mut log = ChangeLog::default();
        let mut current = match self.keep_essential(text, rules) {
            Some((trimmed, removed)) => {
                log.record(
                    ChangeKind::ContextTrimming,
                    &format!("Removed {removed} non-essential sentence(s)"),
                    removed,
                );
                trimmed
            },
            None => text.to_string(),
        };

        if log.apply_all(&mut current, rules.redundant()) {
            current = normalize_whitespace(&current);
        }

        StageOutput {
            text: current,
            changes: log.changes,
        }
    }
}

/// Stage 4: restructure multi-task prompts into a numbered list
#[derive(Debug, Clone, Copy, Default)]
pub struct SemanticChunking {
    /// Thresholds deciding when the split applies
    pub config: ChunkingConfig,
}

impl SemanticChunking {
    fn chunks<'t>(&self, text: &'t str, rules: &RuleSet) -> Option<Vec<&'t str>> {
        let cfg = &self.config;
        if text.chars().count() < cfg.min_text_chars {
            return None;
        }

        let splitter = rules.connectives()?.matcher();
        let segments: Vec<&str> = splitter.split(text).collect();
        if segments.len() < cfg.min_split_segments {
            return None;
        }

        let chunks: Vec<&str> = segments
            .into_iter()
            .map(|s| s.trim_matches(|c: char| c.is_whitespace() || c == ',' || c == ';'))
            .filter(|s| s.chars().count() >= cfg.min_segment_chars)
            .collect();

        let too_many = cfg.max_chunks > 0 && chunks.len() > cfg.max_chunks;
        if chunks.len() < cfg.min_chunks.max(1) || too_many {
            return None;
        }
        Some(chunks)
    }
}

impl RewriteStage for SemanticChunking {
    fn name(&self) -> &'static str {
        "semantic_chunking"
    }

    fn apply(&self, text: &str, rules: &RuleSet) -> StageOutput {
        let Some(chunks) = self.chunks(text, rules) else {
            return StageOutput::unchanged(text);
        };

        let list = chunks
            .iter()
            .enumerate()
            .map(|(i, chunk)| format!("{}. {chunk}", i + 1))
            .collect::<Vec<_>>()
            .join("\n");

        if list == text {
            return StageOutput::unchanged(text);
        }

        let description = format!("Split into {} numbered tasks", chunks.len());
        StageOutput {
            text: list,
            changes: vec![Change::new(ChangeKind::SemanticChunking, description, 1)],
        }
    }
}

/// Stage 5: punctuation and whitespace normalization
///
/// A substitution is only logged when it changed the text's length.
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternCleanup;

impl RewriteStage for PatternCleanup {
    fn name(&self) -> &'static str {
        "pattern_cleanup"
    }

    fn apply(&self, text: &str, rules: &RuleSet) -> StageOutput {
        let mut current = text.to_string();
        let mut changes = Vec::new();

        for rule in rules.cleanup() {
            let (next, count) = rule.apply(&current);
            if count == 0 || next.chars().count() == current.chars().count() {
                continue;
            }
            let next = next.into_owned();
            current = next;
            changes.push(Change::new(ChangeKind::PatternCleanup, rule.description, count));
        }

        StageOutput {
            text: current.trim().to_string(),
            changes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(stage: &dyn RewriteStage, text: &str) -> StageOutput {
        stage.apply(text, &RuleSet::builtin())
    }

    #[test]
    fn test_conciseness_groups_by_rule() {
        let out = run(&Conciseness, "Please just write it. Please just check it.");
        assert_eq!(out.text, "write it. check it.");
        assert_eq!(out.changes.len(), 2);
        assert!(out.changes.iter().all(|c| c.count == 2));
        assert!(out
            .changes
            .iter()
            .all(|c| c.kind == ChangeKind::FillerRemoval));
    }

    #[test]
    fn test_conciseness_longest_phrase_wins() {
        let out = run(&Conciseness, "Could you please write a haiku");
        assert_eq!(out.text, "write a haiku");
        assert_eq!(out.changes.len(), 1);
        assert_eq!(out.changes[0].description, "Removed filler word: \"could you please\"");
    }

    #[test]
    fn test_conciseness_reaches_fixpoint() {
        // Removing "help me" exposes "if you could"
        let out = run(&Conciseness, "if you help me could draft a plan");
        assert_eq!(out.text, "draft a plan");

        let again = run(&Conciseness, &out.text);
        assert!(again.changes.is_empty());
    }

    #[test]
    fn test_conciseness_unwraps_deep_nesting() {
        let text = "I need I need I need I need I need you to you to you to you to you to write a poem";
        let out = run(&Conciseness, text);
        assert_eq!(out.text, "write a poem");
        assert_eq!(out.changes.len(), 1);
        assert_eq!(out.changes[0].description, "Removed phrase: \"i need you to\"");
        assert_eq!(out.changes[0].count, 5);

        let again = run(&Conciseness, &out.text);
        assert!(again.changes.is_empty());
    }

    #[test]
    fn test_conciseness_no_match() {
        let out = run(&Conciseness, "Summarize the quarterly figures");
        assert_eq!(out.text, "Summarize the quarterly figures");
        assert!(out.changes.is_empty());
    }

    #[test]
    fn test_abbreviation() {
        let out = run(
            &Abbreviation,
            "Explain Machine Learning and machine learning in the application",
        );
        assert_eq!(out.text, "Explain ML and ML in the app");
        assert_eq!(out.changes.len(), 2);
        let ml = out
            .changes
            .iter()
            .find(|c| c.description.contains("machine learning"))
            .unwrap();
        assert_eq!(ml.count, 2);
    }

    #[test]
    fn test_abbreviation_longest_term_first() {
        let out = run(&Abbreviation, "Install the software development kit");
        assert_eq!(out.text, "Install the SDK");
    }

    #[test]
    fn test_context_trimming_drops_non_essential() {
        let text = "I had a long day. The weather was bad. Write a poem about rain. My cat is asleep.";
        let out = run(&ContextTrimming::default(), text);
        assert_eq!(out.text, "Write a poem about rain.");
        assert_eq!(out.changes.len(), 1);
        assert_eq!(out.changes[0].kind, ChangeKind::ContextTrimming);
        assert_eq!(out.changes[0].count, 3);
    }

    #[test]
    fn test_context_trimming_needs_four_sentences() {
        let text = "I had a long day. The weather was bad. Write a poem.";
        let out = run(&ContextTrimming::default(), text);
        assert_eq!(out.text, text);
        assert!(out.changes.is_empty());
    }

    #[test]
    fn test_context_trimming_keeps_all_without_keywords() {
        let text = "One. Two. Three. Four.";
        let out = run(&ContextTrimming::default(), text);
        assert_eq!(out.text, text);
    }

    #[test]
    fn test_redundancy_removal() {
        let out = run(
            &ContextTrimming::default(),
            "As mentioned earlier, summarize the notes again",
        );
        assert_eq!(out.text, ", summarize the notes");
        assert_eq!(out.changes.len(), 2);
        assert!(out
            .changes
            .iter()
            .all(|c| c.kind == ChangeKind::RedundancyRemoval));
    }

    #[test]
    fn test_chunking_scenario() {
        let out = run(
            &SemanticChunking::default(),
            "Write a report and also create a summary and also send an email",
        );
        assert_eq!(
            out.text,
            "1. Write a report\n2. create a summary\n3. send an email"
        );
        assert_eq!(out.changes.len(), 1);
        assert_eq!(out.changes[0].kind, ChangeKind::SemanticChunking);
        assert_eq!(out.changes[0].description, "Split into 3 numbered tasks");
    }

    #[test]
    fn test_chunking_skips_single_and() {
        let text = "Compare apples and oranges";
        let out = run(&SemanticChunking::default(), text);
        assert_eq!(out.text, text);
        assert!(out.changes.is_empty());
    }

    #[test]
    fn test_chunking_needs_two_long_segments() {
        // Three segments, but only one longer than ten characters
        let text = "cats and dogs and a very long tail of text";
        let out = run(&SemanticChunking::default(), text);
        assert_eq!(out.text, text);
    }

    #[test]
    fn test_chunking_respects_max_chunks() {
        let stage = SemanticChunking {
            config: ChunkingConfig {
                max_chunks: 2,
                ..ChunkingConfig::default()
            },
        };
        let text = "Write a report and also create a summary and also send an email";
        assert_eq!(run(&stage, text).text, text);
    }

    #[test]
    fn test_chunking_strips_separator_punctuation() {
        let out = run(
            &SemanticChunking::default(),
            "Draft the proposal, and review the budget, and schedule the kickoff",
        );
        assert_eq!(
            out.text,
            "1. Draft the proposal\n2. review the budget\n3. schedule the kickoff"
        );
    }

    #[test]
    fn test_chunking_idempotent_on_list() {
        let list = "1. Write a report\n2. create a summary\n3. send an email";
        let out = run(&SemanticChunking::default(), list);
        assert_eq!(out.text, list);
        assert!(out.changes.is_empty());
    }

    #[test]
    fn test_cleanup() {
        let out = run(&PatternCleanup, "Hello ,, world !! Really???\n\n\n\nYes   no");
        assert_eq!(out.text, "Hello, world! Really?\n\nYes no");

        let kinds: Vec<&str> = out.changes.iter().map(|c| c.description.as_str()).collect();
        assert!(kinds.contains(&"Removed duplicate punctuation"));
        assert!(kinds.contains(&"Fixed punctuation spacing"));
        assert!(kinds.contains(&"Removed repeated punctuation"));
        assert!(kinds.contains(&"Reduced excessive line breaks"));
        assert!(out
            .changes
            .iter()
            .all(|c| c.kind == ChangeKind::PatternCleanup));
    }

    #[test]
    fn test_cleanup_dangling_punctuation() {
        let out = run(&PatternCleanup, ", summarize the notes");
        assert_eq!(out.text, "summarize the notes");
        assert_eq!(out.changes.len(), 1);
    }

    #[test]
    fn test_cleanup_keeps_bare_punctuation() {
        for text in [",", ":", ";", ":)", "; )"] {
            let out = run(&PatternCleanup, text);
            assert_eq!(out.text, text);
            assert!(out.changes.is_empty(), "{text}: {:?}", out.changes);
        }

        let out = run(&PatternCleanup, "intro\n: details here");
        assert_eq!(out.text, "intro\ndetails here");
    }

    #[test]
    fn test_cleanup_clean_text_untouched() {
        let out = run(&PatternCleanup, "Nothing to fix here.");
        assert_eq!(out.text, "Nothing to fix here.");
        assert!(out.changes.is_empty());
    }
}
