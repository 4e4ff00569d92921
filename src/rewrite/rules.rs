//! Compiled rewrite rules.
//!
//! A [`RuleSet`] is built once from [`RuleTables`] and is immutable
//! afterwards. Phrase tables are sorted longest-first (ties broken
//! alphabetically) at construction, so overlapping entries such as
//! "could you please" and "please" always resolve the same way regardless
//! of how the source table was ordered.

use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::Path;

use lazy_static::lazy_static;
use regex::{NoExpand, Regex};
use serde::{Deserialize, Serialize};

use super::tables::{
    ABBREVIATIONS, ACTION_KEYWORDS, CLEANUP_PATTERNS, CONNECTIVES, FILLER_WORDS,
    REDUNDANT_PATTERNS, VERBOSE_PHRASES,
};
use super::ChangeKind;
use crate::error::{Result, TrimError};
use crate::text::whole_word_pattern;

lazy_static! {
    static ref BUILTIN_RULES: RuleSet =
        RuleSet::from_tables(&RuleTables::builtin()).expect("built-in rule tables compile");
}

/// What a rule does with the text it matches
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleAction {
    /// Remove the match
    Delete,
    /// Replace the match with a literal (no capture expansion)
    Replace(String),
    /// Mark split points; the owning stage restructures the text
    Restructure,
}

/// A (matcher, action, label) rewrite rule
#[derive(Debug, Clone)]
pub struct RewriteRule {
    /// Change kind recorded when the rule fires
    pub kind: ChangeKind,
    /// Human-readable description for the change log
    pub label: String,
    matcher: Regex,
    action: RuleAction,
}

impl RewriteRule {
    /// Build a rule from an already-validated regex pattern
    pub fn new(
        kind: ChangeKind,
        pattern: &str,
        action: RuleAction,
        label: impl Into<String>,
    ) -> Result<Self> {
        let matcher = Regex::new(pattern)
            .map_err(|e| TrimError::InvalidRule(format!("{pattern}: {e}")))?;
        Ok(Self {
            kind,
            label: label.into(),
            matcher,
            action,
        })
    }

    /// Remove a filler word or politeness marker
    pub fn filler(word: &str) -> Result<Self> {
        let word = literal(word)?;
        Self::new(
            ChangeKind::FillerRemoval,
            &whole_word_pattern(&word),
            RuleAction::Delete,
            format!("Removed filler word: \"{word}\""),
        )
    }

    /// Collapse a verbose phrase (empty replacement deletes it)
    pub fn phrase(phrase: &str, replacement: &str) -> Result<Self> {
        let phrase = literal(phrase)?;
        let replacement = replacement.trim();
        let (action, label) = if replacement.is_empty() {
            (RuleAction::Delete, format!("Removed phrase: \"{phrase}\""))
        } else {
            (
                RuleAction::Replace(replacement.to_string()),
                format!("\"{phrase}\" → \"{replacement}\""),
            )
        };
        Self::new(
            ChangeKind::PhraseSimplification,
            &whole_word_pattern(&phrase),
            action,
            label,
        )
    }

    /// Substitute a long-form term with its abbreviation
    pub fn abbreviation(term: &str, abbreviation: &str) -> Result<Self> {
        let term = literal(term)?;
        let abbreviation = abbreviation.trim();
        if abbreviation.is_empty() {
            return Err(TrimError::InvalidRule(format!(
                "abbreviation for \"{term}\" is empty"
            )));
        }
        Self::new(
            ChangeKind::Abbreviation,
            &whole_word_pattern(&term),
            RuleAction::Replace(abbreviation.to_string()),
            format!("\"{term}\" → \"{abbreviation}\""),
        )
    }

    /// The compiled matcher
    pub fn matcher(&self) -> &Regex {
        &self.matcher
    }

    /// The rule's action
    pub fn action(&self) -> &RuleAction {
        &self.action
    }

    /// Apply the rule, returning the new text and the number of matches.
    ///
    /// Restructure rules only locate split points: the text comes back
    /// untouched along with the match count.
    pub fn apply<'t>(&self, text: &'t str) -> (Cow<'t, str>, usize) {
        let count = self.matcher.find_iter(text).count();
        if count == 0 {
            return (Cow::Borrowed(text), 0);
        }

        let rewritten = match &self.action {
            RuleAction::Delete => self.matcher.replace_all(text, NoExpand("")),
            RuleAction::Replace(literal) => self.matcher.replace_all(text, NoExpand(literal)),
            RuleAction::Restructure => Cow::Borrowed(text),
        };
        (rewritten, count)
    }
}

/// A normalization made of one or more regex substitutions
#[derive(Debug, Clone)]
pub struct CleanupRule {
    /// Description recorded in the change log
    pub description: &'static str,
    patterns: Vec<Regex>,
    replacement: &'static str,
}

impl CleanupRule {
    /// Apply every substitution in order, returning the text and match count
    pub fn apply<'t>(&self, text: &'t str) -> (Cow<'t, str>, usize) {
        let mut current = Cow::Borrowed(text);
        let mut count = 0;

        for pattern in &self.patterns {
            let matches = pattern.find_iter(&current).count();
            if matches == 0 {
                continue;
            }
            count += matches;
            current = Cow::Owned(pattern.replace_all(&current, self.replacement).into_owned());
        }
        (current, count)
    }
}

/// Plain rule tables, the serializable source of a [`RuleSet`]
///
/// Every field defaults to the built-in table, so a TOML file only needs
/// the tables it wants to replace:
///
/// ```toml
/// fillers = ["please", "kindly", "honestly"]
///
/// [abbreviations]
/// "kubernetes" = "k8s"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleTables {
    /// Filler words and politeness markers (deleted)
    pub fillers: Vec<String>,
    /// Verbose phrase -> concise replacement (empty deletes)
    pub phrases: BTreeMap<String, String>,
    /// Long-form term -> abbreviation
    pub abbreviations: BTreeMap<String, String>,
    /// Words that mark a sentence as essential during context trimming
    pub action_keywords: Vec<String>,
    /// Label -> regex for redundant meta-phrases (deleted)
    pub redundant_patterns: BTreeMap<String, String>,
    /// Connectives that separate tasks for semantic chunking
    pub connectives: Vec<String>,
}

impl Default for RuleTables {
    fn default() -> Self {
        Self::builtin()
    }
}

impl RuleTables {
    /// The built-in tables
    pub fn builtin() -> Self {
        Self {
            fillers: FILLER_WORDS.iter().map(|s| s.to_string()).collect(),
            phrases: VERBOSE_PHRASES
                .entries()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            abbreviations: ABBREVIATIONS
                .entries()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            action_keywords: ACTION_KEYWORDS.iter().map(|s| s.to_string()).collect(),
            redundant_patterns: REDUNDANT_PATTERNS
                .iter()
                .map(|(pattern, label)| (label.to_string(), pattern.to_string()))
                .collect(),
            connectives: CONNECTIVES.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Load tables from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse tables from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

/// Compiled, immutable rule set shared by all rewrite stages
#[derive(Debug, Clone)]
pub struct RuleSet {
    fillers: Vec<RewriteRule>,
    phrases: Vec<RewriteRule>,
    abbreviations: Vec<RewriteRule>,
    action_keywords: HashSet<String>,
    redundant: Vec<RewriteRule>,
    connectives: Option<RewriteRule>,
    cleanup: Vec<CleanupRule>,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::builtin()
    }
}

impl RuleSet {
    /// The built-in rule set (compiled once per process)
    pub fn builtin() -> Self {
        BUILTIN_RULES.clone()
    }

    /// Compile a rule set from plain tables
    ///
    /// Fails with [`TrimError::InvalidRule`] on blank entries or patterns
    /// that do not compile.
    pub fn from_tables(tables: &RuleTables) -> Result<Self> {
        let fillers = longest_first(tables.fillers.iter().map(|w| (w.as_str(), "")))
            .into_iter()
            .map(|(word, _)| RewriteRule::filler(&word))
            .collect::<Result<Vec<_>>>()?;

        let phrases = longest_first(tables.phrases.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .into_iter()
            .map(|(phrase, replacement)| RewriteRule::phrase(&phrase, &replacement))
            .collect::<Result<Vec<_>>>()?;

        let abbreviations = longest_first(
            tables
                .abbreviations
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str())),
        )
        .into_iter()
        .map(|(term, abbreviation)| RewriteRule::abbreviation(&term, &abbreviation))
        .collect::<Result<Vec<_>>>()?;

        let action_keywords = tables
            .action_keywords
            .iter()
            .map(|k| k.trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();

        let redundant = tables
            .redundant_patterns
            .iter()
            .map(|(label, pattern)| {
                RewriteRule::new(
                    ChangeKind::RedundancyRemoval,
                    pattern,
                    RuleAction::Delete,
                    format!("Removed redundant phrases: {label}"),
                )
            })
            .collect::<Result<Vec<_>>>()?;

        let connectives = connective_rule(&tables.connectives)?;

        let cleanup = CLEANUP_PATTERNS
            .iter()
            .map(|c| {
                let patterns = c
                    .patterns
                    .iter()
                    .map(|p| Regex::new(p))
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(CleanupRule {
                    description: c.description,
                    patterns,
                    replacement: c.replacement,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        tracing::trace!(
            fillers = fillers.len(),
            phrases = phrases.len(),
            abbreviations = abbreviations.len(),
            "compiled rule set"
        );

        Ok(Self {
            fillers,
            phrases,
            abbreviations,
            action_keywords,
            redundant,
            connectives,
            cleanup,
        })
    }

    /// Filler rules, longest first
    pub fn fillers(&self) -> &[RewriteRule] {
        &self.fillers
    }

    /// Verbose phrase rules, longest first
    pub fn phrases(&self) -> &[RewriteRule] {
        &self.phrases
    }

    /// Abbreviation rules, longest first
    pub fn abbreviations(&self) -> &[RewriteRule] {
        &self.abbreviations
    }

    /// Redundant meta-phrase rules
    pub fn redundant(&self) -> &[RewriteRule] {
        &self.redundant
    }

    /// Connective split rule (absent when no connectives are configured)
    pub fn connectives(&self) -> Option<&RewriteRule> {
        self.connectives.as_ref()
    }

    /// Cleanup normalizations in application order
    pub fn cleanup(&self) -> &[CleanupRule] {
        &self.cleanup
    }

    /// Check a bare lowercase word against the action keywords
    pub fn is_action_keyword(&self, word: &str) -> bool {
        self.action_keywords.contains(word)
    }
}

/// Trim, lowercase and collapse inner whitespace of a table key.
fn literal(phrase: &str) -> Result<String> {
    let normalized = phrase
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    if normalized.is_empty() {
        return Err(TrimError::InvalidRule("empty phrase".to_string()));
    }
    Ok(normalized)
}

/// Deduplicate entries by normalized key and order them longest-first,
/// ties alphabetical.
fn longest_first<'a>(entries: impl Iterator<Item = (&'a str, &'a str)>) -> Vec<(String, String)> {
    let mut seen = BTreeSet::new();
    let mut out: Vec<(String, String)> = entries
        .map(|(k, v)| (k.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase(), v.to_string()))
        .filter(|(k, _)| k.is_empty() || seen.insert(k.clone()))
        .collect();

    out.sort_by(|(a, _), (b, _)| {
        b.chars()
            .count()
            .cmp(&a.chars().count())
            .then_with(|| a.cmp(b))
    });
    out
}

fn connective_rule(connectives: &[String]) -> Result<Option<RewriteRule>> {
    let words = longest_first(connectives.iter().map(|c| (c.as_str(), "")));
    if words.is_empty() {
        return Ok(None);
    }

    let alternation = words
        .iter()
        .map(|(w, _)| literal(w).map(|w| regex::escape(&w).replace(' ', r"[ \t]+")))
        .collect::<Result<Vec<_>>>()?
        .join("|");

    RewriteRule::new(
        ChangeKind::SemanticChunking,
        &format!(r"(?i)\b(?:{alternation})\b"),
        RuleAction::Restructure,
        "Split on connectives",
    )
    .map(Some)
}
