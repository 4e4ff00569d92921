//! Word-level diff between a prompt and its rewrite.
//!
//! The alignment is a greedy left-to-right walk over whitespace-delimited
//! tokens, not a minimal edit script: on a mismatch the original token is
//! emitted as removed and the next optimized token as added, and neither
//! side looks ahead. Expect longer output than an LCS diff whenever words
//! were dropped mid-sentence.

use serde::{Deserialize, Serialize};

use crate::text::split_keep_whitespace;

/// Diff segment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffKind {
    /// Present in both texts
    Unchanged,
    /// Only in the optimized text
    Added,
    /// Only in the original text
    Removed,
}

/// One token of a diff
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffSegment {
    /// Segment type
    #[serde(rename = "type")]
    pub kind: DiffKind,
    /// Token text (a word or a whitespace run)
    pub text: String,
}

impl DiffSegment {
    fn new(kind: DiffKind, text: &str) -> Self {
        Self {
            kind,
            text: text.to_string(),
        }
    }
}

/// Word counts per segment type, whitespace excluded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DiffSummary {
    /// Words kept
    pub unchanged: usize,
    /// Words added
    pub added: usize,
    /// Words removed
    pub removed: usize,
}

impl DiffSummary {
    /// Summarize a diff
    pub fn of(segments: &[DiffSegment]) -> Self {
        let mut summary = Self::default();
        for seg in segments.iter().filter(|s| !s.text.trim().is_empty()) {
            match seg.kind {
                DiffKind::Unchanged => summary.unchanged += 1,
                DiffKind::Added => summary.added += 1,
                DiffKind::Removed => summary.removed += 1,
            }
        }
        summary
    }
}

/// Generate a greedy token diff between `original` and `optimized`
///
/// Always terminates: each step consumes at least one token from one side.
///
/// # Example
/// ```
/// use tokentrim::rewrite::{generate_diff, DiffKind};
///
/// let diff = generate_diff("just do it", "do it");
/// assert_eq!(diff[0].kind, DiffKind::Removed);
/// assert_eq!(diff[0].text, "just");
/// ```
pub fn generate_diff(original: &str, optimized: &str) -> Vec<DiffSegment> {
    let old = split_keep_whitespace(original);
    let new = split_keep_whitespace(optimized);
    let mut diff = Vec::with_capacity(old.len().max(new.len()));
    let (mut i, mut j) = (0, 0);

    while i < old.len() || j < new.len() {
        match (old.get(i), new.get(j)) {
            (Some(a), Some(b)) if a == b => {
                diff.push(DiffSegment::new(DiffKind::Unchanged, a));
                i += 1;
                j += 1;
            },
            (Some(a), Some(b)) => {
                diff.push(DiffSegment::new(DiffKind::Removed, a));
                diff.push(DiffSegment::new(DiffKind::Added, b));
                i += 1;
                j += 1;
            },
            (Some(a), None) => {
                diff.push(DiffSegment::new(DiffKind::Removed, a));
                i += 1;
            },
            (None, Some(b)) => {
                diff.push(DiffSegment::new(DiffKind::Added, b));
                j += 1;
            },
            (None, None) => break,
        }
    }

    diff
}
