//! Shared text utilities.
//!
//! Small, allocation-light helpers used by both the token estimator and the
//! rewrite pipeline: surface metrics, whole-word pattern construction,
//! whitespace normalization and sentence/word splitting.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref HORIZONTAL_WS: Regex = Regex::new(r"[ \t\x0B\x0C\r]+").expect("static regex");
    static ref WS_AROUND_NEWLINE: Regex = Regex::new(r" ?\n ?").expect("static regex");
}

/// Surface metrics of a text, the only inputs the estimation formulas use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextMetrics {
    /// Whitespace-separated words
    pub words: usize,
    /// Unicode scalar values, including surrounding whitespace
    pub chars: usize,
    /// ASCII punctuation and symbol characters
    pub symbols: usize,
    /// Characters outside the ASCII range
    pub non_ascii: usize,
}

impl TextMetrics {
    /// Measure a text in a single pass over its characters.
    pub fn measure(text: &str) -> Self {
        let mut metrics = Self {
            words: text.split_whitespace().count(),
            ..Self::default()
        };

        for ch in text.chars() {
            metrics.chars += 1;
            if ch.is_ascii_punctuation() {
                metrics.symbols += 1;
            } else if !ch.is_ascii() {
                metrics.non_ascii += 1;
            }
        }

        metrics
    }
}

/// Build a case-insensitive, whole-word pattern for a literal phrase.
///
/// Inner whitespace matches any run of horizontal whitespace so that
/// "in  order to" still matches "in order to". Word boundaries are only
/// anchored at ends that are word characters.
pub fn whole_word_pattern(phrase: &str) -> String {
    let body = phrase
        .split_whitespace()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"[ \t]+");
    let is_word = |c: Option<char>| c.is_some_and(|c| c.is_alphanumeric() || c == '_');
    let lead = if is_word(phrase.trim().chars().next()) { r"\b" } else { "" };
    let tail = if is_word(phrase.trim().chars().last()) { r"\b" } else { "" };
    format!(r"(?i){lead}{body}{tail}")
}

/// Collapse horizontal whitespace runs to one space and strip spaces that
/// hug a newline. Line structure is preserved so numbered lists survive a
/// second pass.
pub fn normalize_whitespace(text: &str) -> String {
    let collapsed = HORIZONTAL_WS.replace_all(text, " ");
    let tightened = WS_AROUND_NEWLINE.replace_all(&collapsed, "\n");
    tightened.trim().to_string()
}

fn is_sentence_terminator(ch: char) -> bool {
    matches!(ch, '.' | '!' | '?')
}

/// A '.' flanked by digits ("3.5") does not end a sentence.
fn is_decimal_point(text: &str, idx: usize) -> bool {
    let bytes = text.as_bytes();
    idx > 0
        && idx + 1 < bytes.len()
        && bytes[idx - 1].is_ascii_digit()
        && bytes[idx + 1].is_ascii_digit()
}

/// A '.' right after a one to three digit number at the start of a line
/// ("2. item") is a list marker, not a sentence end. "2024." is not.
fn is_list_marker(text: &str, idx: usize) -> bool {
    let line_start = text[..idx].rfind('\n').map_or(0, |i| i + 1);
    let prefix = text[line_start..idx].trim_start();
    (1..=3).contains(&prefix.len()) && prefix.bytes().all(|b| b.is_ascii_digit())
}

/// Split text into trimmed, non-empty sentences on runs of `.`, `!`, `?`.
///
/// # Example
/// ```
/// use tokentrim::text::split_sentences;
///
/// let sentences = split_sentences("Version 3.5 shipped. Did it?! Yes");
/// assert_eq!(sentences, vec!["Version 3.5 shipped", "Did it", "Yes"]);
/// ```
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((idx, ch)) = chars.next() {
        if !is_sentence_terminator(ch) {
            continue;
        }
        if ch == '.' && (is_decimal_point(text, idx) || is_list_marker(text, idx)) {
            continue;
        }

        let mut end = idx + ch.len_utf8();
        while let Some(&(next_idx, next)) = chars.peek() {
            if !is_sentence_terminator(next) {
                break;
            }
            end = next_idx + next.len_utf8();
            chars.next();
        }

        push_trimmed(&mut sentences, &text[start..idx]);
        start = end;
    }

    push_trimmed(&mut sentences, &text[start..]);
    sentences
}

fn push_trimmed<'a>(out: &mut Vec<&'a str>, piece: &'a str) {
    let piece = piece.trim();
    if !piece.is_empty() {
        out.push(piece);
    }
}

/// Split text into alternating word and whitespace tokens, keeping the
/// whitespace so the pieces concatenate back to the input.
pub fn split_keep_whitespace(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start = 0;
    let mut in_ws: Option<bool> = None;

    for (idx, ch) in text.char_indices() {
        let ws = ch.is_whitespace();
        match in_ws {
            Some(prev) if prev != ws => {
                tokens.push(&text[start..idx]);
                start = idx;
            },
            _ => {},
        }
        in_ws = Some(ws);
    }

    if start < text.len() {
        tokens.push(&text[start..]);
    }
    tokens
}

/// Lowercased word with leading/trailing non-alphanumerics stripped.
pub fn bare_word(word: &str) -> String {
    word.trim_matches(|c: char| !c.is_alphanumeric())
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_hello_world() {
        let m = TextMetrics::measure("Hello world");
        assert_eq!(m.words, 2);
        assert_eq!(m.chars, 11);
        assert_eq!(m.symbols, 0);
        assert_eq!(m.non_ascii, 0);
    }

    #[test]
    fn test_metrics_symbols_and_unicode() {
        let m = TextMetrics::measure("café {x}!");
        assert_eq!(m.words, 2);
        assert_eq!(m.chars, 9);
        assert_eq!(m.symbols, 3);
        assert_eq!(m.non_ascii, 1);
    }

    #[test]
    fn test_whole_word_pattern() {
        let re = Regex::new(&whole_word_pattern("in order to")).unwrap();
        assert!(re.is_match("We did it In Order  To win"));
        assert!(!re.is_match("within order tonight"));

        let re = Regex::new(&whole_word_pattern("c++ (beta)")).unwrap();
        assert!(re.is_match("use C++ (beta) here"));
    }

    #[test]
    fn test_normalize_whitespace_keeps_lines() {
        let out = normalize_whitespace("  a   b \n  c\t\td  ");
        assert_eq!(out, "a b\nc d");
    }

    #[test]
    fn test_split_sentences_basic() {
        let s = split_sentences("One. Two! Three? Four");
        assert_eq!(s, vec!["One", "Two", "Three", "Four"]);
    }

    #[test]
    fn test_split_sentences_skips_list_markers() {
        let s = split_sentences("1. Write a report\n2. create a summary\n3. send an email");
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn test_split_sentences_year_is_not_list_marker() {
        let s = split_sentences("2024. It was a bad year.");
        assert_eq!(s, vec!["2024", "It was a bad year"]);

        // A number mid-line after a sentence end is not a marker either
        let s = split_sentences("Done. 2. Next");
        assert_eq!(s, vec!["Done", "2", "Next"]);

        let s = split_sentences("  12. twelfth item");
        assert_eq!(s, vec!["12. twelfth item"]);
    }

    #[test]
    fn test_split_sentences_empty() {
        assert!(split_sentences("").is_empty());
        assert!(split_sentences(" ... !? ").is_empty());
    }

    #[test]
    fn test_split_keep_whitespace_roundtrips() {
        let text = "  hello  big\nworld ";
        let tokens = split_keep_whitespace(text);
        assert_eq!(tokens, vec!["  ", "hello", "  ", "big", "\n", "world", " "]);
        assert_eq!(tokens.concat(), text);
    }

    #[test]
    fn test_bare_word() {
        assert_eq!(bare_word("Help,"), "help");
        assert_eq!(bare_word("(Create)"), "create");
        assert_eq!(bare_word("--"), "");
    }
}
