//! Rule tables for prompt rewriting.
//!
//! These tables hold the literal vocabulary each rewrite stage works from.
//! Lookup order is never taken from the tables themselves: [`RuleSet`]
//! sorts every phrase table longest-first when it compiles them, so
//! "could you please" is always tried before "please".
//!
//! [`RuleSet`]: super::RuleSet

use phf::{phf_map, phf_set};

/// Filler words and politeness markers, removed outright
pub static FILLER_WORDS: phf::Set<&'static str> = phf_set! {
    // Politeness
    "please",
    "kindly",
    "if you could",
    "would you mind",
    "i would like",
    "could you please",
    "i was wondering",
    "it would be great if",
    "thank you in advance",
    "thanks in advance",
    "i appreciate",
    "sorry to bother",
    "excuse me",
    "pardon me",
    "forgive me",
    // Hedges and intensifiers
    "just",
    "simply",
    "basically",
    "actually",
    "literally",
    "obviously",
    "clearly",
    "essentially",
    "ultimately",
};

/// Verbose phrases and their concise replacements (empty = delete)
pub static VERBOSE_PHRASES: phf::Map<&'static str, &'static str> = phf_map! {
    "in order to" => "to",
    "due to the fact that" => "because",
    "despite the fact that" => "although",
    "at this point in time" => "now",
    "for the purpose of" => "for",
    "with regard to" => "regarding",
    "in relation to" => "about",
    "as a matter of fact" => "",
    "it is important to note that" => "",
    "it should be noted that" => "",
    "i want you to" => "",
    "i need you to" => "",
    "can you help me" => "",
    "help me" => "",
    "assist me" => "",
};

/// Long-form domain terms and their standard abbreviations
pub static ABBREVIATIONS: phf::Map<&'static str, &'static str> = phf_map! {
    // Multi-word terms
    "artificial intelligence" => "AI",
    "machine learning" => "ML",
    "deep learning" => "DL",
    "natural language processing" => "NLP",
    "application programming interface" => "API",
    "user interface" => "UI",
    "user experience" => "UX",
    "software development kit" => "SDK",
    "integrated development environment" => "IDE",
    "version control system" => "VCS",
    "content management system" => "CMS",
    "customer relationship management" => "CRM",
    "search engine optimization" => "SEO",
    "frequently asked questions" => "FAQ",
    "hypertext markup language" => "HTML",
    "cascading style sheets" => "CSS",
    // Single words
    "database" => "DB",
    "javascript" => "JS",
    "application" => "app",
    "development" => "dev",
    "environment" => "env",
    "configuration" => "config",
    "documentation" => "docs",
    "repository" => "repo",
    "administrator" => "admin",
    "information" => "info",
    "professional" => "pro",
};

/// Words that mark a sentence as carrying the actual request
pub static ACTION_KEYWORDS: phf::Set<&'static str> = phf_set! {
    "help",
    "create",
    "write",
    "generate",
    "explain",
    "analyze",
    "summarize",
    "translate",
};

/// Redundant meta-phrases: (regex, label)
///
/// Patterns rather than literals because each covers a family of variants.
pub static REDUNDANT_PATTERNS: &[(&str, &str)] = &[
    (
        r"(?i)\b(?:as mentioned|as stated|as discussed)[ \t]+(?:before|earlier|above|previously)\b",
        "back-references",
    ),
    (r"(?i)\b(?:again|once more|reiterate)\b", "repetition markers"),
    (
        r"(?i)\b(?:in conclusion|to summarize|in summary)\b",
        "summary markers",
    ),
];

/// Coordinating connectives that separate tasks in a multi-task prompt
pub static CONNECTIVES: phf::Set<&'static str> = phf_set! {
    "and",
    "also",
    "additionally",
    "furthermore",
    "moreover",
};

/// A whitespace/punctuation normalization applied during cleanup
#[derive(Debug, Clone, Copy)]
pub struct CleanupPattern {
    /// Description recorded in the change log
    pub description: &'static str,
    /// Regex patterns applied in order
    pub patterns: &'static [&'static str],
    /// Replacement for every pattern (may reference `${1}`)
    pub replacement: &'static str,
}

/// Cleanup normalizations, applied in order
pub static CLEANUP_PATTERNS: &[CleanupPattern] = &[
    CleanupPattern {
        description: "Removed duplicate punctuation",
        patterns: &[r"([,;])(?:[ \t]*[,;])+", r"[,;:][ \t]*([.!?])"],
        replacement: "${1}",
    },
    CleanupPattern {
        description: "Fixed punctuation spacing",
        patterns: &[r"[ \t]+([,.!?;:])"],
        replacement: "${1}",
    },
    CleanupPattern {
        description: "Removed repeated punctuation",
        patterns: &[
            r"(,)(?:[ \t]*,)+",
            r"(\.)(?:[ \t]*\.)+",
            r"(!)(?:[ \t]*!)+",
            r"(\?)(?:[ \t]*\?)+",
            r"(;)(?:[ \t]*;)+",
            r"(:)(?:[ \t]*:)+",
        ],
        replacement: "${1}",
    },
    CleanupPattern {
        description: "Reduced excessive line breaks",
        patterns: &[r"\n\s*\n\s*\n"],
        replacement: "\n\n",
    },
    CleanupPattern {
        description: "Normalized whitespace",
        patterns: &[r"[ \t]{3,}"],
        replacement: " ",
    },
    CleanupPattern {
        description: "Removed dangling punctuation",
        patterns: &[r"(?m)^[ \t]*[,;:]+[ \t]*(\w)"],
        replacement: "${1}",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_lowercase() {
        for filler in FILLER_WORDS.iter() {
            assert_eq!(*filler, filler.to_lowercase(), "Filler '{filler}'");
        }
        for (phrase, _) in VERBOSE_PHRASES.entries() {
            assert_eq!(*phrase, phrase.to_lowercase(), "Phrase '{phrase}'");
        }
        for (term, _) in ABBREVIATIONS.entries() {
            assert_eq!(*term, term.to_lowercase(), "Term '{term}'");
        }
    }

    #[test]
    fn test_documented_abbreviations_exist() {
        assert_eq!(ABBREVIATIONS.get("machine learning"), Some(&"ML"));
        assert_eq!(ABBREVIATIONS.get("application"), Some(&"app"));
        assert!(!ABBREVIATIONS.contains_key("for example"));
    }

    #[test]
    fn test_replacements_shorter() {
        for (phrase, concise) in VERBOSE_PHRASES.entries() {
            assert!(concise.len() < phrase.len(), "'{phrase}' -> '{concise}'");
        }
        for (term, abbrev) in ABBREVIATIONS.entries() {
            assert!(abbrev.len() < term.len(), "'{term}' -> '{abbrev}'");
        }
    }

    #[test]
    fn test_replacements_do_not_retrigger() {
        // A replacement must never itself be a key of the same table
        for concise in VERBOSE_PHRASES.values() {
            assert!(!VERBOSE_PHRASES.contains_key(concise) || concise.is_empty());
            assert!(!FILLER_WORDS.contains(concise));
        }
        for abbrev in ABBREVIATIONS.values() {
            assert!(!ABBREVIATIONS.contains_key(&abbrev.to_lowercase() as &str));
        }
    }

    #[test]
    fn test_cleanup_patterns_compile() {
        for cleanup in CLEANUP_PATTERNS {
            for pattern in cleanup.patterns {
                assert!(regex::Regex::new(pattern).is_ok(), "{pattern}");
            }
        }
        for (pattern, _) in REDUNDANT_PATTERNS {
            assert!(regex::Regex::new(pattern).is_ok(), "{pattern}");
        }
    }
}
