//! Property tests for estimation, rewriting and diffing.
//!
//! These check the totality, determinism and idempotence guarantees over
//! generated input rather than hand-picked examples.

use proptest::prelude::*;
use tokentrim::models::TokenizerFamily;
use tokentrim::rewrite::{generate_diff, DiffKind, RewriteEngine};
use tokentrim::tokenizer::{calculate_cost, estimate_tokens};

/// Words no built-in rule rewrites ("write" marks a sentence as essential)
const VOCABULARY: &[&str] = &[
    "write", "report", "data", "summary", "team", "today", "review", "code", "notes", "draft",
    "quarterly", "numbers",
];

fn family() -> impl Strategy<Value = TokenizerFamily> {
    prop::sample::select(TokenizerFamily::ALL.to_vec())
}

fn sentence() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(VOCABULARY.to_vec()), 1..8)
        .prop_map(|words| format!("{}.", words.join(" ")))
}

fn prompt() -> impl Strategy<Value = String> {
    prop::collection::vec(sentence(), 1..7).prop_map(|sentences| sentences.join(" "))
}

/// Words, fillers and bare punctuation mixed freely
fn noisy_prompt() -> impl Strategy<Value = String> {
    let token = prop_oneof![
        prop::sample::select(VOCABULARY.to_vec()),
        prop::sample::select(vec!["please", "just", "basically", "help me", "in order to"]),
        prop::sample::select(vec![",", ":", ";", ":)", "!", "?", "...", "-", "\n"]),
    ];
    prop::collection::vec(token, 1..12).prop_map(|tokens| tokens.join(" "))
}

proptest! {
    /// Blank text estimates to zero, anything else to at least one token
    #[test]
    fn estimate_is_total(text in "\\PC{0,200}", family in family()) {
        let tokens = estimate_tokens(&text, family);
        if text.trim().is_empty() {
            prop_assert_eq!(tokens, 0);
        } else {
            prop_assert!(tokens >= 1);
        }
    }

    /// Same text and family always give the same estimate
    #[test]
    fn estimate_is_deterministic(text in "\\PC{0,200}", family in family()) {
        prop_assert_eq!(estimate_tokens(&text, family), estimate_tokens(&text, family));
    }

    /// Whitespace-only input always counts as zero
    #[test]
    fn estimate_blank_is_zero(text in "[ \\t\\n]{0,20}", family in family()) {
        prop_assert_eq!(estimate_tokens(&text, family), 0);
    }

    /// Cost is never negative and grows with the token count
    #[test]
    fn cost_is_monotonic(
        tokens in 0usize..1_000_000,
        extra in 0usize..1_000,
        input in 0.0f64..100.0,
        output in prop::option::of(0.0f64..100.0),
    ) {
        let low = calculate_cost(tokens, input, output);
        let high = calculate_cost(tokens + extra, input, output);
        prop_assert!(low >= 0.0);
        prop_assert!(high >= low);
    }

    /// Optimization never panics and its stats describe the actual texts
    #[test]
    fn optimize_is_total(text in "\\PC{0,300}") {
        let result = RewriteEngine::new().optimize(&text);
        prop_assert_eq!(result.stats.original_length, text.chars().count());
        prop_assert_eq!(result.stats.optimized_length, result.optimized_text.chars().count());
    }

    /// Non-blank prompts never optimize to nothing
    #[test]
    fn optimize_keeps_content(text in noisy_prompt()) {
        let result = RewriteEngine::new().optimize(&text);
        prop_assert!(!result.optimized_text.trim().is_empty(), "{:?}", text);
    }

    /// Any non-blank text, punctuation-only included, keeps some content
    #[test]
    fn optimize_never_empties(text in "\\PC{1,60}") {
        prop_assume!(!text.trim().is_empty());
        let result = RewriteEngine::new().optimize(&text);
        prop_assert!(!result.optimized_text.trim().is_empty(), "{:?}", text);
    }

    /// A second pass over optimized text finds nothing left to rewrite
    #[test]
    fn optimize_is_idempotent(text in prompt()) {
        let engine = RewriteEngine::new();
        let first = engine.optimize(&text);
        let second = engine.optimize(&first.optimized_text);
        prop_assert_eq!(&second.optimized_text, &first.optimized_text);
        prop_assert!(second.changes.is_empty(), "{:?}", second.changes);
    }

    /// Dropping one side's segments reconstructs the other side exactly
    #[test]
    fn diff_reconstructs_inputs(original in "\\PC{0,120}", optimized in "\\PC{0,120}") {
        let diff = generate_diff(&original, &optimized);

        let old: String = diff
            .iter()
            .filter(|s| s.kind != DiffKind::Added)
            .map(|s| s.text.as_str())
            .collect();
        let new: String = diff
            .iter()
            .filter(|s| s.kind != DiffKind::Removed)
            .map(|s| s.text.as_str())
            .collect();

        prop_assert_eq!(old, original);
        prop_assert_eq!(new, optimized);
    }
}
