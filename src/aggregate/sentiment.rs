//! Keyword sentiment heuristic for customer comments.
//!
//! Keyword counting, not language analysis: positive and negative words
//! are counted as whole lowercase tokens and the score is their normalized difference.

use crate::core::metrics::{mean, round2};

const POSITIVE: &[&str] = &[
    "good",
    "great",
    "excellent",
    "satisfied",
    "happy",
    "improved",
    "resolved",
];

const NEGATIVE: &[&str] = &[
    "bad", "poor", "issue", "problem", "delay", "error", "missing", "failed", "wrong",
];

/// Score one comment in `[-1, 1]`. A comment without keywords scores 0.
pub fn score(comment: &str) -> f64 {
    let lowered = comment.to_lowercase();
    let (positive, negative) = lowered
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .fold((0u32, 0u32), |(pos, neg), word| {
            if POSITIVE.contains(&word) {
                (pos + 1, neg)
            } else if NEGATIVE.contains(&word) {
                (pos, neg + 1)
            } else {
                (pos, neg)
            }
        });
    (positive as f64 - negative as f64) / (positive + negative).max(1) as f64
}

/// Score used for a category none of whose records carry a comment.
pub fn category_default(category: &str) -> f64 {
    match category {
        "Documentation" => -0.2,
        "Quality" => -0.5,
        "Delivery" => -0.3,
        "Packaging" => -0.1,
        _ => -0.2,
    }
}

/// Mean score of the comments, rounded to two decimals, or the category
/// default when there are none.
pub fn category_sentiment<'a>(category: &str, comments: impl IntoIterator<Item = &'a str>) -> f64 {
    let scores: Vec<f64> = comments.into_iter().map(score).collect();
    match mean(&scores) {
        Some(m) => round2(m),
        None => category_default(category),
    }
}
