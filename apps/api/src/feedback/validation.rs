//! Strict schema validation for scoring-model output. A draft that fails any
//! check is rejected whole; nothing partial ever reaches the store.

use thiserror::Error;

use crate::feedback::generator::FeedbackDraft;

/// The fixed evaluation categories. A valid draft covers each of these
/// exactly once — no extras, no omissions.
pub const CATEGORY_NAMES: [&str; 5] = [
    "Communication Skills",
    "Technical Knowledge",
    "Problem-Solving",
    "Cultural & Role Fit",
    "Confidence & Clarity",
];

#[derive(Debug, Error, PartialEq)]
pub enum SchemaViolation {
    #[error("expected {expected} category scores, got {got}")]
    CategoryCount { expected: usize, got: usize },

    #[error("unknown category '{0}'")]
    UnknownCategory(String),

    #[error("category '{0}' appears more than once")]
    DuplicateCategory(String),

    #[error("category '{0}' is missing")]
    MissingCategory(String),

    #[error("score {score} for '{category}' is outside 0-100")]
    ScoreOutOfRange { category: String, score: i64 },

    #[error("total score {0} is outside 0-100")]
    TotalScoreOutOfRange(i64),
}

/// Validates a raw model draft against the fixed feedback schema.
pub fn validate_draft(draft: &FeedbackDraft) -> Result<(), SchemaViolation> {
    if !(0..=100).contains(&draft.total_score) {
        return Err(SchemaViolation::TotalScoreOutOfRange(draft.total_score));
    }

    if draft.category_scores.len() != CATEGORY_NAMES.len() {
        return Err(SchemaViolation::CategoryCount {
            expected: CATEGORY_NAMES.len(),
            got: draft.category_scores.len(),
        });
    }

    let mut seen: Vec<&str> = Vec::with_capacity(CATEGORY_NAMES.len());
    for category in &draft.category_scores {
        if !CATEGORY_NAMES.contains(&category.name.as_str()) {
            return Err(SchemaViolation::UnknownCategory(category.name.clone()));
        }
        if seen.contains(&category.name.as_str()) {
            return Err(SchemaViolation::DuplicateCategory(category.name.clone()));
        }
        seen.push(&category.name);

        if !(0..=100).contains(&category.score) {
            return Err(SchemaViolation::ScoreOutOfRange {
                category: category.name.clone(),
                score: category.score,
            });
        }
    }

    for name in CATEGORY_NAMES {
        if !seen.contains(&name) {
            return Err(SchemaViolation::MissingCategory(name.to_string()));
        }
    }

    Ok(())
}
