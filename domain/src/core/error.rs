//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid criterion id: {0}")]
    InvalidCriterionId(String),

    #[error("Invalid tier: {0} (expected 1..=4)")]
    InvalidTier(u8),

    #[error("Invalid score: {0} (expected 0..=3)")]
    InvalidScore(u8),

    #[error("Unknown dimension: {0}")]
    UnknownDimension(String),

    #[error("Duplicate criterion id: {0}")]
    DuplicateCriterion(String),

    #[error("Criterion {id} declares {field} {declared} but its id encodes {encoded}")]
    CriterionMismatch {
        id: String,
        field: &'static str,
        declared: u8,
        encoded: u8,
    },

    #[error("Catalog is empty")]
    EmptyCatalog,
}
