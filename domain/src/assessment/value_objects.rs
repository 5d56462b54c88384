//! Assessment value objects

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Highest score an answer can earn.
pub const MAX_SCORE: u8 = 3;

/// Score and justification for one answer (Value Object)
///
/// The score is always within `0..=MAX_SCORE`; deserialization rejects
/// anything else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawEvaluation")]
pub struct Evaluation {
    score: u8,
    justification: String,
}

#[derive(Deserialize)]
struct RawEvaluation {
    score: u8,
    #[serde(default)]
    justification: String,
}

impl TryFrom<RawEvaluation> for Evaluation {
    type Error = DomainError;

    fn try_from(raw: RawEvaluation) -> Result<Self, Self::Error> {
        Evaluation::new(raw.score, raw.justification)
    }
}

impl Evaluation {
    pub fn new(score: u8, justification: impl Into<String>) -> Result<Self, DomainError> {
        if score > MAX_SCORE {
            return Err(DomainError::InvalidScore(score));
        }
        Ok(Self {
            score,
            justification: justification.into(),
        })
    }

    /// Like [`Evaluation::new`] but caps the score at [`MAX_SCORE`].
    pub fn saturating(score: u8, justification: impl Into<String>) -> Self {
        Self {
            score: score.min(MAX_SCORE),
            justification: justification.into(),
        }
    }

    pub fn score(&self) -> u8 {
        self.score
    }

    pub fn justification(&self) -> &str {
        &self.justification
    }
}

/// Lifecycle status of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    #[default]
    InProgress,
    Finished,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::InProgress => "in_progress",
            SessionStatus::Finished => "finished",
        }
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
