//! Criterion entity and its identifier

use super::dimension::{Dimension, Tier};
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a criterion, e.g. `D1-P1-C1` (Value Object)
///
/// The id encodes dimension number, tier and ordinal within the tier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CriterionId(String);

/// Decoded parts of a [`CriterionId`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CriterionCode {
    pub dimension: u8,
    pub tier: u8,
    pub ordinal: u8,
}

impl CriterionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Decode `D<d>-P<t>-C<c>`.
    pub fn code(&self) -> Result<CriterionCode, DomainError> {
        let invalid = || DomainError::InvalidCriterionId(self.0.clone());
        let mut parts = self.0.split('-');
        let mut next_number = |prefix: char| -> Result<u8, DomainError> {
            parts
                .next()
                .and_then(|p| p.strip_prefix(prefix))
                .and_then(|n| n.parse::<u8>().ok())
                .ok_or_else(invalid)
        };
        let dimension = next_number('D')?;
        let tier = next_number('P')?;
        let ordinal = next_number('C')?;
        if parts.next().is_some() {
            return Err(invalid());
        }
        Ok(CriterionCode {
            dimension,
            tier,
            ordinal,
        })
    }
}

impl fmt::Display for CriterionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CriterionId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// One rung of a criterion's scoring rubric.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringOption {
    pub score: u8,
    pub text: String,
}

/// One evaluable statement of the diagnostic grid (Entity)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Criterion {
    pub id: CriterionId,
    pub dimension: Dimension,
    #[serde(alias = "palier")]
    pub tier: Tier,
    #[serde(alias = "criterion_text")]
    pub prompt_text: String,
    /// Optional rubric forwarded to the evaluator.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<ScoringOption>,
}

impl Criterion {
    pub fn new(
        id: impl Into<CriterionId>,
        dimension: Dimension,
        tier: Tier,
        prompt_text: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            dimension,
            tier,
            prompt_text: prompt_text.into(),
            options: Vec::new(),
        }
    }

    pub fn with_options(mut self, options: Vec<ScoringOption>) -> Self {
        self.options = options;
        self
    }

    /// Check that the id encoding agrees with the declared dimension and tier.
    pub fn validate(&self) -> Result<(), DomainError> {
        let code = self.id.code()?;
        if code.dimension != self.dimension.number() {
            return Err(DomainError::CriterionMismatch {
                id: self.id.to_string(),
                field: "dimension",
                declared: self.dimension.number(),
                encoded: code.dimension,
            });
        }
        if code.tier != self.tier.value() {
            return Err(DomainError::CriterionMismatch {
                id: self.id.to_string(),
                field: "tier",
                declared: self.tier.value(),
                encoded: code.tier,
            });
        }
        if let Some(bad) = self.options.iter().find(|o| o.score > 3) {
            return Err(DomainError::InvalidScore(bad.score));
        }
        Ok(())
    }
}

impl From<String> for CriterionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}
