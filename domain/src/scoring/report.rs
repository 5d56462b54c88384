//! Results report produced by the scoring engine

use crate::catalog::dimension::{Dimension, TIER_COUNT};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Scores of one dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionResult {
    /// Sum of the dimension's answer scores.
    pub score_raw: u32,
    /// `score_raw` over the dimension maximum, in percent, 2 decimals.
    pub score_percent: f64,
    /// Raw total per tier, tier 1 first.
    pub tier_totals: [u32; TIER_COUNT],
    /// Highest tier reached without a gap below it (0 when none).
    pub tier_attained: u8,
}

/// A dimension whose attained tier falls short of the profile's tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DigitalGap {
    pub dimension: Dimension,
    pub tier_attained: u8,
    pub tier_target: u8,
}

/// Full scoring output for one set of evaluations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultsReport {
    pub global_score: f64,
    pub profile_name: String,
    pub profile_level: u8,
    pub dimension_results: BTreeMap<Dimension, DimensionResult>,
    pub digital_gaps: Vec<DigitalGap>,
}

impl ResultsReport {
    pub fn dimension(&self, dimension: Dimension) -> Option<&DimensionResult> {
        self.dimension_results.get(&dimension)
    }

    pub fn gap_for(&self, dimension: Dimension) -> Option<&DigitalGap> {
        self.digital_gaps.iter().find(|g| g.dimension == dimension)
    }
}
