//! Progression policy: where the assessment goes after an answer.
//!
//! The state machine asks the policy for the next catalog position once an
//! answer has been recorded. [`ProgressionPolicy::Sequential`] always moves
//! to the following criterion. [`ProgressionPolicy::AdaptiveSkip`] jumps to
//! the next dimension when the first tier of the current one scored low.

use crate::assessment::entities::Session;
use crate::catalog::dimension::Tier;
use crate::catalog::grid::Catalog;
use serde::{Deserialize, Serialize};

/// Default cumulative tier-1 score at or below which a dimension is skipped.
pub const DEFAULT_SKIP_MAX_LOW_SCORE: u32 = 2;

/// Outcome of a progression decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NextStep {
    /// Next catalog position; `catalog.len()` means finished.
    pub index: usize,
    /// Whether the rest of a dimension was skipped.
    pub skipped: bool,
}

/// How the next criterion is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum ProgressionPolicy {
    /// Ask every criterion in catalog order.
    #[default]
    Sequential,
    /// After the last tier-1 criterion of a dimension, jump to the next
    /// dimension when the tier-1 total is `<= max_low_score`.
    AdaptiveSkip { max_low_score: u32 },
}

impl ProgressionPolicy {
    pub fn adaptive_skip() -> Self {
        ProgressionPolicy::AdaptiveSkip {
            max_low_score: DEFAULT_SKIP_MAX_LOW_SCORE,
        }
    }

    /// Decide the position after `current_index`, whose answer is already
    /// recorded in `session`.
    pub fn next_index(&self, catalog: &Catalog, session: &Session, current_index: usize) -> NextStep {
        let advance = NextStep {
            index: current_index + 1,
            skipped: false,
        };

        match self {
            ProgressionPolicy::Sequential => advance,
            ProgressionPolicy::AdaptiveSkip { max_low_score } => {
                let Some(criterion) = catalog.get(current_index) else {
                    return advance;
                };
                if criterion.tier != Tier::FIRST || !catalog.is_last_of_tier(current_index) {
                    return advance;
                }
                let tier_score = session.tier_score(catalog, criterion.dimension, Tier::FIRST);
                if tier_score > *max_low_score {
                    return advance;
                }
                NextStep {
                    index: catalog
                        .next_dimension_start(current_index)
                        .unwrap_or(catalog.len()),
                    skipped: true,
                }
            }
        }
    }
}
