//! Scoring engine: evaluations in, results report out.
//!
//! Pure and deterministic. Unknown criterion ids are ignored and missing
//! criteria contribute zero, so a partial map (mid-assessment) is fine.

use super::profile::Profile;
use super::report::{DigitalGap, DimensionResult, ResultsReport};
use crate::assessment::entities::HistoryEntry;
use crate::assessment::value_objects::Evaluation;
use crate::catalog::dimension::{Dimension, TIER_COUNT};
use crate::catalog::entities::CriterionId;
use crate::catalog::grid::Catalog;
use std::collections::{BTreeMap, HashMap};

/// A tier counts as attained only when its total is strictly above this.
pub const TIER_THRESHOLD: u32 = 4;

/// Score a set of evaluations against the catalog.
pub fn score(catalog: &Catalog, evaluations: &HashMap<CriterionId, Evaluation>) -> ResultsReport {
    let mut raw = [0u32; 6];
    let mut tiers = [[0u32; TIER_COUNT]; 6];

    for (id, evaluation) in evaluations {
        let Some(criterion) = catalog.find(id) else {
            continue;
        };
        let slot = criterion.dimension.index();
        raw[slot] += evaluation.score() as u32;
        tiers[slot][criterion.tier.slot()] += evaluation.score() as u32;
    }

    let mut dimension_results = BTreeMap::new();
    let mut percent_sum = 0.0;

    for dimension in Dimension::ALL {
        let slot = dimension.index();
        let percent = percent_of(raw[slot], catalog.max_raw_score(dimension));
        percent_sum += percent;
        dimension_results.insert(
            dimension,
            DimensionResult {
                score_raw: raw[slot],
                score_percent: round2(percent),
                tier_totals: tiers[slot],
                tier_attained: tier_attained(&tiers[slot]),
            },
        );
    }

    let global_score = round2(percent_sum / Dimension::ALL.len() as f64);
    let profile = Profile::from_global_score(global_score);
    let target = profile.level();

    let digital_gaps = dimension_results
        .iter()
        .filter(|(_, result)| result.tier_attained < target)
        .map(|(dimension, result)| DigitalGap {
            dimension: *dimension,
            tier_attained: result.tier_attained,
            tier_target: target,
        })
        .collect();

    ResultsReport {
        global_score,
        profile_name: profile.name().to_string(),
        profile_level: target,
        dimension_results,
        digital_gaps,
    }
}

/// Build the evaluation map from a session history (answered entries only).
pub fn evaluations_from_history(history: &[HistoryEntry]) -> HashMap<CriterionId, Evaluation> {
    history
        .iter()
        .filter_map(|e| e.evaluation().map(|ev| (e.criterion_id.clone(), ev.clone())))
        .collect()
}

/// Highest tier N such that every tier <= N is above the threshold.
fn tier_attained(tier_totals: &[u32; TIER_COUNT]) -> u8 {
    tier_totals
        .iter()
        .take_while(|total| **total > TIER_THRESHOLD)
        .count() as u8
}

fn percent_of(raw: u32, max: u32) -> f64 {
    if max == 0 {
        return 0.0;
    }
    raw as f64 / max as f64 * 100.0
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
