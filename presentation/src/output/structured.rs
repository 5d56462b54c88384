//! Structured results document
//!
//! The JSON shape consumed by dashboards: the scoring report fields at the
//! top level, a per-dimension list, every history entry, recommendations
//! and a short summary.

use assess_application::SessionResults;
use assess_domain::{
    Catalog, DigitalGap, Dimension, DimensionResult, Evaluation, ResultsReport, SessionStatus,
    TIER_COUNT,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Global score below which the basics come first.
const FOUNDATION_THRESHOLD: f64 = 30.0;
/// Global score below which a strategy is the next step.
const STRATEGY_THRESHOLD: f64 = 60.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationKind {
    Global,
    Dimension,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    #[serde(rename = "type")]
    pub kind: RecommendationKind,
    pub priority: Priority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimension: Option<Dimension>,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_score: Option<f64>,
}

/// One dimension in list form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DimensionSummary {
    pub name: Dimension,
    pub score_percent: f64,
    pub score_raw: u32,
    pub achieved_level: u8,
    pub tier_totals: [u32; TIER_COUNT],
}

/// One history entry as shown to readers of the report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailedResponse {
    pub criterion_id: String,
    pub user_answer: Option<String>,
    pub evaluation: Option<Evaluation>,
    pub ai_reaction: Option<String>,
    pub ai_question: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileSummary {
    pub name: String,
    pub level: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultsSummary {
    pub global_score: f64,
    pub profile: ProfileSummary,
    pub total_questions_answered: usize,
    pub completion_percentage: f64,
}

/// Full structured results of one session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StructuredResults {
    pub session_id: String,
    pub generated_at: DateTime<Utc>,
    pub status: SessionStatus,
    pub global_score: f64,
    pub profile_name: String,
    pub profile_level: u8,
    pub dimension_results: BTreeMap<Dimension, DimensionResult>,
    pub dimensions: Vec<DimensionSummary>,
    pub digital_gaps: Vec<DigitalGap>,
    pub detailed_responses: Vec<DetailedResponse>,
    pub recommendations: Vec<Recommendation>,
    pub summary: ResultsSummary,
}

impl StructuredResults {
    pub fn new(results: &SessionResults, catalog: &Catalog) -> Self {
        Self::generated_at(results, catalog, Utc::now())
    }

    pub fn generated_at(
        results: &SessionResults,
        catalog: &Catalog,
        generated_at: DateTime<Utc>,
    ) -> Self {
        let SessionResults { session, report } = results;

        let dimensions = report
            .dimension_results
            .iter()
            .map(|(dimension, result)| DimensionSummary {
                name: *dimension,
                score_percent: result.score_percent,
                score_raw: result.score_raw,
                achieved_level: result.tier_attained,
                tier_totals: result.tier_totals,
            })
            .collect();

        let detailed_responses = session
            .history
            .iter()
            .map(|entry| DetailedResponse {
                criterion_id: entry.criterion_id.to_string(),
                user_answer: entry.user_answer().map(str::to_string),
                evaluation: entry.evaluation().cloned(),
                ai_reaction: entry.ai_reaction().map(str::to_string),
                ai_question: entry.ai_question.clone(),
            })
            .collect();

        Self {
            session_id: session.session_id.clone(),
            generated_at,
            status: session.status,
            global_score: report.global_score,
            profile_name: report.profile_name.clone(),
            profile_level: report.profile_level,
            dimension_results: report.dimension_results.clone(),
            dimensions,
            digital_gaps: report.digital_gaps.clone(),
            detailed_responses,
            recommendations: recommendations(report),
            summary: ResultsSummary {
                global_score: report.global_score,
                profile: ProfileSummary {
                    name: report.profile_name.clone(),
                    level: report.profile_level,
                },
                total_questions_answered: session.answered_count(),
                completion_percentage: results.completion_percentage(catalog).round(),
            },
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }

    /// Dimensions whose attained tier equals the profile level.
    pub fn aligned_dimensions(&self) -> Vec<Dimension> {
        self.dimension_results
            .iter()
            .filter(|(_, r)| r.tier_attained == self.profile_level)
            .map(|(d, _)| *d)
            .collect()
    }

    /// Dimensions above the profile level, with their attained tier.
    pub fn exceeding_dimensions(&self) -> Vec<(Dimension, u8)> {
        self.dimension_results
            .iter()
            .filter(|(_, r)| r.tier_attained > self.profile_level)
            .map(|(d, r)| (*d, r.tier_attained))
            .collect()
    }
}

/// One global recommendation from the score band, then one per gap.
pub fn recommendations(report: &ResultsReport) -> Vec<Recommendation> {
    let (priority, title, description) = if report.global_score < FOUNDATION_THRESHOLD {
        (
            Priority::High,
            "Foundation Building",
            "Focus on establishing basic digital infrastructure and processes before advancing to higher levels.",
        )
    } else if report.global_score < STRATEGY_THRESHOLD {
        (
            Priority::Medium,
            "Strategic Development",
            "Develop a comprehensive digital strategy and invest in advanced technologies.",
        )
    } else {
        (
            Priority::Low,
            "Optimization",
            "Focus on optimizing existing digital processes and exploring emerging technologies.",
        )
    };

    let mut out = vec![Recommendation {
        kind: RecommendationKind::Global,
        priority,
        dimension: None,
        title: title.to_string(),
        description: description.to_string(),
        current_score: None,
    }];

    out.extend(report.digital_gaps.iter().map(|gap| Recommendation {
        kind: RecommendationKind::Dimension,
        priority: Priority::High,
        dimension: Some(gap.dimension),
        title: format!("Improve {}", gap.dimension.label()),
        description: format!(
            "Current level {} needs to reach level {}. Focus on tier-specific improvements.",
            gap.tier_attained, gap.tier_target
        ),
        current_score: report.dimension(gap.dimension).map(|d| d.score_percent),
    }));

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::test_support::grid;
    use assess_domain::{HistoryEntry, Session, score};
    use chrono::TimeZone;

    fn results_with(scores: &[(&str, u8)]) -> (SessionResults, Catalog) {
        let catalog = grid();
        let mut session = Session::new("s-1", "alice");
        for (id, s) in scores {
            let mut entry = HistoryEntry::answered(
                (*id).into(),
                "réponse",
                Evaluation::new(*s, "ok").unwrap(),
                "Merci.",
            );
            entry.ai_question = Some("Question suivante ?".to_string());
            session.history.push(entry);
        }
        let report = score(&catalog, &session.evaluations());
        (SessionResults { session, report }, catalog)
    }

    #[test]
    fn test_empty_session_gets_foundation_and_six_gaps() {
        let (results, catalog) = results_with(&[]);
        let doc = StructuredResults::new(&results, &catalog);

        assert_eq!(doc.global_score, 0.0);
        assert_eq!(doc.recommendations.len(), 7);
        assert_eq!(doc.recommendations[0].title, "Foundation Building");
        assert_eq!(doc.recommendations[0].priority, Priority::High);
        assert!(
            doc.recommendations[1..]
                .iter()
                .all(|r| r.kind == RecommendationKind::Dimension && r.priority == Priority::High)
        );
        assert_eq!(doc.summary.completion_percentage, 0.0);
    }

    #[test]
    fn test_global_bands() {
        let mut report = results_with(&[]).0.report;
        report.digital_gaps.clear();

        report.global_score = 45.0;
        assert_eq!(recommendations(&report)[0].title, "Strategic Development");
        assert_eq!(recommendations(&report)[0].priority, Priority::Medium);

        report.global_score = 60.0;
        assert_eq!(recommendations(&report)[0].title, "Optimization");
        assert_eq!(recommendations(&report)[0].priority, Priority::Low);
    }

    #[test]
    fn test_json_shape() {
        let (results, catalog) = results_with(&[("D1-P1-C1", 3), ("D1-P1-C2", 2)]);
        let at = Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap();
        let doc = StructuredResults::generated_at(&results, &catalog, at);
        let value: serde_json::Value = serde_json::from_str(&doc.to_json()).unwrap();

        assert_eq!(value["session_id"], "s-1");
        assert_eq!(value["status"], "in_progress");
        assert_eq!(value["dimension_results"]["Stratégie"]["score_raw"], 5);
        assert_eq!(value["dimensions"].as_array().unwrap().len(), 6);
        assert_eq!(value["detailed_responses"][0]["criterion_id"], "D1-P1-C1");
        assert_eq!(value["detailed_responses"][1]["evaluation"]["score"], 2);
        assert_eq!(value["recommendations"][0]["type"], "global");
        assert_eq!(value["summary"]["total_questions_answered"], 2);
        assert_eq!(value["summary"]["profile"]["level"], 1);
        assert!(value["generated_at"].as_str().unwrap().starts_with("2026-03-01T09:30:00"));
    }

    #[test]
    fn test_aligned_and_exceeding() {
        let (results, catalog) = results_with(&[]);
        let mut doc = StructuredResults::new(&results, &catalog);
        doc.profile_level = 2;
        if let Some(r) = doc.dimension_results.get_mut(&Dimension::Strategy) {
            r.tier_attained = 2;
        }
        if let Some(r) = doc.dimension_results.get_mut(&Dimension::Security) {
            r.tier_attained = 4;
        }

        assert_eq!(doc.aligned_dimensions(), vec![Dimension::Strategy]);
        assert_eq!(doc.exceeding_dimensions(), vec![(Dimension::Security, 4)]);
    }
}
