//! Assessment configuration from TOML (`[assessment]` section)

use assess_domain::progression::DEFAULT_SKIP_MAX_LOW_SCORE;
use assess_domain::{ConfigIssue, ConfigIssueCode, ProgressionPolicy};
use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_ANSWER_CHARS: usize = 4000;

/// Raw assessment configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAssessmentConfig {
    /// "sequential" or "adaptive_skip"
    pub progression: String,
    /// Tier-1 total at or below which `adaptive_skip` leaves a dimension
    pub skip_max_low_score: u32,
    /// Longest accepted answer, in characters
    pub max_answer_chars: usize,
}

impl Default for FileAssessmentConfig {
    fn default() -> Self {
        Self {
            progression: "sequential".to_string(),
            skip_max_low_score: DEFAULT_SKIP_MAX_LOW_SCORE,
            max_answer_chars: DEFAULT_MAX_ANSWER_CHARS,
        }
    }
}

impl FileAssessmentConfig {
    /// Parse `progression` into a policy, falling back to sequential.
    ///
    /// Accepts: "sequential", "seq", "adaptive_skip", "adaptive", "skip"
    pub fn parse_progression(&self) -> (ProgressionPolicy, Vec<ConfigIssue>) {
        match self.progression.to_lowercase().replace('-', "_").as_str() {
            "sequential" | "seq" => (ProgressionPolicy::Sequential, vec![]),
            "adaptive_skip" | "adaptive" | "skip" => (
                ProgressionPolicy::AdaptiveSkip {
                    max_low_score: self.skip_max_low_score,
                },
                vec![],
            ),
            _ => {
                let issue = ConfigIssue::warning(
                    ConfigIssueCode::InvalidEnumValue {
                        field: "assessment.progression".to_string(),
                        value: self.progression.clone(),
                        valid_values: vec!["sequential".to_string(), "adaptive_skip".to_string()],
                    },
                    format!(
                        "assessment.progression: unknown value '{}', falling back to 'sequential'",
                        self.progression
                    ),
                );
                (ProgressionPolicy::Sequential, vec![issue])
            }
        }
    }

    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = self.parse_progression().1;
        if self.max_answer_chars == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::OutOfRange {
                    field: "assessment.max_answer_chars".to_string(),
                    value: 0,
                },
                "assessment.max_answer_chars must be at least 1",
            ));
        }
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_progression_variants() {
        let mut config = FileAssessmentConfig::default();
        assert_eq!(config.parse_progression().0, ProgressionPolicy::Sequential);

        config.progression = "adaptive-skip".to_string();
        config.skip_max_low_score = 3;
        assert_eq!(
            config.parse_progression().0,
            ProgressionPolicy::AdaptiveSkip { max_low_score: 3 }
        );
    }

    #[test]
    fn test_unknown_progression_warns() {
        let config = FileAssessmentConfig {
            progression: "random".to_string(),
            ..Default::default()
        };
        let (policy, issues) = config.parse_progression();
        assert_eq!(policy, ProgressionPolicy::Sequential);
        assert_eq!(issues.len(), 1);
    }

    #[test]
    fn test_zero_answer_limit_is_an_error() {
        let config = FileAssessmentConfig {
            max_answer_chars: 0,
            ..Default::default()
        };
        assert!(config.validate().iter().any(|i| i.is_error()));
    }
}
