//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod assessment;
mod catalog;
mod gateway;
mod logging;
mod output;
mod store;

pub use assessment::{DEFAULT_MAX_ANSWER_CHARS, FileAssessmentConfig};
pub use catalog::FileCatalogConfig;
pub use gateway::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS, FileGatewayConfig};
pub use logging::FileLoggingConfig;
pub use output::FileOutputConfig;
pub use store::{FileStoreConfig, StoreBackend};

use assess_application::AssessmentParams;
use assess_domain::ConfigIssue;
use serde::{Deserialize, Serialize};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Remote question/evaluation service
    pub gateway: FileGatewayConfig,
    /// Session persistence
    pub store: FileStoreConfig,
    /// Criteria grid source
    pub catalog: FileCatalogConfig,
    /// State machine settings
    pub assessment: FileAssessmentConfig,
    /// Log destinations
    pub logging: FileLoggingConfig,
    /// Output settings
    pub output: FileOutputConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    ///
    /// This is the single entry point for config validation. It checks:
    /// 1. Gateway URL and timeout
    /// 2. Enum parse failures (store backend, progression policy)
    /// 3. Numeric limits
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        // 1. Gateway
        issues.extend(self.gateway.validate());

        // 2. Enum parse validation
        issues.extend(self.store.parse_backend().1);

        // 3. Assessment (progression enum + limits)
        issues.extend(self.assessment.validate());

        issues
    }

    /// Convert to the application-level state machine parameters.
    pub fn to_assessment_params(&self) -> AssessmentParams {
        AssessmentParams::default()
            .with_gateway_timeout(self.gateway.timeout())
            .with_progression(self.assessment.parse_progression().0)
            .with_max_answer_chars(self.assessment.max_answer_chars.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assess_domain::{ProgressionPolicy, ReportFormat};
    use std::path::PathBuf;
    use std::time::Duration;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[gateway]
base_url = "https://assess.example.org"
timeout_secs = 10
rate_limit_markers = ["quota exceeded"]

[store]
backend = "memory"

[catalog]
path = "grid.json"

[assessment]
progression = "adaptive_skip"
skip_max_low_score = 1
max_answer_chars = 2000

[logging]
conversation_log = "events.jsonl"

[output]
format = "json"
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.gateway.base_url, "https://assess.example.org");
        assert_eq!(config.gateway.rate_limit_markers, vec!["quota exceeded"]);
        assert_eq!(config.store.parse_backend().0, StoreBackend::Memory);
        assert_eq!(config.catalog.path, Some(PathBuf::from("grid.json")));
        assert_eq!(
            config.logging.conversation_log,
            Some(PathBuf::from("events.jsonl"))
        );
        assert_eq!(config.output.format, Some(ReportFormat::Json));

        let params = config.to_assessment_params();
        assert_eq!(params.gateway_timeout, Duration::from_secs(10));
        assert_eq!(
            params.progression,
            ProgressionPolicy::AdaptiveSkip { max_low_score: 1 }
        );
        assert_eq!(params.max_answer_chars, 2000);
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_deserialize_partial_config() {
        let toml_str = r#"
[gateway]
timeout_secs = 5
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.gateway.timeout_secs, 5);
        // Defaults should apply
        assert_eq!(config.gateway.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.store.parse_backend().0, StoreBackend::File);
        assert_eq!(config.assessment.max_answer_chars, DEFAULT_MAX_ANSWER_CHARS);
        assert!(config.output.color);
    }

    #[test]
    fn test_validate_collects_every_issue() {
        let toml_str = r#"
[gateway]
base_url = ""

[store]
backend = "postgres"

[assessment]
progression = "shuffle"
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        let issues = config.validate();
        assert_eq!(issues.len(), 3);
        assert_eq!(issues.iter().filter(|i| i.is_error()).count(), 1);
    }

    #[test]
    fn test_validate_valid_config() {
        let config = FileConfig::default();
        assert!(config.validate().is_empty());
    }
}
