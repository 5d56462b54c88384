//! Gateway configuration from TOML (`[gateway]` section)

use assess_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Raw gateway configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileGatewayConfig {
    /// Root URL of the question/evaluation service
    pub base_url: String,
    /// Upper bound for a single call, in seconds
    pub timeout_secs: u64,
    /// Error-payload phrases that mark a rate-limit rejection
    pub rate_limit_markers: Vec<String>,
}

impl Default for FileGatewayConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            rate_limit_markers: assess_application::default_rate_limit_markers(),
        }
    }
}

impl FileGatewayConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        if self.base_url.trim().is_empty() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::EmptyValue {
                    field: "gateway.base_url".to_string(),
                },
                "gateway.base_url must not be empty",
            ));
        } else if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::InvalidEnumValue {
                    field: "gateway.base_url".to_string(),
                    value: self.base_url.clone(),
                    valid_values: vec!["http://...".to_string(), "https://...".to_string()],
                },
                format!("gateway.base_url: '{}' is not an http(s) URL", self.base_url),
            ));
        }
        if self.timeout_secs == 0 {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::OutOfRange {
                    field: "gateway.timeout_secs".to_string(),
                    value: 0,
                },
                "gateway.timeout_secs cannot be 0, using 1",
            ));
        }
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FileGatewayConfig::default();
        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.rate_limit_markers.len(), 2);
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_invalid_values() {
        let config = FileGatewayConfig {
            base_url: "localhost".to_string(),
            timeout_secs: 0,
            ..Default::default()
        };
        let issues = config.validate();
        assert_eq!(issues.len(), 2);
        assert!(issues[0].is_error());
        assert!(!issues[1].is_error());
        assert_eq!(config.timeout(), Duration::from_secs(1));
    }
}
