//! Structured configuration issues.
//!
//! Loaders collect every problem they detect instead of failing on the
//! first one, so the CLI can print them all.

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: the configuration cannot work at all.
    Error,
    /// Non-fatal: a default is used instead.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigIssueCode {
    /// A field has a value outside its allowed set.
    InvalidEnumValue {
        field: String,
        value: String,
        valid_values: Vec<String>,
    },
    /// A required string is empty.
    EmptyValue { field: String },
    /// A numeric field is out of range.
    OutOfRange { field: String, value: u64 },
}

/// A detected issue in the configuration.
#[derive(Debug, Clone)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    pub fn error(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
        }
    }

    pub fn warning(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors_set_severity() {
        let e = ConfigIssue::error(
            ConfigIssueCode::EmptyValue {
                field: "gateway.base_url".to_string(),
            },
            "empty",
        );
        assert!(e.is_error());
        let w = ConfigIssue::warning(
            ConfigIssueCode::OutOfRange {
                field: "gateway.timeout_secs".to_string(),
                value: 0,
            },
            "zero",
        );
        assert!(!w.is_error());
    }
}
