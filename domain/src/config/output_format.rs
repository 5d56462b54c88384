//! Results output format value object

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How a results report is rendered for the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Colored table for the terminal (default)
    #[default]
    Console,
    /// Structured JSON document
    Json,
    /// Printable HTML page
    Html,
}

impl ReportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Console => "txt",
            ReportFormat::Json => "json",
            ReportFormat::Html => "html",
        }
    }
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "console" | "text" => Ok(ReportFormat::Console),
            "json" => Ok(ReportFormat::Json),
            "html" | "pdf" => Ok(ReportFormat::Html),
            other => Err(format!("unknown report format '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_console() {
        assert_eq!(ReportFormat::default(), ReportFormat::Console);
    }

    #[test]
    fn test_serialize_lowercase() {
        let json = serde_json::to_string(&ReportFormat::Html).unwrap();
        assert_eq!(json, "\"html\"");
    }

    #[test]
    fn test_parse_aliases() {
        assert_eq!("PDF".parse::<ReportFormat>().unwrap(), ReportFormat::Html);
        assert_eq!("text".parse::<ReportFormat>().unwrap(), ReportFormat::Console);
        assert!("xml".parse::<ReportFormat>().is_err());
    }
}
