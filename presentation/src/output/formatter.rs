//! Output formatter trait

use super::console::ConsoleFormatter;
use super::html::HtmlReport;
use super::structured::StructuredResults;
use assess_domain::{Catalog, ReportFormat};

/// Trait for rendering a results document
pub trait ReportFormatter {
    fn format(&self, results: &StructuredResults) -> String;
}

/// Pretty-printed JSON
pub struct JsonFormatter;

impl ReportFormatter for JsonFormatter {
    fn format(&self, results: &StructuredResults) -> String {
        results.to_json()
    }
}

/// Render `results` in the requested format.
pub fn render_report(format: ReportFormat, catalog: &Catalog, results: &StructuredResults) -> String {
    match format {
        ReportFormat::Console => ConsoleFormatter.format(results),
        ReportFormat::Json => JsonFormatter.format(results),
        ReportFormat::Html => HtmlReport::new(catalog).format(results),
    }
}
