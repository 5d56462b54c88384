//! Presentation layer for digi-assess
//!
//! This crate contains CLI definitions, report formatters,
//! progress reporters, and the interactive assessment loop.

pub mod chat;
pub mod cli;
pub mod config;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use chat::{ChatError, ChatRepl};
pub use cli::commands::{Cli, Command, OutputFormat};
pub use cli::session::generate_session_id;
pub use config::{OutputConfig, ReplConfig};
pub use output::console::ConsoleFormatter;
pub use output::formatter::{JsonFormatter, ReportFormatter, render_report};
pub use output::html::HtmlReport;
pub use output::structured::StructuredResults;
pub use progress::reporter::{ProgressReporter, TurnSpinner};
