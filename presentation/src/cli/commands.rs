//! CLI command definitions

use assess_domain::ReportFormat;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Rendering of a results report on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Colored summary table
    Console,
    /// Structured JSON document
    Json,
    /// Printable HTML page
    Html,
}

impl From<OutputFormat> for ReportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Console => ReportFormat::Console,
            OutputFormat::Json => ReportFormat::Json,
            OutputFormat::Html => ReportFormat::Html,
        }
    }
}

/// CLI arguments for digi-assess
#[derive(Parser, Debug)]
#[command(name = "digi-assess")]
#[command(author, version, about = "Conversational digital-maturity assessment")]
#[command(long_about = r#"
digi-assess walks a company through a 72-criterion digital-maturity grid,
one question at a time, and scores the answers into a maturity profile.

Each answer is scored 0-3 by the remote evaluation service. The grid covers
six dimensions (Stratégie, Culture & Humain, Relation Client, Processus,
Technologie, Sécurité) of four tiers each.

Configuration files are loaded from (in priority order):
1. --config <path>     Explicit config file
2. ./assess.toml       Project-level config
3. ~/.config/digi-assess/config.toml   Global config
Environment variables prefixed with DIGI_ASSESS_ override all of them.

Example:
  digi-assess chat
  digi-assess start --session acme-2026
  digi-assess answer --session acme-2026 "Nous avons une stratégie écrite"
  digi-assess results --session acme-2026 --format html --out rapport.html
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Owner id the sessions are recorded under
    #[arg(long, global = true, default_value = "local")]
    pub owner: String,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Open a new session and print the first question
    Start {
        /// Session id (generated when omitted)
        #[arg(long, value_name = "ID")]
        session: Option<String>,
    },

    /// Submit an answer to the outstanding question
    Answer {
        #[arg(long, value_name = "ID")]
        session: String,

        /// The answer text
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Show the outstanding question of a session
    Resume {
        /// Session id (defaults to the latest unfinished session)
        #[arg(long, value_name = "ID")]
        session: Option<String>,
    },

    /// Score a session and print or write the report
    Results {
        #[arg(long, value_name = "ID")]
        session: String,

        /// Report format
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Write the report to a file instead of stdout
        #[arg(short, long, value_name = "PATH")]
        out: Option<PathBuf>,
    },

    /// Run the assessment interactively
    Chat {
        /// Session id to continue (defaults to the latest unfinished session)
        #[arg(long, value_name = "ID")]
        session: Option<String>,
    },

    /// List the criteria of the loaded grid
    Catalog,

    /// Show configuration sources and issues
    Config,
}

impl Command {
    /// The answer words joined back into one string.
    pub fn answer_text(&self) -> Option<String> {
        match self {
            Command::Answer { text, .. } => Some(text.join(" ")),
            _ => None,
        }
    }
}
