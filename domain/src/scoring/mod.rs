//! Scoring and profiling.
//!
//! - [`engine::score`]: evaluations to [`report::ResultsReport`]
//! - [`profile::Profile`]: four-band classification of the global score

pub mod engine;
pub mod profile;
pub mod report;
