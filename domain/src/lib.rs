//! Domain layer for digi-assess
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Catalog
//!
//! An ordered grid of criteria grouped into six dimensions of four tiers.
//! Declaration order is the asking order.
//!
//! ## Session
//!
//! One assessment run: the catalog position being asked and the history of
//! questions and scored answers.
//!
//! ## Scoring
//!
//! A pure function from per-criterion evaluations to dimension percentages,
//! tier attainment, a profile and a gap list.

pub mod assessment;
pub mod catalog;
pub mod config;
pub mod core;
pub mod progression;
pub mod scoring;

// Re-export commonly used types
pub use assessment::{
    entities::{EntryState, HistoryEntry, Session, is_valid_session_id},
    repository::{SessionRepository, StoreError, check_revision},
    value_objects::{Evaluation, MAX_SCORE, SessionStatus},
};
pub use catalog::{
    dimension::{Dimension, TIER_COUNT, Tier},
    entities::{Criterion, CriterionId, ScoringOption},
    grid::Catalog,
};
pub use config::{
    output_format::ReportFormat,
    validation::{ConfigIssue, ConfigIssueCode, Severity},
};
pub use core::error::DomainError;
pub use progression::{NextStep, ProgressionPolicy};
pub use scoring::{
    engine::{TIER_THRESHOLD, evaluations_from_history, score},
    profile::Profile,
    report::{DigitalGap, DimensionResult, ResultsReport},
};
