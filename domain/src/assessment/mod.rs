//! Assessment session domain.
//!
//! - [`entities::Session`]: one assessment run and its history
//! - [`entities::HistoryEntry`]: one asked question with its answer state
//! - [`value_objects::Evaluation`]: score 0..=3 plus justification
//! - [`repository::SessionRepository`]: trait for session persistence

pub mod entities;
pub mod repository;
pub mod value_objects;
