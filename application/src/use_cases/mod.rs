//! Use cases for the application layer

pub mod conduct_assessment;
pub mod get_results;
