//! Application-level configuration.
//!
//! - [`AssessmentParams`]: gateway timeout, progression policy, input limits

pub mod assessment_params;

pub use assessment_params::AssessmentParams;
