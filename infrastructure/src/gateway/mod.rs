//! Assessment gateway adapters.

mod http;

pub use http::HttpAssessmentGateway;
