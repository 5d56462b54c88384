//! Application layer for digi-assess
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::AssessmentParams;
pub use ports::{
    assessment_gateway::{
        AssessmentGateway, DEFAULT_RATE_LIMIT_MARKERS, EvaluationOutcome, FormulatedQuestion,
        GatewayError, contains_marker, default_rate_limit_markers,
    },
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
};
pub use use_cases::conduct_assessment::{
    AssessmentError, ConductAssessmentUseCase, ErrorKind, FINISHED_CRITERION_ID, ResumeOutput,
    SubmitAnswerOutput,
};
pub use use_cases::get_results::{GetResultsUseCase, SessionResults};
