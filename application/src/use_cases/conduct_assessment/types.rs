//! Type definitions for the ConductAssessment use case.

use crate::ports::assessment_gateway::GatewayError;
use assess_domain::{Evaluation, HistoryEntry, Session, SessionStatus, StoreError};
use serde::Serialize;
use thiserror::Error;

/// Criterion id reported once the last answer has been recorded.
pub const FINISHED_CRITERION_ID: &str = "FINISHED";

/// Coarse classification of [`AssessmentError`] for callers mapping errors
/// to exit codes or status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Forbidden,
    UpstreamFailure,
    InternalInconsistency,
    ValidationError,
    Store,
}

/// Errors that can occur while conducting an assessment
#[derive(Error, Debug)]
pub enum AssessmentError {
    #[error("Session not found: {0}")]
    NotFound(String),

    #[error("Session {session_id} belongs to another owner")]
    Forbidden { session_id: String },

    #[error("Evaluation service failed: {0}")]
    UpstreamFailure(GatewayError),

    #[error("Internal inconsistency: {0}")]
    InternalInconsistency(String),

    #[error("Invalid request: {0}")]
    ValidationError(String),

    #[error("Session store error: {0}")]
    Store(#[from] StoreError),
}

impl AssessmentError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AssessmentError::NotFound(_) => ErrorKind::NotFound,
            AssessmentError::Forbidden { .. } => ErrorKind::Forbidden,
            AssessmentError::UpstreamFailure(_) => ErrorKind::UpstreamFailure,
            AssessmentError::InternalInconsistency(_) => ErrorKind::InternalInconsistency,
            AssessmentError::ValidationError(_) => ErrorKind::ValidationError,
            AssessmentError::Store(_) => ErrorKind::Store,
        }
    }
}

/// Output of `resume`: the session as the caller should render it.
#[derive(Debug, Clone, Serialize)]
pub struct ResumeOutput {
    pub session_id: String,
    pub history: Vec<HistoryEntry>,
    pub current_index: usize,
    pub status: SessionStatus,
}

impl From<&Session> for ResumeOutput {
    fn from(session: &Session) -> Self {
        Self {
            session_id: session.session_id.clone(),
            history: session.history.clone(),
            current_index: session.current_index,
            status: session.status,
        }
    }
}

impl ResumeOutput {
    /// The outstanding question, if one is waiting for an answer.
    pub fn pending_question(&self) -> Option<&str> {
        self.history
            .last()
            .filter(|e| e.is_awaiting())
            .and_then(|e| e.ai_question.as_deref())
    }

    pub fn is_finished(&self) -> bool {
        self.status == SessionStatus::Finished
    }
}

/// Output of `submit_answer`.
#[derive(Debug, Clone, Serialize)]
pub struct SubmitAnswerOutput {
    pub session_id: String,
    /// Text to show the user: reaction plus next question, or the closing text.
    pub ai_question: String,
    /// Criterion now being asked, or [`FINISHED_CRITERION_ID`].
    pub current_criterion_id: String,
    /// Evaluation of the submitted answer; absent on first contact.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evaluation: Option<Evaluation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<u8>,
    pub status: SessionStatus,
}

impl SubmitAnswerOutput {
    pub fn is_finished(&self) -> bool {
        self.status == SessionStatus::Finished
    }
}
