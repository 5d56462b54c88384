//! Assessment Gateway port
//!
//! Defines the interface to the remote service that phrases questions and
//! scores answers.

use assess_domain::{Criterion, Evaluation};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Phrases that mark a rate-limit rejection in an error payload.
pub const DEFAULT_RATE_LIMIT_MARKERS: [&str; 2] = ["Too many requests", "rate limit"];

/// Errors that can occur during gateway operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout")]
    Timeout,
}

impl GatewayError {
    /// Whether the failure is a recognized rate-limit condition.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, GatewayError::RateLimited(_))
    }

    /// Classify a failure message: rate-limited if it contains any marker
    /// (case-insensitive), otherwise a plain request failure.
    pub fn from_failure_message(message: impl Into<String>, markers: &[String]) -> Self {
        let message = message.into();
        if contains_marker(&message, markers) {
            GatewayError::RateLimited(message)
        } else {
            GatewayError::RequestFailed(message)
        }
    }
}

/// Case-insensitive marker search.
pub fn contains_marker(message: &str, markers: &[String]) -> bool {
    let haystack = message.to_lowercase();
    markers
        .iter()
        .any(|m| !m.is_empty() && haystack.contains(&m.to_lowercase()))
}

/// The default markers as owned strings.
pub fn default_rate_limit_markers() -> Vec<String> {
    DEFAULT_RATE_LIMIT_MARKERS
        .iter()
        .map(|m| m.to_string())
        .collect()
}

/// Response of `formulate_question`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormulatedQuestion {
    pub formulated_question: String,
}

/// Response of `evaluate_react`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationOutcome {
    pub evaluation: Evaluation,
    pub ai_reaction: String,
}

/// Gateway to the question/evaluation service
///
/// This port defines how the application layer talks to the remote
/// assessment service. Implementations (adapters) live in the
/// infrastructure layer. Both calls may fail with
/// [`GatewayError::RateLimited`], which callers recover from locally.
#[async_trait]
pub trait AssessmentGateway: Send + Sync {
    /// Phrase a criterion as a conversational question.
    async fn formulate_question(
        &self,
        criterion_text: &str,
        is_first_question: bool,
    ) -> Result<FormulatedQuestion, GatewayError>;

    /// Score an answer against a criterion and produce a short reaction.
    async fn evaluate_react(
        &self,
        user_answer: &str,
        criterion: &Criterion,
    ) -> Result<EvaluationOutcome, GatewayError>;
}
