//! HTTP adapter for the question/evaluation service.
//!
//! Targets two JSON endpoints under a base URL:
//!
//! - `POST /api/v1/formulate_question` `{criterion_text, is_first_question}`
//!   -> `{formulated_question}`
//! - `POST /api/v1/evaluate_react` `{user_answer, current_criterion}`
//!   -> `{evaluation: {score, justification}, ai_reaction}`
//!
//! HTTP 429, or an error payload or transport message containing a
//! configured marker, maps to [`GatewayError::RateLimited`].

use assess_application::ports::assessment_gateway::{
    AssessmentGateway, EvaluationOutcome, FormulatedQuestion, GatewayError, contains_marker,
};
use assess_domain::{Criterion, ScoringOption};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const FORMULATE_PATH: &str = "/api/v1/formulate_question";
const EVALUATE_PATH: &str = "/api/v1/evaluate_react";

/// Criterion as the service expects it.
#[derive(Debug, Serialize)]
struct CriterionPayload<'a> {
    id: &'a str,
    dimension: &'static str,
    palier: u8,
    criterion_text: &'a str,
    options: &'a [ScoringOption],
}

impl<'a> From<&'a Criterion> for CriterionPayload<'a> {
    fn from(c: &'a Criterion) -> Self {
        Self {
            id: c.id.as_str(),
            dimension: c.dimension.label(),
            palier: c.tier.value(),
            criterion_text: &c.prompt_text,
            options: &c.options,
        }
    }
}

#[derive(Debug, Serialize)]
struct FormulateRequest<'a> {
    criterion_text: &'a str,
    is_first_question: bool,
}

#[derive(Debug, Serialize)]
struct EvaluateRequest<'a> {
    user_answer: &'a str,
    current_criterion: CriterionPayload<'a>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: serde_json::Value,
}

/// [`AssessmentGateway`] over HTTP with `reqwest`.
pub struct HttpAssessmentGateway {
    client: reqwest::Client,
    base_url: String,
    rate_limit_markers: Vec<String>,
}

impl HttpAssessmentGateway {
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        rate_limit_markers: Vec<String>,
    ) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("digi-assess/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| GatewayError::ConnectionError(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            rate_limit_markers,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post<B, R>(&self, path: &str, body: &B) -> Result<R, GatewayError>
    where
        B: Serialize + ?Sized,
        R: serde::de::DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, "Gateway request");

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| map_transport_error(e, &self.rate_limit_markers))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| map_transport_error(e, &self.rate_limit_markers))?;

        if !status.is_success() {
            return Err(classify_failure(status, &text, &self.rate_limit_markers));
        }
        parse_body(&text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TransportFailure {
    Timeout,
    Connect,
    Other,
}

fn map_transport_error(e: reqwest::Error, markers: &[String]) -> GatewayError {
    let kind = if e.is_timeout() {
        TransportFailure::Timeout
    } else if e.is_connect() {
        TransportFailure::Connect
    } else {
        TransportFailure::Other
    };
    classify_transport(kind, e.to_string(), markers)
}

/// Markers are checked on transport messages too, so a proxy answering
/// "Too many requests" is still treated as a rate limit.
fn classify_transport(kind: TransportFailure, message: String, markers: &[String]) -> GatewayError {
    match kind {
        TransportFailure::Timeout => GatewayError::Timeout,
        _ if contains_marker(&message, markers) => GatewayError::RateLimited(message),
        TransportFailure::Connect => GatewayError::ConnectionError(message),
        TransportFailure::Other => GatewayError::RequestFailed(message),
    }
}

/// The `detail` field of an error body, or the raw body.
fn failure_message(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody {
            detail: serde_json::Value::String(s),
        }) => s,
        Ok(ErrorBody { detail }) => detail.to_string(),
        Err(_) => body.trim().to_string(),
    }
}

fn classify_failure(status: StatusCode, body: &str, markers: &[String]) -> GatewayError {
    let message = failure_message(body);
    if status == StatusCode::TOO_MANY_REQUESTS {
        return GatewayError::RateLimited(message);
    }
    GatewayError::from_failure_message(format!("HTTP {}: {}", status.as_u16(), message), markers)
}

fn parse_body<R: serde::de::DeserializeOwned>(body: &str) -> Result<R, GatewayError> {
    serde_json::from_str(body).map_err(|e| GatewayError::InvalidResponse(e.to_string()))
}

#[async_trait]
impl AssessmentGateway for HttpAssessmentGateway {
    async fn formulate_question(
        &self,
        criterion_text: &str,
        is_first_question: bool,
    ) -> Result<FormulatedQuestion, GatewayError> {
        self.post(
            FORMULATE_PATH,
            &FormulateRequest {
                criterion_text,
                is_first_question,
            },
        )
        .await
    }

    async fn evaluate_react(
        &self,
        user_answer: &str,
        criterion: &Criterion,
    ) -> Result<EvaluationOutcome, GatewayError> {
        self.post(
            EVALUATE_PATH,
            &EvaluateRequest {
                user_answer,
                current_criterion: CriterionPayload::from(criterion),
            },
        )
        .await
    }
}
