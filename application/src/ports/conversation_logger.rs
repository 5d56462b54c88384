//! Port for structured assessment transcripts.
//!
//! Defines the [`ConversationLogger`] trait for recording what happened in
//! each assessment turn (questions asked, fallbacks used, answers scored,
//! sessions finished) to a machine-readable log.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostics, this port captures the transcript (JSONL).

use serde_json::{Value, json};

/// A structured assessment event for logging.
pub struct ConversationEvent {
    /// Event type identifier (e.g. "question_generated", "answer_recorded").
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl ConversationEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }

    pub fn session_started(session_id: &str, owner_id: &str) -> Self {
        Self::new(
            "session_started",
            json!({ "session_id": session_id, "owner_id": owner_id }),
        )
    }

    pub fn question_generated(session_id: &str, criterion_id: &str, question: &str) -> Self {
        Self::new(
            "question_generated",
            json!({
                "session_id": session_id,
                "criterion_id": criterion_id,
                "question": question,
            }),
        )
    }

    /// A deterministic substitute replaced a failed gateway call.
    pub fn fallback_used(session_id: &str, operation: &str, reason: &str) -> Self {
        Self::new(
            "fallback_used",
            json!({
                "session_id": session_id,
                "operation": operation,
                "reason": reason,
            }),
        )
    }

    pub fn answer_recorded(session_id: &str, criterion_id: &str, score: u8, answer: &str) -> Self {
        Self::new(
            "answer_recorded",
            json!({
                "session_id": session_id,
                "criterion_id": criterion_id,
                "score": score,
                "answer": answer,
            }),
        )
    }

    pub fn session_finished(session_id: &str, answered: usize) -> Self {
        Self::new(
            "session_finished",
            json!({ "session_id": session_id, "answered": answered }),
        )
    }
}

/// Port for logging assessment events to a structured log.
///
/// `log` is synchronous and infallible; logging failures are ignored so
/// they never disturb an assessment turn.
pub trait ConversationLogger: Send + Sync {
    fn log(&self, event: ConversationEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoConversationLogger;

impl ConversationLogger for NoConversationLogger {
    fn log(&self, _event: ConversationEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answer_recorded_payload() {
        let event = ConversationEvent::answer_recorded("s-1", "D1-P1-C1", 2, "Oui");
        assert_eq!(event.event_type, "answer_recorded");
        assert_eq!(event.payload["score"], 2);
        assert_eq!(event.payload["criterion_id"], "D1-P1-C1");
    }

    #[test]
    fn test_fallback_payload() {
        let event = ConversationEvent::fallback_used("s-1", "formulate_question", "Timeout");
        assert_eq!(event.payload["operation"], "formulate_question");
    }
}
