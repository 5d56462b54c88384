//! Resume decision table.
//!
//! [`plan_repair`] inspects a session and describes the single change
//! needed to leave it with an outstanding question. The use case applies
//! the change in one place.

use assess_domain::Session;

/// Change needed so the session has a question waiting for an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionRepair {
    /// Nothing to generate.
    Nothing,
    /// Append an awaiting entry for the criterion at `current_index`.
    Append {
        is_first_question: bool,
        reason: &'static str,
    },
    /// The awaiting last entry lost its question; set it again.
    Backfill,
}

impl QuestionRepair {
    pub fn needs_question(&self) -> bool {
        !matches!(self, QuestionRepair::Nothing)
    }
}

/// Evaluate the decision table, first match wins:
///
/// 1. empty history: first question
/// 2. last entry transitional: new entry
/// 3. last entry awaiting: backfill a missing question, else nothing
/// 4. `current_index` past the history: new entry
/// 5. last entry answered: new entry
///
/// Finished sessions and indices past the catalog never generate.
pub fn plan_repair(session: &Session, catalog_len: usize) -> QuestionRepair {
    if session.is_finished() || session.current_index >= catalog_len {
        return QuestionRepair::Nothing;
    }

    let Some(last) = session.last_entry() else {
        return QuestionRepair::Append {
            is_first_question: session.current_index == 0,
            reason: "empty history",
        };
    };

    if last.is_transitional() {
        return QuestionRepair::Append {
            is_first_question: false,
            reason: "last entry has no question",
        };
    }

    if last.is_awaiting() {
        return if last.ai_question.is_none() {
            QuestionRepair::Backfill
        } else {
            QuestionRepair::Nothing
        };
    }

    let reason = if session.current_index >= session.history.len() {
        "current index past history"
    } else {
        "last entry answered"
    };
    QuestionRepair::Append {
        is_first_question: false,
        reason,
    }
}
