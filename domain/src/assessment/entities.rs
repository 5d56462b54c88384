//! Assessment session entities

use super::value_objects::{Evaluation, SessionStatus};
use crate::catalog::dimension::{Dimension, Tier};
use crate::catalog::entities::CriterionId;
use crate::catalog::grid::Catalog;
use crate::scoring::engine::evaluations_from_history;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Whether a history entry still waits for the user's answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum EntryState {
    /// Question asked, answer outstanding.
    Awaiting,
    /// Answer received and scored.
    Answered {
        user_answer: String,
        evaluation: Evaluation,
        ai_reaction: String,
    },
}

/// One asked question and, once given, its answer (Entity)
///
/// Entries are *awaiting* (question set, no answer), *answered* (both set)
/// or *transitional* (answer set, question not yet attached). The last one
/// only exists inside a single state-machine turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub criterion_id: CriterionId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_question: Option<String>,
    #[serde(flatten)]
    pub state: EntryState,
}

impl HistoryEntry {
    /// A freshly asked question.
    pub fn awaiting(criterion_id: CriterionId, ai_question: impl Into<String>) -> Self {
        Self {
            criterion_id,
            ai_question: Some(ai_question.into()),
            state: EntryState::Awaiting,
        }
    }

    /// An answer recorded without a question attached yet.
    pub fn answered(
        criterion_id: CriterionId,
        user_answer: impl Into<String>,
        evaluation: Evaluation,
        ai_reaction: impl Into<String>,
    ) -> Self {
        Self {
            criterion_id,
            ai_question: None,
            state: EntryState::Answered {
                user_answer: user_answer.into(),
                evaluation,
                ai_reaction: ai_reaction.into(),
            },
        }
    }

    pub fn is_awaiting(&self) -> bool {
        matches!(self.state, EntryState::Awaiting)
    }

    /// Answered and carrying a question.
    pub fn is_answered(&self) -> bool {
        !self.is_awaiting() && self.ai_question.is_some()
    }

    /// Answered but no question attached yet.
    pub fn is_transitional(&self) -> bool {
        !self.is_awaiting() && self.ai_question.is_none()
    }

    /// Fill an awaiting entry in place.
    pub fn record_answer(
        &mut self,
        user_answer: impl Into<String>,
        evaluation: Evaluation,
        ai_reaction: impl Into<String>,
    ) {
        self.state = EntryState::Answered {
            user_answer: user_answer.into(),
            evaluation,
            ai_reaction: ai_reaction.into(),
        };
    }

    pub fn user_answer(&self) -> Option<&str> {
        match &self.state {
            EntryState::Answered { user_answer, .. } => Some(user_answer),
            EntryState::Awaiting => None,
        }
    }

    pub fn evaluation(&self) -> Option<&Evaluation> {
        match &self.state {
            EntryState::Answered { evaluation, .. } => Some(evaluation),
            EntryState::Awaiting => None,
        }
    }

    pub fn ai_reaction(&self) -> Option<&str> {
        match &self.state {
            EntryState::Answered { ai_reaction, .. } => Some(ai_reaction),
            EntryState::Awaiting => None,
        }
    }
}

/// One run of the assessment for one owner (Entity)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub session_id: String,
    pub owner_id: String,
    pub current_index: usize,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
    #[serde(default)]
    pub status: SessionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Number of writes so far; stores reject stale revisions.
    #[serde(default)]
    pub revision: u64,
}

/// Whether `session_id` is usable as a record key and a file name:
/// ASCII letters, digits, `-`, `_` and `.`, not starting with `.`.
pub fn is_valid_session_id(session_id: &str) -> bool {
    !session_id.is_empty()
        && !session_id.starts_with('.')
        && session_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

impl Session {
    pub fn new(session_id: impl Into<String>, owner_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            session_id: session_id.into(),
            owner_id: owner_id.into(),
            current_index: 0,
            history: Vec::new(),
            status: SessionStatus::InProgress,
            created_at: now,
            updated_at: now,
            revision: 0,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.status == SessionStatus::Finished
    }

    pub fn is_owned_by(&self, owner_id: &str) -> bool {
        self.owner_id == owner_id
    }

    pub fn last_entry(&self) -> Option<&HistoryEntry> {
        self.history.last()
    }

    pub fn last_entry_mut(&mut self) -> Option<&mut HistoryEntry> {
        self.history.last_mut()
    }

    pub fn awaiting_count(&self) -> usize {
        self.history.iter().filter(|e| e.is_awaiting()).count()
    }

    pub fn answered_count(&self) -> usize {
        self.history.iter().filter(|e| !e.is_awaiting()).count()
    }

    /// Map of every scored criterion to its evaluation.
    ///
    /// When a criterion appears more than once the latest answer wins.
    pub fn evaluations(&self) -> HashMap<CriterionId, Evaluation> {
        evaluations_from_history(&self.history)
    }

    /// Cumulative answered score of one (dimension, tier) group.
    pub fn tier_score(&self, catalog: &Catalog, dimension: Dimension, tier: Tier) -> u32 {
        self.evaluations()
            .iter()
            .filter_map(|(id, ev)| catalog.find(id).map(|c| (c, ev)))
            .filter(|(c, _)| c.dimension == dimension && c.tier == tier)
            .map(|(_, ev)| ev.score() as u32)
            .sum()
    }

    /// Bump the revision and timestamp ahead of a write.
    pub fn touch(&mut self) {
        self.revision += 1;
        self.updated_at = Utc::now();
    }
}
