//! Assessment parameters for the state machine.
//!
//! [`AssessmentParams`] groups the static parameters that control the
//! conversation state machine in
//! [`ConductAssessmentUseCase`](crate::use_cases::conduct_assessment::ConductAssessmentUseCase).
//! These are application-layer concerns, not domain policy.

use assess_domain::ProgressionPolicy;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// State machine control parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentParams {
    /// Upper bound for each gateway call; expiry counts as a gateway failure.
    pub gateway_timeout: Duration,
    /// How the next criterion is chosen after an answer.
    pub progression: ProgressionPolicy,
    /// Longest accepted answer, in characters.
    pub max_answer_chars: usize,
}

impl Default for AssessmentParams {
    fn default() -> Self {
        Self {
            gateway_timeout: Duration::from_secs(30),
            progression: ProgressionPolicy::Sequential,
            max_answer_chars: 4000,
        }
    }
}

impl AssessmentParams {
    // ==================== Builder Methods ====================

    pub fn with_gateway_timeout(mut self, timeout: Duration) -> Self {
        self.gateway_timeout = timeout;
        self
    }

    pub fn with_progression(mut self, progression: ProgressionPolicy) -> Self {
        self.progression = progression;
        self
    }

    pub fn with_max_answer_chars(mut self, max: usize) -> Self {
        self.max_answer_chars = max;
        self
    }
}
