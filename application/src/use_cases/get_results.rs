//! Get Results use case
//!
//! Read-only: loads a session and scores its answered entries. Unfinished
//! sessions are scored too, missing criteria counting as zero.

use crate::use_cases::conduct_assessment::{AssessmentError, validate_session_id};
use assess_domain::{Catalog, ResultsReport, Session, SessionRepository, score};
use std::sync::Arc;
use tracing::debug;

/// A session together with its computed report.
#[derive(Debug, Clone)]
pub struct SessionResults {
    pub session: Session,
    pub report: ResultsReport,
}

impl SessionResults {
    /// Fraction of the catalog answered so far, in percent.
    pub fn completion_percentage(&self, catalog: &Catalog) -> f64 {
        if catalog.is_empty() {
            return 0.0;
        }
        let answered = self.session.answered_count().min(catalog.len());
        (answered as f64 / catalog.len() as f64 * 100.0).min(100.0)
    }
}

/// Use case for computing the results of a session
pub struct GetResultsUseCase {
    store: Arc<dyn SessionRepository>,
    catalog: Arc<Catalog>,
}

impl GetResultsUseCase {
    pub fn new(store: Arc<dyn SessionRepository>, catalog: Arc<Catalog>) -> Self {
        Self { store, catalog }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub async fn execute(
        &self,
        session_id: &str,
        owner_id: &str,
    ) -> Result<SessionResults, AssessmentError> {
        validate_session_id(session_id)?;

        let session = self
            .store
            .find(session_id)
            .await?
            .ok_or_else(|| AssessmentError::NotFound(session_id.to_string()))?;
        if !session.is_owned_by(owner_id) {
            return Err(AssessmentError::Forbidden {
                session_id: session_id.to_string(),
            });
        }

        let report = score(&self.catalog, &session.evaluations());
        debug!(
            session_id,
            global_score = report.global_score,
            profile = %report.profile_name,
            "Session scored"
        );

        Ok(SessionResults { session, report })
    }
}
