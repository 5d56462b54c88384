//! Conduct Assessment use case
//!
//! Drives one assessment conversation through the catalog:
//!
//! | Call            | Session state               | Effect                                  |
//! |-----------------|-----------------------------|-----------------------------------------|
//! | `submit_answer` | none                        | create at index 0, return first question |
//! | `submit_answer` | in progress                 | score answer, advance, ask next question |
//! | `submit_answer` | in progress, last criterion | score answer, finish                     |
//! | `resume`        | in progress                 | repair the outstanding question          |
//! | any             | finished                    | terminal; nothing is generated           |
//!
//! Every gateway call is bounded by [`AssessmentParams::gateway_timeout`].
//! Rate-limited calls and failed question phrasing fall back to fixed texts;
//! any other evaluation failure aborts the turn without writing.

mod fallback;
mod locks;
mod repair;
mod types;

pub use fallback::{NEUTRAL_REACTION, SKIP_NOTICE, WELCOME_FALLBACK};
pub use repair::{QuestionRepair, plan_repair};
pub use types::{
    AssessmentError, ErrorKind, FINISHED_CRITERION_ID, ResumeOutput, SubmitAnswerOutput,
};

use crate::config::AssessmentParams;
use crate::ports::assessment_gateway::{AssessmentGateway, EvaluationOutcome, GatewayError};
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use assess_domain::core::string::{is_blank, preview};
use assess_domain::{
    Catalog, Criterion, HistoryEntry, Session, SessionRepository, SessionStatus,
    is_valid_session_id,
};
use locks::SessionLocks;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Use case for conducting an assessment conversation
#[derive(Clone)]
pub struct ConductAssessmentUseCase {
    gateway: Arc<dyn AssessmentGateway>,
    store: Arc<dyn SessionRepository>,
    catalog: Arc<Catalog>,
    params: AssessmentParams,
    conversation_logger: Arc<dyn ConversationLogger>,
    locks: Arc<SessionLocks>,
}

impl ConductAssessmentUseCase {
    pub fn new(
        gateway: Arc<dyn AssessmentGateway>,
        store: Arc<dyn SessionRepository>,
        catalog: Arc<Catalog>,
    ) -> Self {
        Self {
            gateway,
            store,
            catalog,
            params: AssessmentParams::default(),
            conversation_logger: Arc::new(NoConversationLogger),
            locks: Arc::new(SessionLocks::new()),
        }
    }

    pub fn with_params(mut self, params: AssessmentParams) -> Self {
        self.params = params;
        self
    }

    /// Set a conversation logger for structured event logging.
    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Id of the owner's most recently updated unfinished session.
    pub async fn latest_session_id(&self, owner_id: &str) -> Result<Option<String>, AssessmentError> {
        Ok(self
            .store
            .find_latest_in_progress(owner_id)
            .await?
            .map(|s| s.session_id))
    }

    /// First contact: create the session and return the opening question.
    ///
    /// Fails with `ValidationError` if the session already exists.
    pub async fn start(
        &self,
        session_id: &str,
        owner_id: &str,
    ) -> Result<SubmitAnswerOutput, AssessmentError> {
        validate_session_id(session_id)?;
        let _guard = self.locks.acquire(session_id).await;

        if self.store.find(session_id).await?.is_some() {
            return Err(AssessmentError::ValidationError(format!(
                "session {} already exists",
                session_id
            )));
        }
        self.create_session(session_id, owner_id).await
    }

    /// Return the outstanding question of an existing session, generating
    /// it when it is missing. Calling this twice in a row yields the same
    /// state.
    pub async fn resume(
        &self,
        session_id: &str,
        owner_id: &str,
    ) -> Result<ResumeOutput, AssessmentError> {
        validate_session_id(session_id)?;
        let _guard = self.locks.acquire(session_id).await;

        let mut session = self
            .store
            .find(session_id)
            .await?
            .ok_or_else(|| AssessmentError::NotFound(session_id.to_string()))?;
        check_owner(&session, owner_id)?;

        let repair = plan_repair(&session, self.catalog.len());
        debug!(
            session_id,
            current_index = session.current_index,
            history_len = session.history.len(),
            ?repair,
            "Resume decision"
        );

        if !repair.needs_question() {
            return Ok(ResumeOutput::from(&session));
        }

        let catalog = Arc::clone(&self.catalog);
        let criterion = criterion_at(&catalog, session.current_index)?;
        let is_first_question = matches!(
            repair,
            QuestionRepair::Append {
                is_first_question: true,
                ..
            }
        );
        let question = self
            .formulate_or(
                session_id,
                criterion,
                is_first_question,
                fallback::question_for(criterion),
            )
            .await;

        match repair {
            QuestionRepair::Append { .. } => session
                .history
                .push(HistoryEntry::awaiting(criterion.id.clone(), question)),
            QuestionRepair::Backfill => {
                if let Some(last) = session.last_entry_mut() {
                    last.ai_question = Some(question);
                }
            }
            QuestionRepair::Nothing => {}
        }

        session.touch();
        self.store.upsert(&session).await?;
        info!(
            session_id,
            criterion_id = %criterion.id,
            "Outstanding question restored"
        );

        Ok(ResumeOutput::from(&session))
    }

    /// Record an answer and move the conversation forward.
    ///
    /// For an unknown session this is first contact: the session is created
    /// and the opening question returned without consuming `user_answer`.
    pub async fn submit_answer(
        &self,
        session_id: &str,
        owner_id: &str,
        user_answer: &str,
    ) -> Result<SubmitAnswerOutput, AssessmentError> {
        validate_session_id(session_id)?;
        let _guard = self.locks.acquire(session_id).await;

        match self.store.find(session_id).await? {
            None => self.create_session(session_id, owner_id).await,
            Some(session) => {
                check_owner(&session, owner_id)?;
                self.answer(session, user_answer).await
            }
        }
    }

    async fn create_session(
        &self,
        session_id: &str,
        owner_id: &str,
    ) -> Result<SubmitAnswerOutput, AssessmentError> {
        let catalog = Arc::clone(&self.catalog);
        let first = criterion_at(&catalog, 0)?;
        let question = self
            .formulate_or(session_id, first, true, fallback::WELCOME_FALLBACK.to_string())
            .await;

        let mut session = Session::new(session_id, owner_id);
        session.touch();
        self.store.upsert(&session).await?;

        info!(session_id, owner_id, "Assessment session created");
        self.conversation_logger
            .log(ConversationEvent::session_started(session_id, owner_id));

        Ok(SubmitAnswerOutput {
            session_id: session_id.to_string(),
            ai_question: question,
            current_criterion_id: first.id.to_string(),
            evaluation: None,
            score: None,
            status: SessionStatus::InProgress,
        })
    }

    async fn answer(
        &self,
        mut session: Session,
        user_answer: &str,
    ) -> Result<SubmitAnswerOutput, AssessmentError> {
        let session_id = session.session_id.clone();
        if session.is_finished() {
            return Err(AssessmentError::ValidationError(format!(
                "session {} is already finished",
                session_id
            )));
        }
        let answer = self.validate_answer(user_answer)?;

        let catalog = Arc::clone(&self.catalog);
        let index = session.current_index;
        let criterion = criterion_at(&catalog, index)?;

        // Step 1: evaluate
        let outcome = match self
            .bounded(self.gateway.evaluate_react(answer, criterion))
            .await
        {
            Ok(outcome) => outcome,
            Err(e) if e.is_rate_limited() => {
                warn!(session_id = %session_id, criterion_id = %criterion.id, "Evaluation rate-limited, using neutral score");
                self.conversation_logger.log(ConversationEvent::fallback_used(
                    &session_id,
                    "evaluate_react",
                    &e.to_string(),
                ));
                EvaluationOutcome {
                    evaluation: fallback::neutral_evaluation(),
                    ai_reaction: fallback::NEUTRAL_REACTION.to_string(),
                }
            }
            Err(e) => {
                error!(session_id = %session_id, criterion_id = %criterion.id, error = %e, "Evaluation failed, turn aborted");
                return Err(AssessmentError::UpstreamFailure(e));
            }
        };
        let EvaluationOutcome {
            evaluation,
            ai_reaction,
        } = outcome;

        // Step 2: record
        match session.last_entry_mut() {
            Some(last) if last.is_awaiting() && last.criterion_id == criterion.id => {
                last.record_answer(answer, evaluation.clone(), ai_reaction.clone());
            }
            _ => session.history.push(HistoryEntry::answered(
                criterion.id.clone(),
                answer,
                evaluation.clone(),
                ai_reaction.clone(),
            )),
        }
        self.conversation_logger.log(ConversationEvent::answer_recorded(
            &session_id,
            criterion.id.as_str(),
            evaluation.score(),
            answer,
        ));

        // Step 3: progression
        let step = self.params.progression.next_index(&catalog, &session, index);
        debug!(session_id = %session_id, from = index, to = step.index, skipped = step.skipped, "Next position");

        // Step 4: finished
        if step.index >= catalog.len() {
            let closing = fallback::completion_text(&ai_reaction);
            if let Some(last) = session.last_entry_mut() {
                last.ai_question = Some(closing.clone());
            }
            session.current_index = catalog.len();
            session.status = SessionStatus::Finished;
            session.touch();
            self.store.upsert(&session).await?;

            info!(session_id = %session_id, answered = session.answered_count(), "Assessment finished");
            self.conversation_logger.log(ConversationEvent::session_finished(
                &session_id,
                session.answered_count(),
            ));

            return Ok(SubmitAnswerOutput {
                session_id,
                ai_question: closing,
                current_criterion_id: FINISHED_CRITERION_ID.to_string(),
                score: Some(evaluation.score()),
                evaluation: Some(evaluation),
                status: SessionStatus::Finished,
            });
        }

        // Step 5: next question
        let next = criterion_at(&catalog, step.index)?;
        let question = self
            .formulate_or(&session_id, next, false, fallback::question_for(next))
            .await;

        // Step 6: attach, advance, persist
        if let Some(last) = session.last_entry_mut() {
            last.ai_question = Some(question.clone());
        }
        session.current_index = step.index;
        session.touch();
        self.store.upsert(&session).await?;

        info!(
            session_id = %session_id,
            criterion_id = %next.id,
            current_index = step.index,
            "Answer recorded"
        );

        Ok(SubmitAnswerOutput {
            session_id,
            ai_question: fallback::turn_text(&ai_reaction, step.skipped, &question),
            current_criterion_id: next.id.to_string(),
            score: Some(evaluation.score()),
            evaluation: Some(evaluation),
            status: SessionStatus::InProgress,
        })
    }

    fn validate_answer<'a>(&self, user_answer: &'a str) -> Result<&'a str, AssessmentError> {
        let answer = user_answer.trim();
        if is_blank(answer) {
            return Err(AssessmentError::ValidationError(
                "answer must not be empty".to_string(),
            ));
        }
        let chars = answer.chars().count();
        if chars > self.params.max_answer_chars {
            return Err(AssessmentError::ValidationError(format!(
                "answer is {} characters long, limit is {}",
                chars, self.params.max_answer_chars
            )));
        }
        Ok(answer)
    }

    /// Phrase `criterion` remotely, substituting `fallback` on any failure
    /// or an empty reply.
    async fn formulate_or(
        &self,
        session_id: &str,
        criterion: &Criterion,
        is_first_question: bool,
        fallback: String,
    ) -> String {
        let result = self
            .bounded(
                self.gateway
                    .formulate_question(&criterion.prompt_text, is_first_question),
            )
            .await;

        let reason = match result {
            Ok(q) if !is_blank(&q.formulated_question) => {
                debug!(
                    session_id,
                    criterion_id = %criterion.id,
                    question = %preview(&q.formulated_question, 80),
                    "Question formulated"
                );
                self.conversation_logger.log(ConversationEvent::question_generated(
                    session_id,
                    criterion.id.as_str(),
                    &q.formulated_question,
                ));
                return q.formulated_question;
            }
            Ok(_) => "empty reply".to_string(),
            Err(e) => e.to_string(),
        };

        warn!(session_id, criterion_id = %criterion.id, reason = %reason, "Using fallback question");
        self.conversation_logger.log(ConversationEvent::fallback_used(
            session_id,
            "formulate_question",
            &reason,
        ));
        fallback
    }

    async fn bounded<T>(
        &self,
        call: impl Future<Output = Result<T, GatewayError>>,
    ) -> Result<T, GatewayError> {
        match tokio::time::timeout(self.params.gateway_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(GatewayError::Timeout),
        }
    }
}

pub(crate) fn validate_session_id(session_id: &str) -> Result<(), AssessmentError> {
    if is_blank(session_id) {
        return Err(AssessmentError::ValidationError(
            "session_id is required".to_string(),
        ));
    }
    if !is_valid_session_id(session_id) {
        return Err(AssessmentError::ValidationError(format!(
            "session_id '{}' may only contain letters, digits, '-', '_' and '.'",
            session_id
        )));
    }
    Ok(())
}

fn check_owner(session: &Session, owner_id: &str) -> Result<(), AssessmentError> {
    if !session.is_owned_by(owner_id) {
        return Err(AssessmentError::Forbidden {
            session_id: session.session_id.clone(),
        });
    }
    Ok(())
}

fn criterion_at(catalog: &Catalog, index: usize) -> Result<&Criterion, AssessmentError> {
    catalog.get(index).ok_or_else(|| {
        AssessmentError::InternalInconsistency(format!(
            "no criterion at index {} (catalog has {})",
            index,
            catalog.len()
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::assessment_gateway::FormulatedQuestion;
    use assess_domain::{
        Dimension, Evaluation, ProgressionPolicy, StoreError, Tier, check_revision,
    };
    use async_trait::async_trait;
    use std::collections::{HashMap, VecDeque};
    use std::sync::Mutex;
    use std::time::Duration;

    // ==================== Test Mocks ====================

    /// Scripted gateway; unscripted calls succeed with canned replies.
    #[derive(Default)]
    struct MockGateway {
        questions: Mutex<VecDeque<Result<String, GatewayError>>>,
        evaluations: Mutex<VecDeque<Result<EvaluationOutcome, GatewayError>>>,
        evaluation_delay: Option<Duration>,
        formulate_calls: Mutex<Vec<(String, bool)>>,
        evaluate_calls: Mutex<usize>,
    }

    impl MockGateway {
        fn with_questions(self, q: Vec<Result<String, GatewayError>>) -> Self {
            *self.questions.lock().unwrap() = VecDeque::from(q);
            self
        }

        fn with_evaluations(self, e: Vec<Result<EvaluationOutcome, GatewayError>>) -> Self {
            *self.evaluations.lock().unwrap() = VecDeque::from(e);
            self
        }

        fn with_evaluation_delay(mut self, delay: Duration) -> Self {
            self.evaluation_delay = Some(delay);
            self
        }

        fn formulate_count(&self) -> usize {
            self.formulate_calls.lock().unwrap().len()
        }
    }

    fn outcome(score: u8, reaction: &str) -> EvaluationOutcome {
        EvaluationOutcome {
            evaluation: Evaluation::new(score, "ok").unwrap(),
            ai_reaction: reaction.to_string(),
        }
    }

    #[async_trait]
    impl AssessmentGateway for MockGateway {
        async fn formulate_question(
            &self,
            criterion_text: &str,
            is_first_question: bool,
        ) -> Result<FormulatedQuestion, GatewayError> {
            self.formulate_calls
                .lock()
                .unwrap()
                .push((criterion_text.to_string(), is_first_question));
            let scripted = self.questions.lock().unwrap().pop_front();
            let text = match scripted {
                Some(r) => r?,
                None => format!("Q: {}", criterion_text),
            };
            Ok(FormulatedQuestion {
                formulated_question: text,
            })
        }

        async fn evaluate_react(
            &self,
            _user_answer: &str,
            _criterion: &Criterion,
        ) -> Result<EvaluationOutcome, GatewayError> {
            *self.evaluate_calls.lock().unwrap() += 1;
            if let Some(delay) = self.evaluation_delay {
                tokio::time::sleep(delay).await;
            }
            let scripted = self.evaluations.lock().unwrap().pop_front();
            scripted.unwrap_or_else(|| Ok(outcome(2, "Bien.")))
        }
    }

    #[derive(Default)]
    struct MockStore {
        sessions: Mutex<HashMap<String, Session>>,
    }

    impl MockStore {
        fn get(&self, id: &str) -> Option<Session> {
            self.sessions.lock().unwrap().get(id).cloned()
        }

        fn seed(&self, session: Session) {
            self.sessions
                .lock()
                .unwrap()
                .insert(session.session_id.clone(), session);
        }
    }

    #[async_trait]
    impl SessionRepository for MockStore {
        async fn find(&self, session_id: &str) -> Result<Option<Session>, StoreError> {
            Ok(self.get(session_id))
        }

        async fn upsert(&self, session: &Session) -> Result<(), StoreError> {
            let mut sessions = self.sessions.lock().unwrap();
            check_revision(sessions.get(&session.session_id), session)?;
            sessions.insert(session.session_id.clone(), session.clone());
            Ok(())
        }

        async fn find_latest_in_progress(
            &self,
            owner_id: &str,
        ) -> Result<Option<Session>, StoreError> {
            Ok(self
                .sessions
                .lock()
                .unwrap()
                .values()
                .filter(|s| s.owner_id == owner_id && !s.is_finished())
                .max_by_key(|s| s.updated_at)
                .cloned())
        }
    }

    // ==================== Fixtures ====================

    fn criterion(id: &str, dimension: u8, tier: u8) -> Criterion {
        Criterion::new(
            id,
            Dimension::from_number(dimension).unwrap(),
            Tier::new(tier).unwrap(),
            format!("critère {}", id),
        )
    }

    /// One criterion per (dimension, tier): 24 criteria.
    fn small_catalog() -> Catalog {
        let mut criteria = Vec::new();
        for d in 1..=6 {
            for t in 1..=4 {
                criteria.push(criterion(&format!("D{}-P{}-C1", d, t), d, t));
            }
        }
        Catalog::new(criteria).unwrap()
    }

    fn two_question_catalog() -> Catalog {
        Catalog::new(vec![
            criterion("D1-P1-C1", 1, 1),
            criterion("D1-P1-C2", 1, 1),
        ])
        .unwrap()
    }

    struct Harness {
        gateway: Arc<MockGateway>,
        store: Arc<MockStore>,
        use_case: ConductAssessmentUseCase,
    }

    fn harness(gateway: MockGateway, catalog: Catalog) -> Harness {
        let gateway = Arc::new(gateway);
        let store = Arc::new(MockStore::default());
        let use_case = ConductAssessmentUseCase::new(
            gateway.clone(),
            store.clone(),
            Arc::new(catalog),
        );
        Harness {
            gateway,
            store,
            use_case,
        }
    }

    // ==================== First contact ====================

    #[tokio::test]
    async fn test_first_contact_creates_session_without_consuming_answer() {
        let h = harness(MockGateway::default(), small_catalog());

        let out = h
            .use_case
            .submit_answer("s-1", "alice", "bonjour")
            .await
            .unwrap();

        assert_eq!(out.ai_question, "Q: critère D1-P1-C1");
        assert_eq!(out.current_criterion_id, "D1-P1-C1");
        assert!(out.evaluation.is_none());
        assert_eq!(*h.gateway.evaluate_calls.lock().unwrap(), 0);
        assert_eq!(
            h.gateway.formulate_calls.lock().unwrap()[0],
            ("critère D1-P1-C1".to_string(), true)
        );

        let stored = h.store.get("s-1").unwrap();
        assert_eq!(stored.current_index, 0);
        assert!(stored.history.is_empty());
        assert_eq!(stored.status, SessionStatus::InProgress);
        assert_eq!(stored.owner_id, "alice");
    }

    #[tokio::test]
    async fn test_first_contact_falls_back_to_welcome_text() {
        let gateway = MockGateway::default().with_questions(vec![Err(
            GatewayError::ConnectionError("refused".to_string()),
        )]);
        let h = harness(gateway, small_catalog());

        let out = h.use_case.submit_answer("s-1", "alice", "").await.unwrap();

        assert_eq!(out.ai_question, WELCOME_FALLBACK);
        assert!(h.store.get("s-1").is_some());
    }

    #[tokio::test]
    async fn test_start_rejects_existing_session() {
        let h = harness(MockGateway::default(), small_catalog());
        h.use_case.start("s-1", "alice").await.unwrap();

        let err = h.use_case.start("s-1", "alice").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValidationError);
    }

    // ==================== Resume ====================

    #[tokio::test]
    async fn test_resume_unknown_session_is_not_found() {
        let h = harness(MockGateway::default(), small_catalog());
        let err = h.use_case.resume("missing", "alice").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_other_owner_is_forbidden() {
        let h = harness(MockGateway::default(), small_catalog());
        h.use_case.start("s-1", "alice").await.unwrap();

        let err = h.use_case.resume("s-1", "mallory").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);
        let err = h
            .use_case
            .submit_answer("s-1", "mallory", "oui")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);
    }

    #[tokio::test]
    async fn test_resume_is_idempotent() {
        let h = harness(MockGateway::default(), small_catalog());
        h.use_case.start("s-1", "alice").await.unwrap();

        let first = h.use_case.resume("s-1", "alice").await.unwrap();
        assert_eq!(first.history.len(), 1);
        assert_eq!(first.pending_question(), Some("Q: critère D1-P1-C1"));
        let calls = h.gateway.formulate_count();

        let second = h.use_case.resume("s-1", "alice").await.unwrap();
        assert_eq!(second.history, first.history);
        assert_eq!(second.current_index, first.current_index);
        assert_eq!(h.gateway.formulate_count(), calls);
    }

    #[tokio::test]
    async fn test_resume_backfills_missing_question() {
        let h = harness(MockGateway::default(), small_catalog());
        let mut session = Session::new("s-1", "alice");
        let mut entry = HistoryEntry::awaiting("D1-P1-C1".into(), "");
        entry.ai_question = None;
        session.history.push(entry);
        h.store.seed(session);

        let first = h.use_case.resume("s-1", "alice").await.unwrap();

        assert_eq!(h.gateway.formulate_count(), 1);
        assert_eq!(first.history.len(), 1);
        assert!(first.history[0].is_awaiting());
        assert_eq!(first.pending_question(), Some("Q: critère D1-P1-C1"));

        let second = h.use_case.resume("s-1", "alice").await.unwrap();
        assert_eq!(second.history, first.history);
        assert_eq!(second.current_index, first.current_index);
        assert_eq!(h.gateway.formulate_count(), 1);
    }

    #[tokio::test]
    async fn test_resume_after_transitional_entry_appends_pending_question() {
        let h = harness(MockGateway::default(), small_catalog());
        let mut session = Session::new("s-1", "alice");
        session.history.push(HistoryEntry::answered(
            "D1-P1-C1".into(),
            "Oui",
            Evaluation::new(2, "ok").unwrap(),
            "Bien.",
        ));
        session.current_index = 1;
        h.store.seed(session);

        let first = h.use_case.resume("s-1", "alice").await.unwrap();

        assert_eq!(h.gateway.formulate_count(), 1);
        assert_eq!(first.history.len(), 2);
        assert!(first.history[0].is_transitional());
        assert_eq!(first.history[1].criterion_id.as_str(), "D1-P2-C1");
        assert_eq!(first.pending_question(), Some("Q: critère D1-P2-C1"));
        assert_eq!(
            h.gateway.formulate_calls.lock().unwrap()[0],
            ("critère D1-P2-C1".to_string(), false)
        );

        let second = h.use_case.resume("s-1", "alice").await.unwrap();
        assert_eq!(second.history, first.history);
        assert_eq!(h.gateway.formulate_count(), 1);
        assert_eq!(h.store.get("s-1").unwrap().awaiting_count(), 1);
    }

    #[tokio::test]
    async fn test_resume_generation_failure_uses_criterion_fallback() {
        let gateway = MockGateway::default().with_questions(vec![
            Ok("Bienvenue".to_string()),
            Err(GatewayError::RateLimited("Too many requests".to_string())),
        ]);
        let h = harness(gateway, small_catalog());
        h.use_case.start("s-1", "alice").await.unwrap();

        let out = h.use_case.resume("s-1", "alice").await.unwrap();
        assert_eq!(
            out.pending_question(),
            Some("Pouvez-vous me parler de: critère D1-P1-C1?")
        );
        assert_eq!(h.store.get("s-1").unwrap().history.len(), 1);
    }

    // ==================== Answers ====================

    #[tokio::test]
    async fn test_answer_fills_awaiting_entry_and_advances() {
        let h = harness(MockGateway::default(), small_catalog());
        h.use_case.start("s-1", "alice").await.unwrap();
        h.use_case.resume("s-1", "alice").await.unwrap();

        let out = h
            .use_case
            .submit_answer("s-1", "alice", "  Oui, une feuille de route.  ")
            .await
            .unwrap();

        assert_eq!(out.score, Some(2));
        assert_eq!(out.current_criterion_id, "D1-P2-C1");
        assert_eq!(out.ai_question, "Bien. Q: critère D1-P2-C1");

        let stored = h.store.get("s-1").unwrap();
        assert_eq!(stored.current_index, 1);
        assert_eq!(stored.history.len(), 1);
        let entry = &stored.history[0];
        assert!(entry.is_answered());
        assert_eq!(entry.user_answer(), Some("Oui, une feuille de route."));
        assert_eq!(entry.ai_question.as_deref(), Some("Q: critère D1-P2-C1"));
    }

    #[tokio::test]
    async fn test_answer_without_resume_appends_entry() {
        let h = harness(MockGateway::default(), small_catalog());
        h.use_case.start("s-1", "alice").await.unwrap();

        h.use_case.submit_answer("s-1", "alice", "Oui").await.unwrap();

        let stored = h.store.get("s-1").unwrap();
        assert_eq!(stored.history.len(), 1);
        assert_eq!(stored.history[0].criterion_id.as_str(), "D1-P1-C1");
        assert!(stored.history[0].is_answered());
    }

    #[tokio::test]
    async fn test_index_is_monotonic_with_single_awaiting_entry() {
        let h = harness(MockGateway::default(), small_catalog());
        h.use_case.start("s-1", "alice").await.unwrap();

        let mut last_index = 0;
        for turn in 0..5 {
            h.use_case.resume("s-1", "alice").await.unwrap();
            let stored = h.store.get("s-1").unwrap();
            assert!(stored.awaiting_count() <= 1);

            h.use_case
                .submit_answer("s-1", "alice", &format!("réponse {}", turn))
                .await
                .unwrap();
            let stored = h.store.get("s-1").unwrap();
            assert!(stored.current_index > last_index);
            assert!(stored.awaiting_count() <= 1);
            last_index = stored.current_index;
        }
        assert_eq!(last_index, 5);
    }

    #[tokio::test]
    async fn test_evaluation_timeout_leaves_record_unchanged() {
        let gateway = MockGateway::default().with_evaluation_delay(Duration::from_millis(200));
        let h = harness(gateway, small_catalog());
        let use_case = h.use_case.clone().with_params(
            AssessmentParams::default().with_gateway_timeout(Duration::from_millis(20)),
        );
        use_case.start("s-1", "alice").await.unwrap();
        use_case.resume("s-1", "alice").await.unwrap();
        let before = h.store.get("s-1").unwrap();

        let err = use_case
            .submit_answer("s-1", "alice", "Oui")
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::UpstreamFailure);
        assert!(matches!(
            err,
            AssessmentError::UpstreamFailure(GatewayError::Timeout)
        ));
        assert_eq!(h.store.get("s-1").unwrap(), before);
    }

    #[tokio::test]
    async fn test_evaluation_failure_aborts_turn() {
        let gateway = MockGateway::default().with_evaluations(vec![Err(
            GatewayError::RequestFailed("500".to_string()),
        )]);
        let h = harness(gateway, small_catalog());
        h.use_case.start("s-1", "alice").await.unwrap();
        let before = h.store.get("s-1").unwrap();

        let err = h
            .use_case
            .submit_answer("s-1", "alice", "Oui")
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::UpstreamFailure);
        assert_eq!(h.store.get("s-1").unwrap(), before);
    }

    #[tokio::test]
    async fn test_rate_limited_evaluation_uses_neutral_score() {
        let gateway = MockGateway::default().with_evaluations(vec![Err(
            GatewayError::RateLimited("rate limit".to_string()),
        )]);
        let h = harness(gateway, small_catalog());
        h.use_case.start("s-1", "alice").await.unwrap();

        let out = h.use_case.submit_answer("s-1", "alice", "Oui").await.unwrap();

        assert_eq!(out.score, Some(1));
        assert!(out.ai_question.starts_with(NEUTRAL_REACTION));
        assert_eq!(h.store.get("s-1").unwrap().current_index, 1);
    }

    #[tokio::test]
    async fn test_next_question_failure_uses_fallback() {
        let gateway = MockGateway::default().with_questions(vec![
            Ok("Bienvenue".to_string()),
            Err(GatewayError::Timeout),
        ]);
        let h = harness(gateway, small_catalog());
        h.use_case.start("s-1", "alice").await.unwrap();

        let out = h.use_case.submit_answer("s-1", "alice", "Oui").await.unwrap();

        assert_eq!(
            out.ai_question,
            "Bien. Pouvez-vous me parler de: critère D1-P2-C1?"
        );
        assert_eq!(out.current_criterion_id, "D1-P2-C1");
    }

    #[tokio::test]
    async fn test_invalid_input_is_rejected() {
        let h = harness(MockGateway::default(), small_catalog());
        let use_case = h
            .use_case
            .clone()
            .with_params(AssessmentParams::default().with_max_answer_chars(5));
        use_case.start("s-1", "alice").await.unwrap();

        let err = use_case.submit_answer("", "alice", "Oui").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValidationError);
        let err = use_case
            .submit_answer("s-1", "alice", "   ")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValidationError);
        let err = use_case
            .submit_answer("s-1", "alice", "beaucoup trop long")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValidationError);
        assert_eq!(*h.gateway.evaluate_calls.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_malformed_session_id_is_rejected() {
        let h = harness(MockGateway::default(), small_catalog());

        for id in ["a/b", "my session", "../etc", ".hidden"] {
            let err = h.use_case.submit_answer(id, "alice", "Oui").await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::ValidationError, "id {:?}", id);
            let err = h.use_case.start(id, "alice").await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::ValidationError, "id {:?}", id);
            let err = h.use_case.resume(id, "alice").await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::ValidationError, "id {:?}", id);
        }
        assert!(h.store.sessions.lock().unwrap().is_empty());
        assert_eq!(h.gateway.formulate_count(), 0);
    }

    // ==================== Completion ====================

    #[tokio::test]
    async fn test_final_answer_finishes_session() {
        let h = harness(MockGateway::default(), two_question_catalog());
        h.use_case.start("s-1", "alice").await.unwrap();
        h.use_case.submit_answer("s-1", "alice", "Oui").await.unwrap();

        let out = h.use_case.submit_answer("s-1", "alice", "Non").await.unwrap();

        assert_eq!(out.current_criterion_id, FINISHED_CRITERION_ID);
        assert!(out.is_finished());
        assert!(out.ai_question.contains("Nous avons terminé le diagnostic"));

        let stored = h.store.get("s-1").unwrap();
        assert_eq!(stored.current_index, 2);
        assert_eq!(stored.status, SessionStatus::Finished);
        assert!(stored.history.iter().all(|e| !e.is_transitional()));

        let calls = h.gateway.formulate_count();
        let resumed = h.use_case.resume("s-1", "alice").await.unwrap();
        assert!(resumed.is_finished());
        assert_eq!(resumed.pending_question(), None);
        assert_eq!(h.gateway.formulate_count(), calls);

        let err = h
            .use_case
            .submit_answer("s-1", "alice", "encore")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValidationError);
    }

    #[tokio::test]
    async fn test_adaptive_skip_jumps_to_next_dimension() {
        let catalog = Catalog::new(vec![
            criterion("D1-P1-C1", 1, 1),
            criterion("D1-P1-C2", 1, 1),
            criterion("D1-P2-C1", 1, 2),
            criterion("D2-P1-C1", 2, 1),
        ])
        .unwrap();
        let gateway = MockGateway::default()
            .with_evaluations(vec![Ok(outcome(1, "Ok.")), Ok(outcome(0, "Ok."))]);
        let h = harness(gateway, catalog);
        let use_case = h
            .use_case
            .clone()
            .with_params(AssessmentParams::default().with_progression(ProgressionPolicy::adaptive_skip()));
        use_case.start("s-1", "alice").await.unwrap();
        use_case.submit_answer("s-1", "alice", "peu").await.unwrap();

        let out = use_case.submit_answer("s-1", "alice", "rien").await.unwrap();

        assert_eq!(out.current_criterion_id, "D2-P1-C1");
        assert!(out.ai_question.contains(SKIP_NOTICE));
        assert_eq!(h.store.get("s-1").unwrap().current_index, 3);
    }

    #[tokio::test]
    async fn test_concurrent_answers_are_serialized() {
        let h = harness(MockGateway::default(), small_catalog());
        h.use_case.start("s-1", "alice").await.unwrap();

        let a = h.use_case.clone();
        let b = h.use_case.clone();
        let (ra, rb) = tokio::join!(
            a.submit_answer("s-1", "alice", "un"),
            b.submit_answer("s-1", "alice", "deux")
        );
        ra.unwrap();
        rb.unwrap();

        let stored = h.store.get("s-1").unwrap();
        assert_eq!(stored.current_index, 2);
        assert_eq!(stored.history.len(), 2);
    }

    #[tokio::test]
    async fn test_latest_session_id() {
        let h = harness(MockGateway::default(), small_catalog());
        assert_eq!(h.use_case.latest_session_id("alice").await.unwrap(), None);
        h.use_case.start("s-1", "alice").await.unwrap();
        assert_eq!(
            h.use_case.latest_session_id("alice").await.unwrap(),
            Some("s-1".to_string())
        );
    }
}
