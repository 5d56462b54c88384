//! Session repository trait

use super::entities::Session;
use async_trait::async_trait;
use thiserror::Error;

/// Errors raised by session stores.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Stale write for session {session_id}: stored revision {stored}, incoming {incoming}")]
    Conflict {
        session_id: String,
        stored: u64,
        incoming: u64,
    },

    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt session record {session_id}: {message}")]
    Corrupt { session_id: String, message: String },

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Keyed record store for assessment sessions
///
/// This is a domain-level abstraction; implementations live in the
/// infrastructure layer. `upsert` must refuse a session whose revision does
/// not directly follow the stored one (see [`check_revision`]).
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Fetch a session by id.
    async fn find(&self, session_id: &str) -> Result<Option<Session>, StoreError>;

    /// Insert or replace a session.
    async fn upsert(&self, session: &Session) -> Result<(), StoreError>;

    /// Most recently updated in-progress session of an owner.
    async fn find_latest_in_progress(&self, owner_id: &str) -> Result<Option<Session>, StoreError>;
}

/// Optimistic concurrency rule shared by all stores.
pub fn check_revision(stored: Option<&Session>, incoming: &Session) -> Result<(), StoreError> {
    match stored {
        Some(existing) if existing.revision + 1 != incoming.revision => Err(StoreError::Conflict {
            session_id: incoming.session_id.clone(),
            stored: existing.revision,
            incoming: incoming.revision,
        }),
        _ => Ok(()),
    }
}
