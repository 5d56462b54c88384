//! JSON-file-per-session store.
//!
//! Each session lives in `<dir>/<session_id>.json`. Writes go to a
//! per-process temporary sibling first and are renamed into place, so a
//! crash never leaves a half-written record.
//!
//! An upsert holds `<session_id>.json.lock`, created exclusively, across
//! the revision check and the rename. This serializes writers in separate
//! processes sharing the directory. A lock file older than
//! [`STALE_LOCK_AGE`] is assumed to be left over from a crash and removed.

use assess_domain::{Session, SessionRepository, StoreError, check_revision, is_valid_session_id};
use async_trait::async_trait;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Default time an upsert waits for another writer's lock file.
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(5);

/// Lock files older than this are treated as abandoned.
pub const STALE_LOCK_AGE: Duration = Duration::from_secs(30);

const LOCK_RETRY: Duration = Duration::from_millis(20);

pub struct JsonFileSessionStore {
    dir: PathBuf,
    /// Serializes read-check-write within this process.
    write_lock: Mutex<()>,
    lock_timeout: Duration,
}

impl JsonFileSessionStore {
    /// Use `dir` for session files, creating it if needed.
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir).await?;
        Ok(Self {
            dir,
            write_lock: Mutex::new(()),
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
        })
    }

    pub fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = timeout;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, session_id: &str) -> Result<PathBuf, StoreError> {
        if !is_valid_session_id(session_id) {
            return Err(StoreError::Io(io::Error::new(
                ErrorKind::InvalidInput,
                format!("session id '{}' is not a valid file name", session_id),
            )));
        }
        Ok(self.dir.join(format!("{}.json", session_id)))
    }

    async fn read(&self, session_id: &str, path: &Path) -> Result<Option<Session>, StoreError> {
        let bytes = match tokio::fs::read(path).await {
            Ok(b) => b,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| StoreError::Corrupt {
                session_id: session_id.to_string(),
                message: e.to_string(),
            })
    }
}

#[async_trait]
impl SessionRepository for JsonFileSessionStore {
    async fn find(&self, session_id: &str) -> Result<Option<Session>, StoreError> {
        let path = self.path_for(session_id)?;
        self.read(session_id, &path).await
    }

    async fn upsert(&self, session: &Session) -> Result<(), StoreError> {
        let path = self.path_for(&session.session_id)?;
        let _guard = self.write_lock.lock().await;
        let _lock = LockFile::acquire(path.with_extension("json.lock"), self.lock_timeout).await?;

        let stored = self.read(&session.session_id, &path).await?;
        check_revision(stored.as_ref(), session)?;

        let json = serde_json::to_vec_pretty(session).map_err(|e| StoreError::Corrupt {
            session_id: session.session_id.clone(),
            message: e.to_string(),
        })?;
        let tmp = path.with_extension(format!("json.{}.tmp", std::process::id()));
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &path).await?;

        debug!(
            session_id = %session.session_id,
            revision = session.revision,
            "Session written"
        );
        Ok(())
    }

    async fn find_latest_in_progress(&self, owner_id: &str) -> Result<Option<Session>, StoreError> {
        let mut entries = tokio::fs::read_dir(&self.dir).await?;
        let mut latest: Option<Session> = None;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let bytes = tokio::fs::read(&path).await?;
            let session: Session = match serde_json::from_slice(&bytes) {
                Ok(s) => s,
                Err(e) => {
                    warn!("Skipping unreadable session file {}: {}", path.display(), e);
                    continue;
                }
            };
            if !session.is_owned_by(owner_id) || session.is_finished() {
                continue;
            }
            if latest
                .as_ref()
                .is_none_or(|l| session.updated_at > l.updated_at)
            {
                latest = Some(session);
            }
        }
        Ok(latest)
    }
}

/// Exclusive lock file, removed on drop.
struct LockFile {
    path: PathBuf,
}

impl LockFile {
    async fn acquire(path: PathBuf, timeout: Duration) -> Result<Self, StoreError> {
        let deadline = Instant::now() + timeout;
        loop {
            let created = tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await;
            match created {
                Ok(_) => return Ok(Self { path }),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    if lock_age(&path).await.is_some_and(|age| age > STALE_LOCK_AGE) {
                        warn!(path = %path.display(), "Removing stale session lock");
                        let _ = tokio::fs::remove_file(&path).await;
                        continue;
                    }
                    if Instant::now() >= deadline {
                        return Err(StoreError::Unavailable(format!(
                            "timed out waiting for {}",
                            path.display()
                        )));
                    }
                    tokio::time::sleep(LOCK_RETRY).await;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}

impl Drop for LockFile {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

async fn lock_age(path: &Path) -> Option<Duration> {
    let modified = tokio::fs::metadata(path).await.ok()?.modified().ok()?;
    modified.elapsed().ok()
}
