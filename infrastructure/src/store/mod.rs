//! Session store adapters.
//!
//! Both implement [`SessionRepository`](assess_domain::SessionRepository)
//! and refuse stale revisions with
//! [`StoreError::Conflict`](assess_domain::StoreError::Conflict).

mod file;
mod memory;

pub use file::JsonFileSessionStore;
pub use memory::InMemorySessionStore;
