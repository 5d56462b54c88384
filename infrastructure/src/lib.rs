//! Infrastructure layer for digi-assess
//!
//! This crate contains adapters that implement the ports defined
//! in the application and domain layers, including configuration file loading.

pub mod catalog;
pub mod config;
pub mod gateway;
pub mod logging;
pub mod store;

// Re-export commonly used types
pub use catalog::{CatalogLoadError, CatalogLoader};
pub use config::{ConfigLoader, FileConfig, StoreBackend};
pub use gateway::HttpAssessmentGateway;
pub use logging::JsonlConversationLogger;
pub use store::{InMemorySessionStore, JsonFileSessionStore};
