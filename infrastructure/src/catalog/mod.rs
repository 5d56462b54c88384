//! Diagnostic grid loading.

mod loader;

pub use loader::{CatalogLoadError, CatalogLoader};
