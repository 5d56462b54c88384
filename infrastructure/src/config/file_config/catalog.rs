//! Catalog configuration from TOML (`[catalog]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw catalog configuration from TOML
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCatalogConfig {
    /// JSON grid to load instead of the embedded one
    pub path: Option<PathBuf>,
}
