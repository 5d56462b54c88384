//! Session store configuration from TOML (`[store]` section)

use assess_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

/// Which session store adapter to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreBackend {
    /// One JSON document per session on disk.
    #[default]
    File,
    /// Process-local map; sessions vanish on exit.
    Memory,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "file" | "json" => Ok(StoreBackend::File),
            "memory" | "mem" => Ok(StoreBackend::Memory),
            other => Err(format!("unknown store backend: {}", other)),
        }
    }
}

/// Raw store configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileStoreConfig {
    /// "file" or "memory"
    pub backend: String,
    /// Directory for session files (default: data dir `digi-assess/sessions`)
    pub path: Option<PathBuf>,
}

impl Default for FileStoreConfig {
    fn default() -> Self {
        Self {
            backend: "file".to_string(),
            path: None,
        }
    }
}

impl FileStoreConfig {
    /// Parse `backend`, falling back to [`StoreBackend::File`].
    pub fn parse_backend(&self) -> (StoreBackend, Vec<ConfigIssue>) {
        match self.backend.parse::<StoreBackend>() {
            Ok(backend) => (backend, vec![]),
            Err(_) => {
                let issue = ConfigIssue::warning(
                    ConfigIssueCode::InvalidEnumValue {
                        field: "store.backend".to_string(),
                        value: self.backend.clone(),
                        valid_values: vec!["file".to_string(), "memory".to_string()],
                    },
                    format!(
                        "store.backend: unknown value '{}', falling back to 'file'",
                        self.backend
                    ),
                );
                (StoreBackend::default(), vec![issue])
            }
        }
    }

    /// Directory for session files.
    pub fn resolved_path(&self) -> PathBuf {
        self.path.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("digi-assess")
                .join("sessions")
        })
    }
}
