//! Configuration file loading for digi-assess
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. Environment variables (`DIGI_ASSESS_` prefix, `__` between section and key)
//! 2. `--config <path>` specified file
//! 3. Project root: `./assess.toml` or `./.assess.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/digi-assess/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    DEFAULT_BASE_URL, DEFAULT_MAX_ANSWER_CHARS, DEFAULT_TIMEOUT_SECS, FileAssessmentConfig,
    FileCatalogConfig, FileConfig, FileGatewayConfig, FileLoggingConfig, FileOutputConfig,
    FileStoreConfig, StoreBackend,
};
pub use loader::ConfigLoader;
