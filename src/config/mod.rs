//! Configuration
//!
//! Layered with the `config` crate: built-in defaults, then the global
//! `$XDG_CONFIG_HOME/organisa/config.toml` (or an explicit `--config` file),
//! then `ORGANISA__SECTION__KEY` environment variables.

pub mod facade;
pub mod storage;

pub mod merge {
    pub mod service;
}

pub mod paths {
    pub mod xdg_root;
}

pub mod sources {
    pub mod environment;
    pub mod global_file;
}

pub use facade::ConfigLoader;
pub use paths::xdg_root as xdg;
pub use storage::StorageConfig;

use crate::generation::GenerationConfig;
use crate::item::validation::DEFAULT_MAX_FILE_BYTES;
use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};

/// Caller-side limits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitsConfig {
    /// Largest uploadable file, in raw bytes
    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: u64,
}

fn default_max_file_bytes() -> u64 {
    DEFAULT_MAX_FILE_BYTES
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_file_bytes: default_max_file_bytes(),
        }
    }
}

/// Item repository behaviour
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryConfig {
    /// Reject items whose parent is missing or not a folder
    #[serde(default)]
    pub strict_parents: bool,
}

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrganisaConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
    #[serde(default)]
    pub repository: RepositoryConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}
