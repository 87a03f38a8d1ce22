//! Result persistence configuration.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_DATABASE_PATH;

/// Configuration for persisting run results.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct OutputConfig {
    /// Persist each run to the result database. Default: false.
    pub persist: Option<bool>,
    /// SQLite database path. Default: "causeway.db".
    pub database_path: Option<String>,
}

impl OutputConfig {
    pub fn effective_persist(&self) -> bool {
        self.persist.unwrap_or(false)
    }

    pub fn effective_database_path(&self) -> &str {
        self.database_path.as_deref().unwrap_or(DEFAULT_DATABASE_PATH)
    }
}
