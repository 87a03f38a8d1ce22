//! Panel input configuration.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_DATE_COLUMN;

/// Where the merged panel comes from.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct InputConfig {
    /// Path to the merged CSV, relative to the project root.
    pub path: Option<String>,
    /// Name of the timestamp column. Default: "date".
    pub date_column: Option<String>,
}

impl InputConfig {
    pub fn effective_date_column(&self) -> &str {
        self.date_column.as_deref().unwrap_or(DEFAULT_DATE_COLUMN)
    }
}
