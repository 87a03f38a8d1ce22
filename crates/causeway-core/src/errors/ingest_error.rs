//! Panel ingest errors.

use super::error_code::{self, CausewayErrorCode};
use super::DataQualityError;

/// Errors that can occur while loading a panel from disk.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("cannot open '{path}': {message}")]
    Open { path: String, message: String },

    #[error("CSV error in '{path}': {message}")]
    Csv { path: String, message: String },

    #[error("column '{column}' not found in '{path}'")]
    MissingColumn { path: String, column: String },

    #[error("no usable rows in '{path}'")]
    NoRows { path: String },

    #[error("duplicate timestamp {timestamp} in '{path}'")]
    DuplicateTimestamp { path: String, timestamp: String },

    #[error(transparent)]
    DataQuality(#[from] DataQualityError),
}

impl CausewayErrorCode for IngestError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::DataQuality(e) => e.error_code(),
            _ => error_code::INGEST_ERROR,
        }
    }
}
