//! Storage-layer errors for SQLite operations.

use super::error_code::{self, CausewayErrorCode};

/// Errors from the result store.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("SQLite error: {message}")]
    SqliteError { message: String },

    #[error("migration failed at version {version}: {message}")]
    MigrationFailed { version: u32, message: String },

    #[error("run {run_id} not found")]
    RunNotFound { run_id: i64 },

    #[error("serialization error: {message}")]
    Serialization { message: String },
}

impl CausewayErrorCode for StorageError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::MigrationFailed { .. } => error_code::MIGRATION_FAILED,
            Self::RunNotFound { .. } => error_code::RUN_NOT_FOUND,
            _ => error_code::STORAGE_ERROR,
        }
    }
}
