//! Query functions, one module per table group. All take a `&Connection`.

pub mod edges;
pub mod models;
pub mod runs;
pub mod stationarity;
pub mod verdicts;

use causeway_core::errors::StorageError;

pub(crate) fn sqlite_error(e: rusqlite::Error) -> StorageError {
    StorageError::SqliteError {
        message: e.to_string(),
    }
}

pub(crate) fn serialization_error(e: serde_json::Error) -> StorageError {
    StorageError::Serialization {
        message: e.to_string(),
    }
}

/// Decode a stored count. Negative values never come from this crate.
pub(crate) fn to_usize(value: i64) -> usize {
    usize::try_from(value).unwrap_or(0)
}
