//! PRAGMA configuration applied to every result-store connection.
//!
//! WAL mode, NORMAL sync, foreign_keys ON, 5s busy_timeout.

use causeway_core::errors::StorageError;
use rusqlite::Connection;

/// Apply performance and integrity pragmas to a connection.
pub fn apply_pragmas(conn: &Connection) -> Result<(), StorageError> {
    conn.execute_batch(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA foreign_keys = ON;
        PRAGMA busy_timeout = 5000;
        PRAGMA temp_store = MEMORY;
        ",
    )
    .map_err(|e| StorageError::SqliteError {
        message: format!("failed to apply pragmas: {e}"),
    })
}

/// Whether foreign-key enforcement is on. Deleting a run relies on it.
pub fn foreign_keys_enabled(conn: &Connection) -> Result<bool, StorageError> {
    let on: i64 = conn
        .pragma_query_value(None, "foreign_keys", |row| row.get(0))
        .map_err(|e| StorageError::SqliteError {
            message: e.to_string(),
        })?;
    Ok(on == 1)
}
