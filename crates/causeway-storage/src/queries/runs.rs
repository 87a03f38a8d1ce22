//! Queries for the runs table: one row per persisted pipeline run.

use causeway_core::errors::StorageError;
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{serialization_error, sqlite_error, to_usize};

/// Run-level metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct RunRow {
    pub id: i64,
    /// Unix seconds.
    pub created_at: i64,
    pub variables: Vec<String>,
    pub observations: usize,
    pub irregular_index: bool,
    pub trimmed_rows: usize,
    pub granger_max_lag: usize,
    pub significance_level: f64,
    pub var_lag_order: Option<usize>,
    pub criterion: Option<String>,
}

/// Insert a run row. Returns the new run id.
#[allow(clippy::too_many_arguments)]
pub fn insert_run(
    conn: &Connection,
    created_at: i64,
    variables: &[String],
    observations: usize,
    irregular_index: bool,
    trimmed_rows: usize,
    granger_max_lag: usize,
    significance_level: f64,
    var_lag_order: Option<usize>,
    criterion: Option<&str>,
) -> Result<i64, StorageError> {
    let variables_json = serde_json::to_string(variables).map_err(serialization_error)?;
    conn.execute(
        "INSERT INTO runs (created_at, variables_json, observations, irregular_index,
                           trimmed_rows, granger_max_lag, significance_level,
                           var_lag_order, criterion)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            created_at,
            variables_json,
            observations as i64,
            irregular_index,
            trimmed_rows as i64,
            granger_max_lag as i64,
            significance_level,
            var_lag_order.map(|p| p as i64),
            criterion,
        ],
    )
    .map_err(sqlite_error)?;
    Ok(conn.last_insert_rowid())
}

const SELECT_RUN: &str = "SELECT id, created_at, variables_json, observations, irregular_index,
                                 trimmed_rows, granger_max_lag, significance_level,
                                 var_lag_order, criterion
                          FROM runs";

struct RawRun {
    id: i64,
    created_at: i64,
    variables_json: String,
    observations: i64,
    irregular_index: bool,
    trimmed_rows: i64,
    granger_max_lag: i64,
    significance_level: f64,
    var_lag_order: Option<i64>,
    criterion: Option<String>,
}

fn raw_run(row: &Row<'_>) -> rusqlite::Result<RawRun> {
    Ok(RawRun {
        id: row.get(0)?,
        created_at: row.get(1)?,
        variables_json: row.get(2)?,
        observations: row.get(3)?,
        irregular_index: row.get(4)?,
        trimmed_rows: row.get(5)?,
        granger_max_lag: row.get(6)?,
        significance_level: row.get(7)?,
        var_lag_order: row.get(8)?,
        criterion: row.get(9)?,
    })
}

impl RawRun {
    fn decode(self) -> Result<RunRow, StorageError> {
        Ok(RunRow {
            id: self.id,
            created_at: self.created_at,
            variables: serde_json::from_str(&self.variables_json).map_err(serialization_error)?,
            observations: to_usize(self.observations),
            irregular_index: self.irregular_index,
            trimmed_rows: to_usize(self.trimmed_rows),
            granger_max_lag: to_usize(self.granger_max_lag),
            significance_level: self.significance_level,
            var_lag_order: self.var_lag_order.map(to_usize),
            criterion: self.criterion,
        })
    }
}

/// Load one run, or `RunNotFound`.
pub fn get_run(conn: &Connection, run_id: i64) -> Result<RunRow, StorageError> {
    let raw = conn
        .query_row(&format!("{SELECT_RUN} WHERE id = ?1"), params![run_id], raw_run)
        .optional()
        .map_err(sqlite_error)?
        .ok_or(StorageError::RunNotFound { run_id })?;
    raw.decode()
}

/// Fail with `RunNotFound` unless the run exists.
pub fn ensure_run(conn: &Connection, run_id: i64) -> Result<(), StorageError> {
    let exists: bool = conn
        .query_row(
            "SELECT EXISTS(SELECT 1 FROM runs WHERE id = ?1)",
            params![run_id],
            |row| row.get(0),
        )
        .map_err(sqlite_error)?;
    if exists {
        Ok(())
    } else {
        Err(StorageError::RunNotFound { run_id })
    }
}

/// All runs, newest first.
pub fn list_runs(conn: &Connection) -> Result<Vec<RunRow>, StorageError> {
    let mut stmt = conn
        .prepare_cached(&format!("{SELECT_RUN} ORDER BY id DESC"))
        .map_err(sqlite_error)?;
    let rows = stmt
        .query_map([], raw_run)
        .map_err(sqlite_error)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(sqlite_error)?;
    rows.into_iter().map(RawRun::decode).collect()
}

/// Delete a run and, through foreign keys, everything attached to it.
pub fn delete_run(conn: &Connection, run_id: i64) -> Result<(), StorageError> {
    let deleted = conn
        .execute("DELETE FROM runs WHERE id = ?1", params![run_id])
        .map_err(sqlite_error)?;
    if deleted == 0 {
        return Err(StorageError::RunNotFound { run_id });
    }
    Ok(())
}

/// Number of stored runs.
pub fn count_runs(conn: &Connection) -> Result<usize, StorageError> {
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM runs", [], |row| row.get(0))
        .map_err(sqlite_error)?;
    Ok(to_usize(count))
}
