//! The result store: one write-serialized SQLite connection.

pub mod pragmas;

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use causeway_analysis::granger::CausalityVerdict;
use causeway_analysis::graph::{GraphEdge, GraphSnapshot};
use causeway_analysis::stationarity::StationarityReport;
use causeway_analysis::PipelineReport;
use causeway_core::errors::StorageError;
use rusqlite::Connection;

use self::pragmas::{apply_pragmas, foreign_keys_enabled};
use crate::migrations;
use crate::queries::models::{self, VarSummary};
use crate::queries::runs::{self, RunRow};
use crate::queries::{edges, sqlite_error, stationarity, verdicts};

/// SQLite store of pipeline runs.
pub struct ResultStore {
    conn: Mutex<Connection>,
    path: Option<PathBuf>,
}

impl ResultStore {
    /// Open a database at the given path, apply pragmas, run migrations.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        let conn = Connection::open(path).map_err(sqlite_error)?;
        Self::init(conn, Some(path.to_path_buf()))
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory().map_err(sqlite_error)?;
        Self::init(conn, None)
    }

    fn init(conn: Connection, path: Option<PathBuf>) -> Result<Self, StorageError> {
        apply_pragmas(&conn)?;
        if !foreign_keys_enabled(&conn)? {
            tracing::warn!("foreign keys disabled; deleted runs will leave orphan rows");
        }
        migrations::run_migrations(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            path,
        })
    }

    /// Run `f` with exclusive access to the connection.
    pub fn with_conn<F, T>(&self, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(&Connection) -> Result<T, StorageError>,
    {
        let guard = self.conn.lock().map_err(|_| StorageError::SqliteError {
            message: "connection lock poisoned".to_string(),
        })?;
        f(&guard)
    }

    /// Database file path (None for in-memory).
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn schema_version(&self) -> Result<u32, StorageError> {
        self.with_conn(migrations::current_version)
    }

    /// Persist a whole report in one transaction. Returns the run id.
    pub fn save_report(&self, report: &PipelineReport) -> Result<i64, StorageError> {
        let created_at = chrono::Utc::now().timestamp();
        let snapshot = report.snapshot();
        self.with_conn(|conn| {
            let tx = conn.unchecked_transaction().map_err(sqlite_error)?;
            let run_id = runs::insert_run(
                &tx,
                created_at,
                &report.variables,
                report.observations,
                report.irregular_index,
                report.stationarity.trimmed_rows,
                report.granger_max_lag,
                report.significance_level,
                report.var_model.as_ref().map(|m| m.lag_order),
                report.var_model.as_ref().map(|m| m.criterion.name()),
            )?;
            stationarity::insert_stationarity(&tx, run_id, &report.stationarity.variables)?;
            verdicts::insert_verdicts(&tx, run_id, &report.verdicts)?;
            edges::insert_edges(&tx, run_id, &snapshot.edges)?;
            if let Some(model) = &report.var_model {
                models::insert_var_model(
                    &tx,
                    run_id,
                    model,
                    &report.impulse_responses,
                    report.forecast.as_ref(),
                )?;
            }
            tx.commit().map_err(sqlite_error)?;

            tracing::info!(
                run_id,
                verdicts = report.verdicts.len(),
                edges = snapshot.edges.len(),
                "run persisted"
            );
            Ok(run_id)
        })
    }

    pub fn get_run(&self, run_id: i64) -> Result<RunRow, StorageError> {
        self.with_conn(|conn| runs::get_run(conn, run_id))
    }

    /// All stored runs, newest first.
    pub fn list_runs(&self) -> Result<Vec<RunRow>, StorageError> {
        self.with_conn(runs::list_runs)
    }

    pub fn delete_run(&self, run_id: i64) -> Result<(), StorageError> {
        self.with_conn(|conn| runs::delete_run(conn, run_id))
    }

    pub fn load_verdicts(&self, run_id: i64) -> Result<Vec<CausalityVerdict>, StorageError> {
        self.with_conn(|conn| {
            runs::ensure_run(conn, run_id)?;
            verdicts::load_verdicts(conn, run_id)
        })
    }

    /// `(cause, effect, p_value)` of the significant verdicts, smallest p first.
    pub fn load_significant(
        &self,
        run_id: i64,
    ) -> Result<Vec<(String, String, f64)>, StorageError> {
        self.with_conn(|conn| {
            runs::ensure_run(conn, run_id)?;
            verdicts::load_significant(conn, run_id)
        })
    }

    pub fn load_edges(&self, run_id: i64) -> Result<Vec<GraphEdge>, StorageError> {
        self.with_conn(|conn| {
            runs::ensure_run(conn, run_id)?;
            edges::load_edges(conn, run_id)
        })
    }

    pub fn load_snapshot(&self, run_id: i64) -> Result<GraphSnapshot, StorageError> {
        self.with_conn(|conn| {
            let run = runs::get_run(conn, run_id)?;
            edges::load_snapshot(conn, run_id, &run.variables)
        })
    }

    /// `None` when the run had too few variables for a VAR.
    pub fn load_var_summary(&self, run_id: i64) -> Result<Option<VarSummary>, StorageError> {
        self.with_conn(|conn| {
            runs::ensure_run(conn, run_id)?;
            models::load_var_summary(conn, run_id)
        })
    }

    pub fn load_stationarity(&self, run_id: i64) -> Result<StationarityReport, StorageError> {
        self.with_conn(|conn| {
            let run = runs::get_run(conn, run_id)?;
            Ok(StationarityReport {
                variables: stationarity::load_stationarity(conn, run_id)?,
                trimmed_rows: run.trimmed_rows,
            })
        })
    }
}
