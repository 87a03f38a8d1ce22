//! Queries for per-variable stationarity records.

use causeway_analysis::stationarity::{StationarityStatus, VariableStationarity};
use causeway_core::errors::StorageError;
use rusqlite::{params, Connection};

use super::{sqlite_error, to_usize};

pub fn insert_stationarity(
    conn: &Connection,
    run_id: i64,
    records: &[VariableStationarity],
) -> Result<(), StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "INSERT INTO stationarity (run_id, position, variable, differencing_count,
                                       adf_statistic, p_value, used_lag, status)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )
        .map_err(sqlite_error)?;
    for (position, r) in records.iter().enumerate() {
        stmt.execute(params![
            run_id,
            position as i64,
            r.variable,
            r.differencing_count as i64,
            r.adf_statistic,
            r.p_value,
            r.used_lag.map(|l| l as i64),
            r.status.name(),
        ])
        .map_err(sqlite_error)?;
    }
    Ok(())
}

/// Records of a run in panel order.
pub fn load_stationarity(
    conn: &Connection,
    run_id: i64,
) -> Result<Vec<VariableStationarity>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT variable, differencing_count, adf_statistic, p_value, used_lag, status
             FROM stationarity WHERE run_id = ?1 ORDER BY position",
        )
        .map_err(sqlite_error)?;
    let rows = stmt
        .query_map(params![run_id], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, Option<f64>>(2)?,
                row.get::<_, Option<f64>>(3)?,
                row.get::<_, Option<i64>>(4)?,
                row.get::<_, String>(5)?,
            ))
        })
        .map_err(sqlite_error)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(sqlite_error)?;

    rows.into_iter()
        .map(|(variable, differencing, adf_statistic, p_value, used_lag, status)| {
            let status = StationarityStatus::parse(&status).ok_or_else(|| {
                StorageError::Serialization {
                    message: format!("unknown stationarity status '{status}'"),
                }
            })?;
            Ok(VariableStationarity {
                variable,
                differencing_count: to_usize(differencing),
                adf_statistic,
                p_value,
                used_lag: used_lag.map(to_usize),
                status,
            })
        })
        .collect()
}
