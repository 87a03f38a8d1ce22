//! Queries for verdicts and their per-lag F-test profiles.

use std::collections::HashMap;

use causeway_analysis::granger::{CausalityVerdict, LagPValue};
use causeway_core::errors::{StorageError, VerdictError};
use rusqlite::{params, Connection};

use super::{sqlite_error, to_usize};

/// Insert every verdict of a run, keeping their order.
pub fn insert_verdicts(
    conn: &Connection,
    run_id: i64,
    verdicts: &[CausalityVerdict],
) -> Result<(), StorageError> {
    let mut insert_verdict = conn
        .prepare_cached(
            "INSERT INTO verdicts (run_id, position, cause, effect, lag, statistic, p_value,
                                   significant, error, df_numerator, df_denominator)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        )
        .map_err(sqlite_error)?;
    let mut insert_lag = conn
        .prepare_cached(
            "INSERT INTO verdict_lags (run_id, cause, effect, lag, statistic, p_value)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .map_err(sqlite_error)?;

    for (position, v) in verdicts.iter().enumerate() {
        insert_verdict
            .execute(params![
                run_id,
                position as i64,
                v.cause,
                v.effect,
                v.lag as i64,
                v.statistic,
                v.p_value,
                v.significant,
                v.error.map(|e| e.as_str()),
                v.df_numerator as i64,
                v.df_denominator as i64,
            ])
            .map_err(sqlite_error)?;
        for l in &v.lag_profile {
            insert_lag
                .execute(params![run_id, v.cause, v.effect, l.lag as i64, l.statistic, l.p_value])
                .map_err(sqlite_error)?;
        }
    }
    Ok(())
}

/// Verdicts of a run in screening order, lag profiles attached.
pub fn load_verdicts(conn: &Connection, run_id: i64) -> Result<Vec<CausalityVerdict>, StorageError> {
    let mut profiles = load_lag_profiles(conn, run_id)?;

    let mut stmt = conn
        .prepare_cached(
            "SELECT cause, effect, lag, statistic, p_value, significant, error,
                    df_numerator, df_denominator
             FROM verdicts WHERE run_id = ?1 ORDER BY position",
        )
        .map_err(sqlite_error)?;
    let rows = stmt
        .query_map(params![run_id], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, i64>(2)?,
                row.get::<_, f64>(3)?,
                row.get::<_, f64>(4)?,
                row.get::<_, bool>(5)?,
                row.get::<_, Option<String>>(6)?,
                row.get::<_, i64>(7)?,
                row.get::<_, i64>(8)?,
            ))
        })
        .map_err(sqlite_error)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(sqlite_error)?;

    rows.into_iter()
        .map(
            |(cause, effect, lag, statistic, p_value, significant, error, df_num, df_den)| {
                let error = match error {
                    Some(code) => Some(VerdictError::parse(&code).ok_or_else(|| {
                        StorageError::Serialization {
                            message: format!("unknown verdict error '{code}'"),
                        }
                    })?),
                    None => None,
                };
                let lag_profile = profiles
                    .remove(&(cause.clone(), effect.clone()))
                    .unwrap_or_default();
                Ok(CausalityVerdict {
                    cause,
                    effect,
                    lag: to_usize(lag),
                    statistic,
                    p_value,
                    significant,
                    error,
                    df_numerator: to_usize(df_num),
                    df_denominator: to_usize(df_den),
                    lag_profile,
                })
            },
        )
        .collect()
}

fn load_lag_profiles(
    conn: &Connection,
    run_id: i64,
) -> Result<HashMap<(String, String), Vec<LagPValue>>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT cause, effect, lag, statistic, p_value
             FROM verdict_lags WHERE run_id = ?1 ORDER BY cause, effect, lag",
        )
        .map_err(sqlite_error)?;
    let mut rows = stmt.query(params![run_id]).map_err(sqlite_error)?;

    let mut profiles: HashMap<(String, String), Vec<LagPValue>> = HashMap::new();
    while let Some(row) = rows.next().map_err(sqlite_error)? {
        let cause: String = row.get(0).map_err(sqlite_error)?;
        let effect: String = row.get(1).map_err(sqlite_error)?;
        let lag: i64 = row.get(2).map_err(sqlite_error)?;
        profiles.entry((cause, effect)).or_default().push(LagPValue {
            lag: to_usize(lag),
            statistic: row.get(3).map_err(sqlite_error)?,
            p_value: row.get(4).map_err(sqlite_error)?,
        });
    }
    Ok(profiles)
}

/// Significant verdicts of a run, strongest first.
pub fn load_significant(
    conn: &Connection,
    run_id: i64,
) -> Result<Vec<(String, String, f64)>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT cause, effect, p_value FROM verdicts
             WHERE run_id = ?1 AND significant = 1
             ORDER BY p_value, cause, effect",
        )
        .map_err(sqlite_error)?;
    let rows = stmt
        .query_map(params![run_id], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))
        .map_err(sqlite_error)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(sqlite_error)?;
    Ok(rows)
}
