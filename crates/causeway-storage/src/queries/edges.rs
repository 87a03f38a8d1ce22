//! Queries for causal graph edges.

use causeway_analysis::graph::{GraphEdge, GraphSnapshot};
use causeway_core::errors::StorageError;
use rusqlite::{params, Connection, Row};

use super::{sqlite_error, to_usize};

/// Insert the edges of a graph snapshot in snapshot order.
pub fn insert_edges(conn: &Connection, run_id: i64, edges: &[GraphEdge]) -> Result<(), StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "INSERT INTO edges (run_id, position, cause, effect, weight, lag, p_value, statistic)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )
        .map_err(sqlite_error)?;
    for (position, e) in edges.iter().enumerate() {
        stmt.execute(params![
            run_id,
            position as i64,
            e.cause,
            e.effect,
            e.weight,
            e.lag as i64,
            e.p_value,
            e.statistic,
        ])
        .map_err(sqlite_error)?;
    }
    Ok(())
}

fn edge_row(row: &Row<'_>) -> rusqlite::Result<GraphEdge> {
    Ok(GraphEdge {
        cause: row.get(0)?,
        effect: row.get(1)?,
        weight: row.get(2)?,
        lag: to_usize(row.get(3)?),
        p_value: row.get(4)?,
        statistic: row.get(5)?,
    })
}

/// Edges of a run in the order the graph produced them.
pub fn load_edges(conn: &Connection, run_id: i64) -> Result<Vec<GraphEdge>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT cause, effect, weight, lag, p_value, statistic
             FROM edges WHERE run_id = ?1 ORDER BY position",
        )
        .map_err(sqlite_error)?;
    let rows = stmt
        .query_map(params![run_id], edge_row)
        .map_err(sqlite_error)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(sqlite_error)?;
    Ok(rows)
}

/// Edges pointing into `effect`, strongest first.
pub fn load_edges_into(
    conn: &Connection,
    run_id: i64,
    effect: &str,
) -> Result<Vec<GraphEdge>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT cause, effect, weight, lag, p_value, statistic
             FROM edges WHERE run_id = ?1 AND effect = ?2
             ORDER BY p_value, cause",
        )
        .map_err(sqlite_error)?;
    let rows = stmt
        .query_map(params![run_id, effect], edge_row)
        .map_err(sqlite_error)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(sqlite_error)?;
    Ok(rows)
}

/// Rebuild the snapshot of a run from its node list and stored edges.
pub fn load_snapshot(
    conn: &Connection,
    run_id: i64,
    variables: &[String],
) -> Result<GraphSnapshot, StorageError> {
    let mut nodes = variables.to_vec();
    nodes.sort();
    Ok(GraphSnapshot {
        nodes,
        edges: load_edges(conn, run_id)?,
    })
}
