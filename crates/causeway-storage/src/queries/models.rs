//! Queries for the fitted VAR model and its post-estimation outputs.

use causeway_analysis::linalg::Matrix;
use causeway_analysis::var::{VarForecast, VarModelResult};
use causeway_core::errors::StorageError;
use rusqlite::{params, Connection, OptionalExtension};

use super::{serialization_error, sqlite_error};

/// A stored VAR model with its impulse responses and forecast.
#[derive(Debug, Clone, PartialEq)]
pub struct VarSummary {
    pub model: VarModelResult,
    pub impulse_responses: Vec<Matrix>,
    pub forecast: Option<VarForecast>,
}

pub fn insert_var_model(
    conn: &Connection,
    run_id: i64,
    model: &VarModelResult,
    impulse_responses: &[Matrix],
    forecast: Option<&VarForecast>,
) -> Result<(), StorageError> {
    let model_json = serde_json::to_string(model).map_err(serialization_error)?;
    let irf_json = serde_json::to_string(impulse_responses).map_err(serialization_error)?;
    let forecast_json = forecast
        .map(serde_json::to_string)
        .transpose()
        .map_err(serialization_error)?;
    conn.execute(
        "INSERT INTO var_models (run_id, lag_order, criterion, nobs, model_json, irf_json, forecast_json)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            run_id,
            model.lag_order as i64,
            model.criterion.name(),
            model.nobs as i64,
            model_json,
            irf_json,
            forecast_json,
        ],
    )
    .map_err(sqlite_error)?;
    Ok(())
}

/// The VAR stored for a run; `None` when the run skipped estimation.
pub fn load_var_summary(conn: &Connection, run_id: i64) -> Result<Option<VarSummary>, StorageError> {
    let row = conn
        .query_row(
            "SELECT model_json, irf_json, forecast_json FROM var_models WHERE run_id = ?1",
            params![run_id],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, Option<String>>(2)?,
                ))
            },
        )
        .optional()
        .map_err(sqlite_error)?;

    let Some((model_json, irf_json, forecast_json)) = row else {
        return Ok(None);
    };
    Ok(Some(VarSummary {
        model: serde_json::from_str(&model_json).map_err(serialization_error)?,
        impulse_responses: serde_json::from_str(&irf_json).map_err(serialization_error)?,
        forecast: forecast_json
            .as_deref()
            .map(serde_json::from_str)
            .transpose()
            .map_err(serialization_error)?,
    }))
}
