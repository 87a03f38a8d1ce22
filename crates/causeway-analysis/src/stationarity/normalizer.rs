//! Repeated ADF testing and first differencing, per variable.

use causeway_core::config::StationarityConfig;
use causeway_core::constants::{ADF_MIN_OBSERVATIONS, DEFAULT_ADF_SIGNIFICANCE_LEVEL};
use causeway_core::errors::DataQualityError;
use causeway_core::tracing::metrics;
use causeway_core::TimeSeriesPanel;
use rayon::prelude::*;

use super::adf::adf_test;
use super::types::{NormalizedPanel, StationarityReport, StationarityStatus, VariableStationarity};

/// Makes each variable of a panel stationary by differencing, up to a ceiling.
#[derive(Debug, Clone, Copy)]
pub struct StationarityNormalizer {
    max_differencing: usize,
    significance_level: f64,
}

impl StationarityNormalizer {
    pub fn new(max_differencing: usize, significance_level: f64) -> Self {
        Self {
            max_differencing,
            significance_level,
        }
    }

    pub fn from_config(config: &StationarityConfig) -> Self {
        Self::new(
            config.effective_max_differencing(),
            config.effective_significance_level(),
        )
    }

    /// Minimum observations per variable.
    pub fn required_observations(&self) -> usize {
        (self.max_differencing + 2).max(ADF_MIN_OBSERVATIONS)
    }

    /// Test and difference every variable independently, then trim the
    /// panel to the rows all transformed variables share.
    pub fn normalize(&self, panel: &TimeSeriesPanel) -> Result<NormalizedPanel, DataQualityError> {
        let span = tracing::info_span!(
            "normalize",
            variables = panel.n_variables(),
            observations = panel.len(),
            differenced_variables = tracing::field::Empty,
            flagged_variables = tracing::field::Empty,
        );
        let _guard = span.enter();

        let required = self.required_observations();
        if panel.len() < required {
            let variable = panel.variables().first().cloned().unwrap_or_default();
            return Err(DataQualityError::TooFewObservations {
                variable,
                observations: panel.len(),
                required,
            });
        }

        let columns: Vec<(&str, &[f64])> = panel.columns().collect();
        let outcomes: Vec<(VariableStationarity, Vec<f64>)> = columns
            .par_iter()
            .map(|(name, values)| self.normalize_series(name, values))
            .collect();

        let max_count = outcomes
            .iter()
            .map(|(v, _)| v.differencing_count)
            .max()
            .unwrap_or(0);

        let mut report = StationarityReport {
            variables: Vec::with_capacity(outcomes.len()),
            trimmed_rows: max_count,
        };
        let mut transformed = Vec::with_capacity(outcomes.len());
        for (record, series) in outcomes {
            match record.status {
                StationarityStatus::PossiblyNonStationary => tracing::warn!(
                    variable = %record.variable,
                    differencing_count = record.differencing_count,
                    p_value = ?record.p_value,
                    "variable possibly non-stationary at differencing ceiling"
                ),
                StationarityStatus::Constant => tracing::warn!(
                    variable = %record.variable,
                    "variable has zero variance; left undifferenced"
                ),
                _ => tracing::debug!(
                    variable = %record.variable,
                    differencing_count = record.differencing_count,
                    "variable stationary"
                ),
            }
            let skip = max_count - record.differencing_count;
            transformed.push((record.variable.clone(), series[skip..].to_vec()));
            report.variables.push(record);
        }

        let index = panel.index()[max_count..].to_vec();
        let normalized = TimeSeriesPanel::new(index, transformed)?;

        let differenced = report
            .variables
            .iter()
            .filter(|v| v.differencing_count > 0)
            .count();
        let flagged = report
            .with_status(StationarityStatus::PossiblyNonStationary)
            .len();
        span.record(metrics::DIFFERENCED_VARIABLES, differenced);
        span.record(metrics::FLAGGED_VARIABLES, flagged);
        tracing::info!(
            differenced,
            flagged,
            trimmed_rows = max_count,
            "stationarity normalization complete"
        );

        Ok(NormalizedPanel {
            panel: normalized,
            report,
        })
    }

    fn normalize_series(&self, name: &str, values: &[f64]) -> (VariableStationarity, Vec<f64>) {
        let mut series = values.to_vec();
        let mut record = VariableStationarity {
            variable: name.to_string(),
            differencing_count: 0,
            adf_statistic: None,
            p_value: None,
            used_lag: None,
            status: StationarityStatus::PossiblyNonStationary,
        };

        loop {
            if is_constant(&series) {
                record.adf_statistic = None;
                record.p_value = None;
                record.used_lag = None;
                record.status = StationarityStatus::Constant;
                break;
            }

            match adf_test(&series) {
                Ok(result) => {
                    record.adf_statistic = Some(result.statistic);
                    record.p_value = Some(result.p_value);
                    record.used_lag = Some(result.used_lag);
                    if result.p_value < self.significance_level {
                        record.status = StationarityStatus::Stationary;
                        break;
                    }
                }
                Err(e) => {
                    tracing::debug!(variable = %name, error = %e, "ADF regression unusable");
                    record.adf_statistic = None;
                    record.p_value = None;
                    record.used_lag = None;
                }
            }

            let can_difference = record.differencing_count < self.max_differencing
                && series.len() > ADF_MIN_OBSERVATIONS;
            if !can_difference {
                record.status = StationarityStatus::PossiblyNonStationary;
                break;
            }
            series = difference(&series);
            record.differencing_count += 1;
        }

        (record, series)
    }
}

impl Default for StationarityNormalizer {
    fn default() -> Self {
        Self::new(
            causeway_core::constants::DEFAULT_MAX_DIFFERENCING,
            DEFAULT_ADF_SIGNIFICANCE_LEVEL,
        )
    }
}

/// `normalize(panel, max_differencing)` at the default ADF significance level.
pub fn normalize(
    panel: &TimeSeriesPanel,
    max_differencing: usize,
) -> Result<NormalizedPanel, DataQualityError> {
    StationarityNormalizer::new(max_differencing, DEFAULT_ADF_SIGNIFICANCE_LEVEL).normalize(panel)
}

/// Whether every value equals the first.
pub fn is_constant(values: &[f64]) -> bool {
    match values.first() {
        Some(first) => values.iter().all(|v| v == first),
        None => true,
    }
}

fn difference(values: &[f64]) -> Vec<f64> {
    values.windows(2).map(|w| w[1] - w[0]).collect()
}
