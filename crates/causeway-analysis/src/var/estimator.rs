//! OLS VAR(p) estimation with information-criterion lag selection.

use std::time::Instant;

use causeway_core::config::VarConfig;
use causeway_core::errors::EstimationError;
use causeway_core::tracing::metrics;
use causeway_core::{InformationCriterion, TimeSeriesPanel};

use super::types::{LagCriterion, VarModelResult};
use crate::linalg::{least_squares, log_det_spd, LeastSquares, LinalgError, Matrix};
use crate::stationarity::is_constant;

/// Fits VAR models for lags `1..=max_lag` and keeps the best by criterion.
#[derive(Debug, Clone, Copy)]
pub struct VarEstimator {
    max_lag: usize,
    criterion: InformationCriterion,
}

impl VarEstimator {
    pub fn new(max_lag: usize, criterion: InformationCriterion) -> Self {
        Self { max_lag, criterion }
    }

    pub fn from_config(config: &VarConfig) -> Self {
        Self::new(config.effective_max_lag(), config.effective_criterion())
    }

    /// Select the lag order on a common sample, then refit on the full sample.
    ///
    /// Candidate lags satisfy `p * (k + 1) < T`. The first `max(candidates)`
    /// rows are the presample for every candidate so criteria compare
    /// like with like. Ties go to the smaller lag.
    pub fn fit(&self, panel: &TimeSeriesPanel) -> Result<VarModelResult, EstimationError> {
        let span = tracing::info_span!(
            "var_fit",
            variables = panel.n_variables(),
            observations = panel.len(),
            max_lag = self.max_lag,
            criterion = self.criterion.name(),
            selected_lag = tracing::field::Empty,
            var_fit_time_ms = tracing::field::Empty,
        );
        let _guard = span.enter();
        let start = Instant::now();

        let k = panel.n_variables();
        let t = panel.len();
        if k < 2 {
            return Err(EstimationError::TooFewVariables { variables: k });
        }

        let candidates: Vec<usize> = (1..=self.max_lag).filter(|p| p * (k + 1) < t).collect();
        let Some(&presample) = candidates.last() else {
            return Err(EstimationError::InsufficientData {
                observations: t,
                variables: k,
                max_lag: self.max_lag,
            });
        };

        let mut criterion_values = Vec::with_capacity(candidates.len());
        let mut best: Option<LagCriterion> = None;
        let mut smallest_estimable: Option<usize> = None;
        for &p in &candidates {
            let fit = match regress(panel, p, presample) {
                Ok(fit) => fit,
                Err(e) => {
                    tracing::debug!(lag = p, error = %e, "skipping singular candidate lag");
                    continue;
                }
            };
            smallest_estimable.get_or_insert(p);
            let n = fit.nobs();
            let mut sigma_ml = fit.residual_cross_product();
            sigma_ml.scale(1.0 / n as f64);
            // Fewer residual degrees of freedom than variables leaves the ML
            // covariance singular even though the design has full rank.
            let log_det = match log_det_spd(&sigma_ml) {
                Ok(v) => v,
                Err(e) => {
                    tracing::debug!(lag = p, error = %e, "no criterion value for candidate lag");
                    continue;
                }
            };
            let free_params = (p * k * k + k) as f64;
            let value = log_det + self.criterion.penalty(n) * free_params / n as f64;
            tracing::debug!(lag = p, value, "candidate lag evaluated");

            let candidate = LagCriterion { lag: p, value };
            criterion_values.push(candidate);
            if best.map_or(true, |b| value < b.value) {
                best = Some(candidate);
            }
        }

        let selected_lag = match (best, smallest_estimable) {
            (Some(best), _) => best.lag,
            (None, Some(lag)) => {
                tracing::warn!(
                    lag,
                    "residual covariance is not positive definite at any candidate lag, using the smallest"
                );
                lag
            }
            (None, None) => return Err(self.singular(panel)),
        };

        let fit = regress(panel, selected_lag, selected_lag).map_err(|_| self.singular(panel))?;
        let result = assemble(panel, selected_lag, self.criterion, criterion_values, &fit);

        let elapsed_ms = start.elapsed().as_millis() as u64;
        span.record(metrics::SELECTED_LAG, selected_lag);
        span.record(metrics::VAR_FIT_TIME, elapsed_ms);
        tracing::info!(
            selected_lag,
            criterion_value = ?result.selected_criterion_value(),
            nobs = result.nobs,
            "VAR lag selected"
        );
        Ok(result)
    }

    /// Every candidate failed: name the zero-variance variables, or all of
    /// them when the collinearity is not that simple.
    fn singular(&self, panel: &TimeSeriesPanel) -> EstimationError {
        let flat: Vec<String> = panel
            .columns()
            .filter(|(_, values)| is_constant(values))
            .map(|(name, _)| name.to_string())
            .collect();
        let variables = if flat.is_empty() {
            panel.variables().to_vec()
        } else {
            flat
        };
        EstimationError::SingularMatrix {
            max_lag: self.max_lag,
            variables,
        }
    }
}

/// `fit(panel, max_lag, criterion)`.
pub fn fit(
    panel: &TimeSeriesPanel,
    max_lag: usize,
    criterion: InformationCriterion,
) -> Result<VarModelResult, EstimationError> {
    VarEstimator::new(max_lag, criterion).fit(panel)
}

/// OLS of `y_t` on `[1, y_{t-1}, .., y_{t-p}]` for `t` in `presample..T`.
fn regress(panel: &TimeSeriesPanel, p: usize, presample: usize) -> Result<LeastSquares, LinalgError> {
    let k = panel.n_variables();
    let rows = panel.len() - presample;
    let cols = 1 + k * p;
    let mut x = Matrix::zeros(rows, cols);
    let mut y = Matrix::zeros(rows, k);
    for (row, t) in (presample..panel.len()).enumerate() {
        x[(row, 0)] = 1.0;
        for lag in 1..=p {
            for j in 0..k {
                x[(row, 1 + (lag - 1) * k + j)] = panel.value(t - lag, j);
            }
        }
        for j in 0..k {
            y[(row, j)] = panel.value(t, j);
        }
    }
    least_squares(&x, &y)
}

fn assemble(
    panel: &TimeSeriesPanel,
    p: usize,
    criterion: InformationCriterion,
    criterion_values: Vec<LagCriterion>,
    fit: &LeastSquares,
) -> VarModelResult {
    let k = panel.n_variables();
    let b = &fit.coefficients;

    let intercept = (0..k).map(|i| b[(0, i)]).collect();
    let coefficients = (1..=p)
        .map(|lag| {
            let mut a = Matrix::zeros(k, k);
            for i in 0..k {
                for j in 0..k {
                    a[(i, j)] = b[(1 + (lag - 1) * k + j, i)];
                }
            }
            a
        })
        .collect();

    let n = fit.nobs();
    let dof = n.saturating_sub(k * p + 1);
    let divisor = if dof == 0 { n } else { dof };
    let mut residual_covariance = fit.residual_cross_product();
    residual_covariance.scale(1.0 / divisor as f64);

    VarModelResult {
        variables: panel.variables().to_vec(),
        lag_order: p,
        criterion,
        criterion_values,
        intercept,
        coefficients,
        residual_covariance,
        nobs: n,
    }
}
