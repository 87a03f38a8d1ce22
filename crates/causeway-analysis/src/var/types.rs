//! VAR result types.

use causeway_core::InformationCriterion;
use serde::{Deserialize, Serialize};

use crate::linalg::Matrix;

/// Criterion value of one candidate lag order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LagCriterion {
    pub lag: usize,
    pub value: f64,
}

/// A fitted VAR(p): `y_t = c + A_1 y_{t-1} + ... + A_p y_{t-p} + u_t`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VarModelResult {
    pub variables: Vec<String>,
    /// Selected lag order `p`.
    pub lag_order: usize,
    pub criterion: InformationCriterion,
    /// Criterion per evaluated candidate lag; lags without a positive-definite
    /// residual covariance are absent.
    pub criterion_values: Vec<LagCriterion>,
    /// `c`, one entry per variable.
    pub intercept: Vec<f64>,
    /// `A_1..A_p`; entry `(i, j)` of `A_l` is the effect of variable `j`
    /// at lag `l` on variable `i`.
    pub coefficients: Vec<Matrix>,
    /// Residual covariance with the `n - (k p + 1)` divisor.
    pub residual_covariance: Matrix,
    /// Observations in the final fit.
    pub nobs: usize,
}

impl VarModelResult {
    pub fn n_variables(&self) -> usize {
        self.variables.len()
    }

    /// `A_lag`, for `lag` in `1..=lag_order`.
    pub fn coefficient_matrix(&self, lag: usize) -> Option<&Matrix> {
        lag.checked_sub(1).and_then(|i| self.coefficients.get(i))
    }

    /// Criterion value of the selected lag.
    pub fn selected_criterion_value(&self) -> Option<f64> {
        self.criterion_values
            .iter()
            .find(|c| c.lag == self.lag_order)
            .map(|c| c.value)
    }
}

/// Point forecasts, one row per step ahead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VarForecast {
    pub variables: Vec<String>,
    /// `values[h][i]`: variable `i` at horizon `h + 1`.
    pub values: Vec<Vec<f64>>,
}

impl VarForecast {
    pub fn steps(&self) -> usize {
        self.values.len()
    }

    /// Path of one variable across all horizons.
    pub fn path(&self, variable: &str) -> Option<Vec<f64>> {
        let i = self.variables.iter().position(|v| v == variable)?;
        Some(self.values.iter().map(|row| row[i]).collect())
    }
}
