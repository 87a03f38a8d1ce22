//! Verdict types produced by the screener.

use causeway_core::errors::VerdictError;
use serde::{Deserialize, Serialize};

/// F-test at a single lag, kept for display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LagPValue {
    pub lag: usize,
    pub statistic: f64,
    pub p_value: f64,
}

/// Outcome of testing whether `cause` Granger-causes `effect`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CausalityVerdict {
    pub cause: String,
    pub effect: String,
    /// Lag the decision was made at.
    pub lag: usize,
    /// F statistic; 0.0 when degenerate.
    pub statistic: f64,
    /// 1.0 when degenerate.
    pub p_value: f64,
    pub significant: bool,
    pub error: Option<VerdictError>,
    pub df_numerator: usize,
    pub df_denominator: usize,
    /// Tests at lags `1..=lag`.
    pub lag_profile: Vec<LagPValue>,
}

impl CausalityVerdict {
    pub fn is_degenerate(&self) -> bool {
        self.error.is_some()
    }
}
