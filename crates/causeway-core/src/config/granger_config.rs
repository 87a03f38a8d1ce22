//! Granger screener configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_GRANGER_MAX_LAG, DEFAULT_SIGNIFICANCE_LEVEL};
use crate::types::MultipleTestingCorrection;

/// Configuration for pairwise Granger screening.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GrangerConfig {
    /// Lags of both series in the test regressions. Default: 5.
    pub max_lag: Option<usize>,
    /// Per-test significance level. Default: 0.05.
    pub significance_level: Option<f64>,
    /// Threshold adjustment across all pairs. Default: none.
    pub correction: Option<MultipleTestingCorrection>,
    /// Worker threads for pair screening (0 = rayon global pool). Default: 0.
    pub threads: Option<usize>,
}

impl GrangerConfig {
    pub fn effective_max_lag(&self) -> usize {
        self.max_lag.unwrap_or(DEFAULT_GRANGER_MAX_LAG)
    }

    pub fn effective_significance_level(&self) -> f64 {
        self.significance_level.unwrap_or(DEFAULT_SIGNIFICANCE_LEVEL)
    }

    pub fn effective_correction(&self) -> MultipleTestingCorrection {
        self.correction.unwrap_or_default()
    }

    pub fn effective_threads(&self) -> usize {
        self.threads.unwrap_or(0)
    }
}
