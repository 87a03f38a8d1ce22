//! Stationarity normalizer configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_ADF_SIGNIFICANCE_LEVEL, DEFAULT_MAX_DIFFERENCING};

/// Configuration for unit-root testing and differencing.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StationarityConfig {
    /// Run the ADF test and difference non-stationary series. Default: true.
    pub test_stationarity: Option<bool>,
    /// Differencing ceiling per variable. Default: 1.
    pub max_differencing: Option<usize>,
    /// ADF significance level. Default: 0.05.
    pub significance_level: Option<f64>,
}

impl StationarityConfig {
    pub fn effective_test_stationarity(&self) -> bool {
        self.test_stationarity.unwrap_or(true)
    }

    pub fn effective_max_differencing(&self) -> usize {
        self.max_differencing.unwrap_or(DEFAULT_MAX_DIFFERENCING)
    }

    pub fn effective_significance_level(&self) -> f64 {
        self.significance_level.unwrap_or(DEFAULT_ADF_SIGNIFICANCE_LEVEL)
    }
}
