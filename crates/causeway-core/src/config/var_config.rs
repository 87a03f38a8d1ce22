//! VAR estimator configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_FORECAST_STEPS, DEFAULT_IRF_STEPS, DEFAULT_VAR_MAX_LAG};
use crate::types::InformationCriterion;

/// Configuration for VAR lag selection and post-estimation outputs.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct VarConfig {
    /// Largest candidate lag order. Default: 5.
    pub max_lag: Option<usize>,
    /// Lag selection criterion. Default: aic.
    pub criterion: Option<InformationCriterion>,
    /// Impulse-response horizon; 0 disables. Default: 10.
    pub irf_steps: Option<usize>,
    /// Forecast horizon; 0 disables. Default: 5.
    pub forecast_steps: Option<usize>,
}

impl VarConfig {
    pub fn effective_max_lag(&self) -> usize {
        self.max_lag.unwrap_or(DEFAULT_VAR_MAX_LAG)
    }

    pub fn effective_criterion(&self) -> InformationCriterion {
        self.criterion.unwrap_or_default()
    }

    pub fn effective_irf_steps(&self) -> usize {
        self.irf_steps.unwrap_or(DEFAULT_IRF_STEPS)
    }

    pub fn effective_forecast_steps(&self) -> usize {
        self.forecast_steps.unwrap_or(DEFAULT_FORECAST_STEPS)
    }
}
