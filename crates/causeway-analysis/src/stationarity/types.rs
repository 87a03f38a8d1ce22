//! Types for the stationarity stage.

use causeway_core::TimeSeriesPanel;
use serde::{Deserialize, Serialize};

/// Why a single ADF regression could not be evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AdfError {
    #[error("series has {observations} observations, at least {required} required")]
    TooShort { observations: usize, required: usize },

    #[error("every candidate ADF regression was singular or a perfect fit")]
    Degenerate,
}

/// Outcome of the unit-root loop for one variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StationarityStatus {
    Stationary,
    /// Still non-stationary at the differencing ceiling.
    PossiblyNonStationary,
    /// Zero variance; never differenced.
    Constant,
    /// Testing disabled by configuration.
    Untested,
}

impl StationarityStatus {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Stationary => "stationary",
            Self::PossiblyNonStationary => "possibly_non_stationary",
            Self::Constant => "constant",
            Self::Untested => "untested",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "stationary" => Some(Self::Stationary),
            "possibly_non_stationary" => Some(Self::PossiblyNonStationary),
            "constant" => Some(Self::Constant),
            "untested" => Some(Self::Untested),
            _ => None,
        }
    }
}

/// Per-variable normalization record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableStationarity {
    pub variable: String,
    pub differencing_count: usize,
    /// ADF statistic of the final test, if one could be evaluated.
    pub adf_statistic: Option<f64>,
    pub p_value: Option<f64>,
    /// Augmentation lags chosen by AIC for the final test.
    pub used_lag: Option<usize>,
    pub status: StationarityStatus,
}

/// What the normalizer did to each variable, in panel order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StationarityReport {
    pub variables: Vec<VariableStationarity>,
    /// Leading rows dropped to keep variables on a common index.
    pub trimmed_rows: usize,
}

impl StationarityReport {
    /// Report for a panel passed through without testing.
    pub fn untested(panel: &TimeSeriesPanel) -> Self {
        let variables = panel
            .columns()
            .map(|(name, values)| VariableStationarity {
                variable: name.to_string(),
                differencing_count: 0,
                adf_statistic: None,
                p_value: None,
                used_lag: None,
                status: if super::is_constant(values) {
                    StationarityStatus::Constant
                } else {
                    StationarityStatus::Untested
                },
            })
            .collect();
        Self {
            variables,
            trimmed_rows: 0,
        }
    }

    pub fn get(&self, variable: &str) -> Option<&VariableStationarity> {
        self.variables.iter().find(|v| v.variable == variable)
    }

    pub fn differencing_count(&self, variable: &str) -> Option<usize> {
        self.get(variable).map(|v| v.differencing_count)
    }

    /// `(variable, differencing count)` in panel order.
    pub fn differencing_counts(&self) -> Vec<(String, usize)> {
        self.variables
            .iter()
            .map(|v| (v.variable.clone(), v.differencing_count))
            .collect()
    }

    pub fn with_status(&self, status: StationarityStatus) -> Vec<String> {
        self.variables
            .iter()
            .filter(|v| v.status == status)
            .map(|v| v.variable.clone())
            .collect()
    }

    pub fn constant_variables(&self) -> Vec<String> {
        self.with_status(StationarityStatus::Constant)
    }
}

/// Normalizer output: the aligned panel and its report.
#[derive(Debug, Clone)]
pub struct NormalizedPanel {
    pub panel: TimeSeriesPanel,
    pub report: StationarityReport,
}
