//! Top-level Causeway configuration with layered resolution.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{GrangerConfig, InputConfig, OutputConfig, StationarityConfig, VarConfig};
use crate::constants::CONFIG_FILE_NAME;
use crate::errors::ConfigError;
use crate::types::{InformationCriterion, MultipleTestingCorrection};

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. Explicit overrides (applied via `apply_overrides`)
/// 2. Environment variables (`CAUSEWAY_*`)
/// 3. Project config (`causeway.toml` in project root)
/// 4. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CausewayConfig {
    /// Variables to model, in order. Empty means every panel variable.
    pub variables: Vec<String>,
    pub input: InputConfig,
    pub stationarity: StationarityConfig,
    pub var: VarConfig,
    pub granger: GrangerConfig,
    pub output: OutputConfig,
}

/// Caller-supplied overrides, e.g. from a wrapping script's arguments.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub variables: Option<Vec<String>>,
    pub var_max_lag: Option<usize>,
    pub criterion: Option<InformationCriterion>,
    pub granger_max_lag: Option<usize>,
    pub significance_level: Option<f64>,
    pub max_differencing: Option<usize>,
}

impl CausewayConfig {
    /// Load configuration with layered resolution rooted at `root`.
    pub fn load(root: &Path, overrides: Option<&ConfigOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        let project_config_path = root.join(CONFIG_FILE_NAME);
        if project_config_path.exists() {
            ::tracing::debug!(path = %project_config_path.display(), "loading project config");
            Self::merge_toml_file(&mut config, &project_config_path)?;
        }

        Self::apply_env_overrides(&mut config);

        if let Some(overrides) = overrides {
            Self::apply_overrides(&mut config, overrides);
        }

        Self::validate(&config)?;

        Ok(config)
    }

    /// Load configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate the configuration values.
    pub fn validate(config: &CausewayConfig) -> Result<(), ConfigError> {
        if config.var.max_lag == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "var.max_lag".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if config.granger.max_lag == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "granger.max_lag".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if let Some(level) = config.granger.significance_level {
            if !(level > 0.0 && level < 1.0) {
                return Err(ConfigError::ValidationFailed {
                    field: "granger.significance_level".to_string(),
                    message: "must be in the open interval (0, 1)".to_string(),
                });
            }
        }
        if let Some(level) = config.stationarity.significance_level {
            if !(level > 0.0 && level < 1.0) {
                return Err(ConfigError::ValidationFailed {
                    field: "stationarity.significance_level".to_string(),
                    message: "must be in the open interval (0, 1)".to_string(),
                });
            }
        }
        let mut seen = std::collections::HashSet::new();
        for name in &config.variables {
            if name.trim().is_empty() {
                return Err(ConfigError::ValidationFailed {
                    field: "variables".to_string(),
                    message: "variable names must not be empty".to_string(),
                });
            }
            if !seen.insert(name.as_str()) {
                return Err(ConfigError::ValidationFailed {
                    field: "variables".to_string(),
                    message: format!("duplicate variable '{name}'"),
                });
            }
        }
        Ok(())
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are silently ignored.
    fn merge_toml_file(config: &mut CausewayConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: CausewayConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`; `other` wins wherever it has a value.
    fn merge(base: &mut CausewayConfig, other: &CausewayConfig) {
        if !other.variables.is_empty() {
            base.variables = other.variables.clone();
        }

        // Input
        if other.input.path.is_some() {
            base.input.path = other.input.path.clone();
        }
        if other.input.date_column.is_some() {
            base.input.date_column = other.input.date_column.clone();
        }

        // Stationarity
        if other.stationarity.test_stationarity.is_some() {
            base.stationarity.test_stationarity = other.stationarity.test_stationarity;
        }
        if other.stationarity.max_differencing.is_some() {
            base.stationarity.max_differencing = other.stationarity.max_differencing;
        }
        if other.stationarity.significance_level.is_some() {
            base.stationarity.significance_level = other.stationarity.significance_level;
        }

        // VAR
        if other.var.max_lag.is_some() {
            base.var.max_lag = other.var.max_lag;
        }
        if other.var.criterion.is_some() {
            base.var.criterion = other.var.criterion;
        }
        if other.var.irf_steps.is_some() {
            base.var.irf_steps = other.var.irf_steps;
        }
        if other.var.forecast_steps.is_some() {
            base.var.forecast_steps = other.var.forecast_steps;
        }

        // Granger
        if other.granger.max_lag.is_some() {
            base.granger.max_lag = other.granger.max_lag;
        }
        if other.granger.significance_level.is_some() {
            base.granger.significance_level = other.granger.significance_level;
        }
        if other.granger.correction.is_some() {
            base.granger.correction = other.granger.correction;
        }
        if other.granger.threads.is_some() {
            base.granger.threads = other.granger.threads;
        }

        // Output
        if other.output.persist.is_some() {
            base.output.persist = other.output.persist;
        }
        if other.output.database_path.is_some() {
            base.output.database_path = other.output.database_path.clone();
        }
    }

    /// Apply environment variable overrides.
    /// Pattern: `CAUSEWAY_VAR_MAX_LAG`, `CAUSEWAY_GRANGER_SIGNIFICANCE_LEVEL`, etc.
    /// Unparsable values are ignored.
    fn apply_env_overrides(config: &mut CausewayConfig) {
        if let Ok(val) = std::env::var("CAUSEWAY_VARIABLES") {
            let names: Vec<String> = val
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect();
            if !names.is_empty() {
                config.variables = names;
            }
        }
        if let Ok(val) = std::env::var("CAUSEWAY_INPUT_PATH") {
            config.input.path = Some(val);
        }
        if let Ok(val) = std::env::var("CAUSEWAY_MAX_DIFFERENCING") {
            if let Ok(v) = val.parse::<usize>() {
                config.stationarity.max_differencing = Some(v);
            }
        }
        if let Ok(val) = std::env::var("CAUSEWAY_VAR_MAX_LAG") {
            if let Ok(v) = val.parse::<usize>() {
                config.var.max_lag = Some(v);
            }
        }
        if let Ok(val) = std::env::var("CAUSEWAY_VAR_CRITERION") {
            if let Ok(v) = val.parse::<InformationCriterion>() {
                config.var.criterion = Some(v);
            }
        }
        if let Ok(val) = std::env::var("CAUSEWAY_GRANGER_MAX_LAG") {
            if let Ok(v) = val.parse::<usize>() {
                config.granger.max_lag = Some(v);
            }
        }
        if let Ok(val) = std::env::var("CAUSEWAY_GRANGER_SIGNIFICANCE_LEVEL") {
            if let Ok(v) = val.parse::<f64>() {
                config.granger.significance_level = Some(v);
            }
        }
        if let Ok(val) = std::env::var("CAUSEWAY_GRANGER_CORRECTION") {
            if let Ok(v) = val.parse::<MultipleTestingCorrection>() {
                config.granger.correction = Some(v);
            }
        }
        if let Ok(val) = std::env::var("CAUSEWAY_DATABASE_PATH") {
            config.output.database_path = Some(val);
        }
    }

    /// Apply explicit overrides (highest priority).
    pub fn apply_overrides(config: &mut CausewayConfig, overrides: &ConfigOverrides) {
        if let Some(ref v) = overrides.variables {
            config.variables = v.clone();
        }
        if let Some(v) = overrides.var_max_lag {
            config.var.max_lag = Some(v);
        }
        if let Some(v) = overrides.criterion {
            config.var.criterion = Some(v);
        }
        if let Some(v) = overrides.granger_max_lag {
            config.granger.max_lag = Some(v);
        }
        if let Some(v) = overrides.significance_level {
            config.granger.significance_level = Some(v);
        }
        if let Some(v) = overrides.max_differencing {
            config.stationarity.max_differencing = Some(v);
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}
