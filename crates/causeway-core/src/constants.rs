//! Shared constants for the Causeway pipeline.

/// Causeway version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Project config file name looked up in the project root.
pub const CONFIG_FILE_NAME: &str = "causeway.toml";

/// Environment variable holding the tracing filter.
pub const LOG_ENV_VAR: &str = "CAUSEWAY_LOG";

/// Default significance level for Granger screening.
pub const DEFAULT_SIGNIFICANCE_LEVEL: f64 = 0.05;

/// Default significance level for the ADF unit-root test.
pub const DEFAULT_ADF_SIGNIFICANCE_LEVEL: f64 = 0.05;

/// Default differencing ceiling per variable.
pub const DEFAULT_MAX_DIFFERENCING: usize = 1;

/// Default maximum VAR lag order.
pub const DEFAULT_VAR_MAX_LAG: usize = 5;

/// Default Granger lag.
pub const DEFAULT_GRANGER_MAX_LAG: usize = 5;

/// Default impulse-response horizon.
pub const DEFAULT_IRF_STEPS: usize = 10;

/// Default forecast horizon.
pub const DEFAULT_FORECAST_STEPS: usize = 5;

/// Default date column in ingested CSV files.
pub const DEFAULT_DATE_COLUMN: &str = "date";

/// Default result database file name.
pub const DEFAULT_DATABASE_PATH: &str = "causeway.db";

/// Relative pivot tolerance for rank detection in least squares.
pub const RANK_TOLERANCE: f64 = 1e-10;

/// Shortest series a single ADF regression can be run on.
pub const ADF_MIN_OBSERVATIONS: usize = 4;
