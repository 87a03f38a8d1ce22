//! Structured span field names shared across Causeway stages.

/// Stationarity: number of variables that were differenced.
pub const DIFFERENCED_VARIABLES: &str = "differenced_variables";

/// Stationarity: number of variables flagged possibly non-stationary.
pub const FLAGGED_VARIABLES: &str = "flagged_variables";

/// VAR: selected lag order.
pub const SELECTED_LAG: &str = "selected_lag";

/// VAR: wall time of lag selection plus refit in milliseconds.
pub const VAR_FIT_TIME: &str = "var_fit_time_ms";

/// Granger: number of ordered pairs screened.
pub const PAIRS_SCREENED: &str = "pairs_screened";

/// Granger: number of pairs whose regressions were degenerate.
pub const DEGENERATE_PAIRS: &str = "degenerate_pairs";

/// Granger: wall time of the full screen in milliseconds.
pub const SCREEN_TIME: &str = "screen_time_ms";

/// Graph: number of significant edges.
pub const EDGE_COUNT: &str = "edge_count";

/// Pipeline: total run time in milliseconds.
pub const PIPELINE_TIME: &str = "pipeline_time_ms";
