//! Stable error codes for callers that report failures outside Rust.

/// Every Causeway error enum maps its variants to a stable code string.
pub trait CausewayErrorCode {
    /// Returns the error code string (e.g. "SINGULAR_MATRIX").
    fn error_code(&self) -> &'static str;

    /// Returns `[ERROR_CODE] message`.
    fn coded_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const DATA_QUALITY_ERROR: &str = "DATA_QUALITY_ERROR";
pub const INSUFFICIENT_DATA: &str = "INSUFFICIENT_DATA";
pub const SINGULAR_MATRIX: &str = "SINGULAR_MATRIX";
pub const INGEST_ERROR: &str = "INGEST_ERROR";
pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
pub const MIGRATION_FAILED: &str = "MIGRATION_FAILED";
pub const RUN_NOT_FOUND: &str = "RUN_NOT_FOUND";
pub const MODEL_DEGENERATE: &str = "MODEL_DEGENERATE";
