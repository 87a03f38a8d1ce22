//! Error handling for Causeway.
//! One error enum per subsystem, `thiserror` only.

pub mod config_error;
pub mod data_quality_error;
pub mod error_code;
pub mod estimation_error;
pub mod ingest_error;
pub mod pipeline_error;
pub mod storage_error;
pub mod verdict_error;

pub use config_error::ConfigError;
pub use data_quality_error::DataQualityError;
pub use error_code::CausewayErrorCode;
pub use estimation_error::EstimationError;
pub use ingest_error::IngestError;
pub use pipeline_error::{PipelineError, PipelineStage};
pub use storage_error::StorageError;
pub use verdict_error::VerdictError;
