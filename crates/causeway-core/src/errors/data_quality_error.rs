//! Input data errors: malformed or too-short panels.

use super::error_code::{self, CausewayErrorCode};

/// Errors raised when a panel cannot be used as model input.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DataQualityError {
    #[error("panel has no variables")]
    EmptyPanel,

    #[error("variable '{variable}' has {observations} observations, at least {required} required")]
    TooFewObservations {
        variable: String,
        observations: usize,
        required: usize,
    },

    #[error("variable '{variable}' has a non-finite value at row {row}")]
    NonFiniteValue { variable: String, row: usize },

    #[error("variable '{variable}' has {actual} values but the index has {expected}")]
    LengthMismatch {
        variable: String,
        expected: usize,
        actual: usize,
    },

    #[error("duplicate variable '{0}'")]
    DuplicateVariable(String),

    #[error("unknown variable '{0}'")]
    UnknownVariable(String),

    #[error("timestamps are not strictly increasing at row {row}")]
    UnorderedIndex { row: usize },
}

impl CausewayErrorCode for DataQualityError {
    fn error_code(&self) -> &'static str {
        error_code::DATA_QUALITY_ERROR
    }
}
