//! VAR estimation errors.

use super::error_code::{self, CausewayErrorCode};
use super::DataQualityError;

/// Fatal errors from model fitting. Carry enough context to diagnose the
/// failing panel: observation counts, lag, and the variables involved.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EstimationError {
    #[error(
        "insufficient data: {observations} observations of {variables} variables cannot \
         support any lag in 1..={max_lag} (need lag < observations / (variables + 1))"
    )]
    InsufficientData {
        observations: usize,
        variables: usize,
        max_lag: usize,
    },

    #[error("VAR estimation needs at least 2 variables, got {variables}")]
    TooFewVariables { variables: usize },

    #[error(
        "design matrix is singular at every candidate lag up to {max_lag} (variables: {})",
        .variables.join(", ")
    )]
    SingularMatrix { max_lag: usize, variables: Vec<String> },

    #[error(transparent)]
    DataQuality(#[from] DataQualityError),
}

impl CausewayErrorCode for EstimationError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::InsufficientData { .. } | Self::TooFewVariables { .. } => {
                error_code::INSUFFICIENT_DATA
            }
            Self::SingularMatrix { .. } => error_code::SINGULAR_MATRIX,
            Self::DataQuality(e) => e.error_code(),
        }
    }
}
