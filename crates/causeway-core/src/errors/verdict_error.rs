//! Per-pair screening failures, embedded in verdicts rather than raised.

use serde::{Deserialize, Serialize};

use super::error_code::{self, CausewayErrorCode};

/// Why a single Granger test produced no usable statistic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, thiserror::Error)]
#[serde(rename_all = "snake_case")]
pub enum VerdictError {
    /// Singular regression or non-positive residual degrees of freedom.
    #[error("model_degenerate")]
    ModelDegenerate,
}

impl VerdictError {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ModelDegenerate => "model_degenerate",
        }
    }

    /// Inverse of [`VerdictError::as_str`].
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "model_degenerate" => Some(Self::ModelDegenerate),
            _ => None,
        }
    }
}

impl CausewayErrorCode for VerdictError {
    fn error_code(&self) -> &'static str {
        error_code::MODEL_DEGENERATE
    }
}
