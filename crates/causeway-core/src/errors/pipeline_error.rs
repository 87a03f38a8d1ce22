//! Pipeline errors: subsystem errors tagged with the stage that failed.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error_code::CausewayErrorCode;
use super::{ConfigError, DataQualityError, EstimationError, IngestError, StorageError};

/// The stages of a pipeline run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    Config,
    Ingest,
    Selection,
    Stationarity,
    Estimation,
    Screening,
    Graph,
    Storage,
}

impl PipelineStage {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Config => "config",
            Self::Ingest => "ingest",
            Self::Selection => "selection",
            Self::Stationarity => "stationarity",
            Self::Estimation => "estimation",
            Self::Screening => "screening",
            Self::Graph => "graph",
            Self::Storage => "storage",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Errors that abort a pipeline run.
///
/// Per-pair screening failures never appear here; they are embedded in the
/// verdicts instead.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Ingest error: {0}")]
    Ingest(#[from] IngestError),

    #[error("{stage} stage rejected the panel: {source}")]
    DataQuality {
        stage: PipelineStage,
        source: DataQualityError,
    },

    #[error("Estimation error: {0}")]
    Estimation(#[from] EstimationError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl PipelineError {
    /// Wrap a data-quality failure with the stage that detected it.
    pub fn data_quality(stage: PipelineStage, source: DataQualityError) -> Self {
        Self::DataQuality { stage, source }
    }

    /// The stage that failed.
    pub fn stage(&self) -> PipelineStage {
        match self {
            Self::Config(_) => PipelineStage::Config,
            Self::Ingest(_) => PipelineStage::Ingest,
            Self::DataQuality { stage, .. } => *stage,
            Self::Estimation(_) => PipelineStage::Estimation,
            Self::Storage(_) => PipelineStage::Storage,
        }
    }

    /// Variable names named by the underlying error, if any.
    pub fn variables(&self) -> Vec<String> {
        let quality = match self {
            Self::DataQuality { source, .. } => Some(source),
            Self::Estimation(EstimationError::DataQuality(e)) => Some(e),
            Self::Ingest(IngestError::DataQuality(e)) => Some(e),
            Self::Estimation(EstimationError::SingularMatrix { variables, .. }) => {
                return variables.clone();
            }
            _ => None,
        };
        match quality {
            Some(DataQualityError::TooFewObservations { variable, .. })
            | Some(DataQualityError::NonFiniteValue { variable, .. })
            | Some(DataQualityError::LengthMismatch { variable, .. }) => vec![variable.clone()],
            Some(DataQualityError::DuplicateVariable(v))
            | Some(DataQualityError::UnknownVariable(v)) => vec![v.clone()],
            _ => Vec::new(),
        }
    }
}

impl CausewayErrorCode for PipelineError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Config(e) => e.error_code(),
            Self::Ingest(e) => e.error_code(),
            Self::DataQuality { source, .. } => source.error_code(),
            Self::Estimation(e) => e.error_code(),
            Self::Storage(e) => e.error_code(),
        }
    }
}
