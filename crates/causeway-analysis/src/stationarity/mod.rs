//! Stationarity normalization: ADF unit-root testing plus bounded differencing.

pub mod adf;
pub mod mackinnon;
pub mod normalizer;
pub mod types;

pub use adf::{adf_test, AdfResult};
pub use normalizer::{is_constant, normalize, StationarityNormalizer};
pub use types::{AdfError, NormalizedPanel, StationarityReport, StationarityStatus, VariableStationarity};
