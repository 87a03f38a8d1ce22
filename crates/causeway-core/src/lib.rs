//! # causeway-core
//!
//! Shared foundation for the Causeway pipeline: the time-series panel type,
//! one error enum per subsystem, TOML configuration with layered resolution,
//! tracing setup, and workspace constants.

pub mod config;
pub mod constants;
pub mod errors;
pub mod tracing;
pub mod types;

pub use config::CausewayConfig;
pub use types::{InformationCriterion, TimeSeriesPanel};
