//! Shared data types.

pub mod criterion;
pub mod panel;

pub use criterion::{InformationCriterion, MultipleTestingCorrection};
pub use panel::TimeSeriesPanel;
