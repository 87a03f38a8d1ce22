//! Pairwise Granger causality screening.

pub mod screener;
pub mod types;

pub use screener::{screen, GrangerScreener};
pub use types::{CausalityVerdict, LagPValue};
