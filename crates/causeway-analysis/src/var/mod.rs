//! Vector autoregression: OLS estimation with information-criterion lag selection.

pub mod estimator;
pub mod forecast;
pub mod irf;
pub mod types;

pub use estimator::{fit, VarEstimator};
pub use types::{LagCriterion, VarForecast, VarModelResult};
