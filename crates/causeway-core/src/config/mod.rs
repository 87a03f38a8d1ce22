//! Configuration system for Causeway.
//! TOML-based, layered resolution: overrides > env > project > defaults.

pub mod causeway_config;
pub mod granger_config;
pub mod input_config;
pub mod output_config;
pub mod stationarity_config;
pub mod var_config;

pub use causeway_config::{CausewayConfig, ConfigOverrides};
pub use granger_config::GrangerConfig;
pub use input_config::InputConfig;
pub use output_config::OutputConfig;
pub use stationarity_config::StationarityConfig;
pub use var_config::VarConfig;
