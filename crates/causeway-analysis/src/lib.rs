//! # causeway-analysis
//!
//! The modeling stages of the Causeway pipeline, leaf first:
//! - `linalg`: dense least squares and determinants
//! - `stationarity`: ADF unit-root testing and differencing
//! - `var`: VAR(p) estimation with information-criterion lag selection
//! - `granger`: pairwise Granger causality screening
//! - `graph`: directed causal graph over `petgraph`
//! - `ingest`: CSV panel loading
//! - `pipeline`: end-to-end orchestration

pub mod granger;
pub mod graph;
pub mod ingest;
pub mod linalg;
pub mod pipeline;
pub mod stationarity;
pub mod var;

pub use granger::{CausalityVerdict, GrangerScreener};
pub use graph::{CausalGraph, CausalGraphBuilder, GraphSnapshot};
pub use pipeline::{CausalPipeline, PipelineReport};
pub use stationarity::{StationarityNormalizer, StationarityReport};
pub use var::{VarEstimator, VarModelResult};
