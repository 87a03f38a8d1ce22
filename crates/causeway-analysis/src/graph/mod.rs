//! Directed causal graph built from Granger verdicts.

pub mod builder;
pub mod queries;
pub mod snapshot;
pub mod stable_graph;

pub use builder::{build, CausalGraphBuilder};
pub use snapshot::{GraphEdge, GraphSnapshot};
pub use stable_graph::{CausalEdge, CausalGraph, CausalNode};
