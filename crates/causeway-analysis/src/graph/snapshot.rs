//! Serializable graph view for the visualization layer.

use serde::{Deserialize, Serialize};

use super::stable_graph::CausalGraph;

/// One directed edge in a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub cause: String,
    pub effect: String,
    pub weight: f64,
    pub lag: usize,
    pub p_value: f64,
    pub statistic: f64,
}

/// Nodes and edges of a causal graph, in output order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub nodes: Vec<String>,
    pub edges: Vec<GraphEdge>,
}

impl GraphSnapshot {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl CausalGraph {
    pub fn snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            nodes: self.nodes(),
            edges: self.edges(),
        }
    }
}
