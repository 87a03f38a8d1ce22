//! petgraph::StableGraph wrapper with variable nodes and verdict-weighted edges.

use std::collections::HashMap;

use petgraph::stable_graph::{NodeIndex, StableGraph};
use petgraph::Directed;

use super::snapshot::GraphEdge;

/// A node in the causal graph, representing one variable.
#[derive(Debug, Clone, PartialEq)]
pub struct CausalNode {
    pub name: String,
}

/// Weight on a `cause -> effect` edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CausalEdge {
    /// `1 - p_value`.
    pub weight: f64,
    pub lag: usize,
    pub p_value: f64,
    /// F statistic of the verdict.
    pub statistic: f64,
}

/// The underlying directed graph type.
pub type CausalStableGraph = StableGraph<CausalNode, CausalEdge, Directed>;

/// Read-only causal graph. Nodes are inserted in name order and edges in
/// (cause, p-value, effect) order, so index order is output order.
#[derive(Debug, Clone, Default)]
pub struct CausalGraph {
    pub(crate) graph: CausalStableGraph,
    pub(crate) node_index: HashMap<String, NodeIndex>,
}

impl CausalGraph {
    pub(crate) fn ensure_node(&mut self, name: &str) -> NodeIndex {
        if let Some(&idx) = self.node_index.get(name) {
            return idx;
        }
        let idx = self.graph.add_node(CausalNode {
            name: name.to_string(),
        });
        self.node_index.insert(name.to_string(), idx);
        idx
    }

    /// Look up a node index by variable name.
    pub fn get_node(&self, name: &str) -> Option<NodeIndex> {
        self.node_index.get(name).copied()
    }

    pub fn contains_node(&self, name: &str) -> bool {
        self.node_index.contains_key(name)
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Variable names, sorted.
    pub fn nodes(&self) -> Vec<String> {
        self.graph
            .node_indices()
            .map(|idx| self.graph[idx].name.clone())
            .collect()
    }

    /// Edges in deterministic output order.
    pub fn edges(&self) -> Vec<GraphEdge> {
        self.graph
            .edge_indices()
            .filter_map(|idx| {
                let (source, target) = self.graph.edge_endpoints(idx)?;
                Some(self.graph_edge(source, target, &self.graph[idx]))
            })
            .collect()
    }

    /// The edge `cause -> effect`, if significant.
    pub fn edge(&self, cause: &str, effect: &str) -> Option<GraphEdge> {
        let source = self.get_node(cause)?;
        let target = self.get_node(effect)?;
        self.graph
            .find_edge(source, target)
            .map(|idx| self.graph_edge(source, target, &self.graph[idx]))
    }

    pub(crate) fn graph_edge(
        &self,
        source: NodeIndex,
        target: NodeIndex,
        edge: &CausalEdge,
    ) -> GraphEdge {
        GraphEdge {
            cause: self.graph[source].name.clone(),
            effect: self.graph[target].name.clone(),
            weight: edge.weight,
            lag: edge.lag,
            p_value: edge.p_value,
            statistic: edge.statistic,
        }
    }
}
