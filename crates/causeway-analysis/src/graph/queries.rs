//! Drill-down queries: direct causes, direct effects, feedback loops.

use petgraph::algo::tarjan_scc;
use petgraph::visit::EdgeRef;
use petgraph::Direction;

use super::snapshot::GraphEdge;
use super::stable_graph::CausalGraph;

impl CausalGraph {
    /// Edges into `name`, strongest first.
    pub fn causes_of(&self, name: &str) -> Vec<GraphEdge> {
        self.neighbors(name, Direction::Incoming)
    }

    /// Edges out of `name`, strongest first.
    pub fn effects_of(&self, name: &str) -> Vec<GraphEdge> {
        self.neighbors(name, Direction::Outgoing)
    }

    /// Strongly connected components with more than one node: groups of
    /// variables that Granger-cause each other through some cycle. Names are
    /// sorted within each loop and loops are sorted.
    pub fn feedback_loops(&self) -> Vec<Vec<String>> {
        let mut loops: Vec<Vec<String>> = tarjan_scc(&self.graph)
            .into_iter()
            .filter(|scc| scc.len() > 1)
            .map(|scc| {
                let mut names: Vec<String> =
                    scc.into_iter().map(|idx| self.graph[idx].name.clone()).collect();
                names.sort();
                names
            })
            .collect();
        loops.sort();
        loops
    }

    fn neighbors(&self, name: &str, direction: Direction) -> Vec<GraphEdge> {
        let Some(idx) = self.get_node(name) else {
            return Vec::new();
        };
        let mut edges: Vec<GraphEdge> = self
            .graph
            .edges_directed(idx, direction)
            .filter_map(|e| {
                let (source, target) = self.graph.edge_endpoints(e.id())?;
                Some(self.graph_edge(source, target, e.weight()))
            })
            .collect();
        edges.sort_by(|a, b| {
            a.p_value
                .total_cmp(&b.p_value)
                .then_with(|| a.cause.cmp(&b.cause))
                .then_with(|| a.effect.cmp(&b.effect))
        });
        edges
    }
}
