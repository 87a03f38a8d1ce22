//! Converts Granger verdicts into a deterministic causal graph.

use std::collections::BTreeSet;

use causeway_core::tracing::metrics;

use super::stable_graph::{CausalEdge, CausalGraph};
use crate::granger::CausalityVerdict;

/// Builds a [`CausalGraph`]: one node per variable, one edge per
/// significant verdict. Never fails.
#[derive(Debug, Clone, Default)]
pub struct CausalGraphBuilder {
    variables: BTreeSet<String>,
}

impl CausalGraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register variables that must appear as nodes even without verdicts.
    pub fn with_variables<I, S>(mut self, variables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.variables.extend(variables.into_iter().map(Into::into));
        self
    }

    pub fn build(&self, verdicts: &[CausalityVerdict]) -> CausalGraph {
        let span = tracing::info_span!(
            "build_graph",
            verdicts = verdicts.len(),
            edge_count = tracing::field::Empty,
        );
        let _guard = span.enter();

        let mut names = self.variables.clone();
        for v in verdicts {
            names.insert(v.cause.clone());
            names.insert(v.effect.clone());
        }

        let mut graph = CausalGraph::default();
        for name in &names {
            graph.ensure_node(name);
        }

        let mut significant: Vec<&CausalityVerdict> =
            verdicts.iter().filter(|v| v.significant).collect();
        significant.sort_by(|a, b| {
            a.cause
                .cmp(&b.cause)
                .then_with(|| a.p_value.total_cmp(&b.p_value))
                .then_with(|| a.effect.cmp(&b.effect))
        });

        for v in significant {
            let source = graph.ensure_node(&v.cause);
            let target = graph.ensure_node(&v.effect);
            graph.graph.add_edge(
                source,
                target,
                CausalEdge {
                    weight: 1.0 - v.p_value,
                    lag: v.lag,
                    p_value: v.p_value,
                    statistic: v.statistic,
                },
            );
        }

        span.record(metrics::EDGE_COUNT, graph.edge_count());
        tracing::info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "causal graph built"
        );
        graph
    }
}

/// `build(verdicts)` with no extra variables.
pub fn build(verdicts: &[CausalityVerdict]) -> CausalGraph {
    CausalGraphBuilder::new().build(verdicts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphSnapshot;

    fn verdict(cause: &str, effect: &str, p_value: f64, alpha: f64) -> CausalityVerdict {
        CausalityVerdict {
            cause: cause.into(),
            effect: effect.into(),
            lag: 2,
            statistic: 5.0,
            p_value,
            significant: p_value < alpha,
            error: None,
            df_numerator: 2,
            df_denominator: 90,
            lag_profile: Vec::new(),
        }
    }

    #[test]
    fn test_empty_verdicts_keep_registered_nodes() {
        let graph = CausalGraphBuilder::new()
            .with_variables(["gold", "oil", "btc"])
            .build(&[]);
        assert_eq!(graph.nodes(), vec!["btc", "gold", "oil"]);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_one_edge_per_significant_verdict() {
        let verdicts = vec![
            verdict("a", "b", 0.01, 0.05),
            verdict("b", "a", 0.40, 0.05),
            verdict("a", "c", 0.001, 0.05),
            verdict("c", "a", 0.049, 0.05),
        ];
        let graph = build(&verdicts);
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 3);
        let edge = graph.edge("a", "b").unwrap();
        assert!((edge.weight - 0.99).abs() < 1e-12);
        assert_eq!(edge.lag, 2);
        assert!(graph.edge("b", "a").is_none());
    }

    #[test]
    fn test_edges_sorted_by_cause_then_p_value_then_effect() {
        let verdicts = vec![
            verdict("b", "a", 0.02, 0.05),
            verdict("a", "d", 0.03, 0.05),
            verdict("a", "c", 0.01, 0.05),
            verdict("a", "b", 0.03, 0.05),
        ];
        let edges = build(&verdicts).edges();
        let order: Vec<(&str, &str)> = edges
            .iter()
            .map(|e| (e.cause.as_str(), e.effect.as_str()))
            .collect();
        assert_eq!(order, vec![("a", "c"), ("a", "b"), ("a", "d"), ("b", "a")]);
    }

    #[test]
    fn test_drill_down_queries() {
        let verdicts = vec![
            verdict("rates", "stocks", 0.02, 0.05),
            verdict("oil", "stocks", 0.001, 0.05),
            verdict("stocks", "rates", 0.03, 0.05),
            verdict("stocks", "oil", 0.5, 0.05),
        ];
        let graph = build(&verdicts);

        let causes: Vec<String> = graph.causes_of("stocks").into_iter().map(|e| e.cause).collect();
        assert_eq!(causes, vec!["oil", "rates"]);

        let effects: Vec<String> = graph.effects_of("stocks").into_iter().map(|e| e.effect).collect();
        assert_eq!(effects, vec!["rates"]);

        assert_eq!(graph.feedback_loops(), vec![vec!["rates".to_string(), "stocks".to_string()]]);
        assert!(graph.causes_of("unknown").is_empty());
    }

    #[test]
    fn test_snapshot_serializes_for_display() {
        let graph = CausalGraphBuilder::new()
            .with_variables(["x"])
            .build(&[verdict("y", "z", 0.01, 0.05)]);
        let snapshot = graph.snapshot();
        assert_eq!(snapshot.nodes, vec!["x", "y", "z"]);
        let json = snapshot.to_json().unwrap();
        assert!(json.contains("\"cause\": \"y\""));
        assert_eq!(GraphSnapshot::from_json(&json).unwrap(), snapshot);
    }
}
