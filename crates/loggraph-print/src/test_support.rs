use loggraph_core::{GraphEdge, InMemoryGraph};
use proptest::prelude::*;
use std::collections::BTreeSet;
use std::sync::Arc;

pub fn graph(nodes_count: usize, pairs: &[(usize, usize)]) -> Arc<InMemoryGraph> {
    Arc::new(InMemoryGraph::from_edges(nodes_count, pairs).expect("valid test graph"))
}

/// Brute-force reference for the sweep: normal edges strictly passing `row`.
pub fn crossing(pairs: &[(usize, usize)], row: usize) -> BTreeSet<GraphEdge> {
    pairs
        .iter()
        .filter(|&&(up, down)| up < row && row < down)
        .map(|&(up, down)| GraphEdge::normal(up, down))
        .collect()
}

/// Random DAG in row order: at least two rows, distinct downward edges.
pub fn dag_strategy() -> impl Strategy<Value = (usize, Vec<(usize, usize)>)> {
    (2usize..40).prop_flat_map(|nodes_count| {
        let edge = (0..nodes_count - 1).prop_flat_map(move |up| (Just(up), up + 1..nodes_count));
        (
            Just(nodes_count),
            proptest::collection::btree_set(edge, 0..nodes_count * 2),
        )
            .prop_map(|(nodes_count, edges)| (nodes_count, edges.into_iter().collect()))
    })
}
