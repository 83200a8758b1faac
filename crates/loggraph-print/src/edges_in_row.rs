//! Sweep-line answer to "which edges pass through row R".
//!
//! Edge sets are cached at block-aligned checkpoints above and below the
//! queried row and walked one row at a time towards it. A checkpoint that is not
//! cached is rebuilt from the nearest cached checkpoint within `walk_size` rows,
//! or from an empty set `walk_size` rows away. Either way only edges with their
//! far endpoint inside that window are kept, so an answer never depends on what
//! was queried before.

use crate::settings::SweepSettings;
use crate::slru::SlruMap;
use loggraph_core::{EdgeFilter, GraphEdge, LinearGraph};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Normal edges passing strictly through `row` (`up < row < down`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphEdges {
    edges: BTreeSet<GraphEdge>,
    row: usize,
}

impl GraphEdges {
    fn empty(row: usize) -> Self {
        Self {
            edges: BTreeSet::new(),
            row,
        }
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn edges(&self) -> &BTreeSet<GraphEdge> {
        &self.edges
    }

    /// Owned copy of a cached entry. Walks mutate their set in place, so
    /// nothing may leave a cache without going through here.
    fn checkout(&self) -> GraphEdges {
        GraphEdges {
            edges: self.edges.clone(),
            row: self.row,
        }
    }
}

pub struct EdgesInRowGenerator {
    graph: Arc<dyn LinearGraph>,
    block_size: usize,
    walk_size: usize,
    up_neighbors: SlruMap<usize, GraphEdges>,
    down_neighbors: SlruMap<usize, GraphEdges>,
}

impl EdgesInRowGenerator {
    pub fn new(graph: Arc<dyn LinearGraph>) -> Self {
        Self::with_settings(graph, &SweepSettings::default())
    }

    pub fn with_settings(graph: Arc<dyn LinearGraph>, settings: &SweepSettings) -> Self {
        let capacity = settings.cache_capacity;
        Self {
            graph,
            block_size: settings.block_size.max(1),
            walk_size: settings.walk_size,
            up_neighbors: SlruMap::new(capacity, capacity.saturating_mul(2)),
            down_neighbors: SlruMap::new(capacity, capacity.saturating_mul(2)),
        }
    }

    /// Normal edges passing through `row` without touching its node.
    pub fn edges_in_row(&mut self, row: usize) -> BTreeSet<GraphEdge> {
        let (forward, backward) = self.walks_to(row);
        let mut result = forward.edges;
        result.extend(backward.edges);
        result
    }

    /// Normal edges crossing the gap between `row` and `row + 1`.
    pub fn edges_below_row(&mut self, row: usize) -> BTreeSet<GraphEdge> {
        let mut result = self.edges_in_row(row);
        if row < self.graph.nodes_count() {
            result.extend(self.graph.adjacent_edges(row, EdgeFilter::NORMAL_DOWN));
        }
        result
    }

    pub fn invalidate(&mut self) {
        tracing::debug!(
            "Invalidating edge sweep caches ({} checkpoints)",
            self.cached_checkpoints()
        );
        self.up_neighbors.clear();
        self.down_neighbors.clear();
    }

    pub fn cached_checkpoints(&self) -> usize {
        self.up_neighbors.len() + self.down_neighbors.len()
    }

    /// Most checkpoints both caches can hold together.
    pub fn cache_capacity(&self) -> usize {
        self.up_neighbors
            .capacity()
            .saturating_add(self.down_neighbors.capacity())
    }

    /// Result of the walk down from the checkpoint above `row` and of the walk
    /// up from the checkpoint below it.
    pub(crate) fn walks_to(&mut self, row: usize) -> (GraphEdges, GraphEdges) {
        let nodes_count = self.graph.nodes_count();
        if row >= nodes_count {
            tracing::warn!("Edges requested for row {} outside 0..{}", row, nodes_count);
            return (GraphEdges::empty(row), GraphEdges::empty(row));
        }

        let mut forward = self.up_neighbor(row);
        while forward.row < row {
            forward = self.one_down_step(forward);
        }

        let mut backward = self.down_neighbor(row);
        while backward.row > row {
            backward = self.one_up_step(backward);
        }

        (forward, backward)
    }

    fn up_neighbor(&mut self, row: usize) -> GraphEdges {
        let checkpoint = (row / self.block_size) * self.block_size;
        if let Some(cached) = self.up_neighbors.get(&checkpoint) {
            tracing::trace!("Up checkpoint {} served from cache", checkpoint);
            return cached.checkout();
        }
        let computed = self.compute_up_neighbor(checkpoint);
        let result = computed.checkout();
        self.up_neighbors.put(checkpoint, computed);
        result
    }

    fn down_neighbor(&mut self, row: usize) -> GraphEdges {
        let checkpoint = (row / self.block_size + 1) * self.block_size;
        let nodes_count = self.graph.nodes_count();
        if checkpoint >= nodes_count {
            return GraphEdges::empty(nodes_count.saturating_sub(1));
        }
        if let Some(cached) = self.down_neighbors.get(&checkpoint) {
            tracing::trace!("Down checkpoint {} served from cache", checkpoint);
            return cached.checkout();
        }
        let computed = self.compute_down_neighbor(checkpoint);
        let result = computed.checkout();
        self.down_neighbors.put(checkpoint, computed);
        result
    }

    /// Walks down to `checkpoint` from the nearest cached up checkpoint within
    /// `walk_size`, or from an empty set `walk_size` rows above it. Edges
    /// starting above that window are dropped either way.
    fn compute_up_neighbor(&mut self, checkpoint: usize) -> GraphEdges {
        let start = checkpoint.saturating_sub(self.walk_size);
        let mut edges = match self.cached_checkpoint_above(checkpoint) {
            Some(seed) => {
                tracing::debug!(
                    "Rebuilding up checkpoint {} from cached row {}",
                    checkpoint,
                    seed.row
                );
                seed
            }
            None => {
                tracing::debug!("Rebuilding up checkpoint {} from row {}", checkpoint, start);
                GraphEdges::empty(start)
            }
        };
        while edges.row < checkpoint {
            edges = self.one_down_step(edges);
        }
        edges.edges.retain(|edge| edge.up.is_some_and(|up| up >= start));
        edges
    }

    fn compute_down_neighbor(&mut self, checkpoint: usize) -> GraphEdges {
        let last_row = self.graph.nodes_count().saturating_sub(1);
        let start = checkpoint.saturating_add(self.walk_size).min(last_row);
        let mut edges = match self.cached_checkpoint_below(checkpoint) {
            Some(seed) => {
                tracing::debug!(
                    "Rebuilding down checkpoint {} from cached row {}",
                    checkpoint,
                    seed.row
                );
                seed
            }
            None => {
                tracing::debug!("Rebuilding down checkpoint {} from row {}", checkpoint, start);
                GraphEdges::empty(start)
            }
        };
        while edges.row > checkpoint {
            edges = self.one_up_step(edges);
        }
        edges.edges.retain(|edge| edge.down.is_some_and(|down| down <= start));
        edges
    }

    fn cached_checkpoint_above(&mut self, checkpoint: usize) -> Option<GraphEdges> {
        let mut candidate = checkpoint;
        while candidate >= self.block_size
            && checkpoint - (candidate - self.block_size) <= self.walk_size
        {
            candidate -= self.block_size;
            if let Some(cached) = self.up_neighbors.get(&candidate) {
                return Some(cached.checkout());
            }
        }
        None
    }

    fn cached_checkpoint_below(&mut self, checkpoint: usize) -> Option<GraphEdges> {
        let nodes_count = self.graph.nodes_count();
        let mut candidate = checkpoint;
        loop {
            candidate = candidate.checked_add(self.block_size)?;
            if candidate >= nodes_count || candidate - checkpoint > self.walk_size {
                return None;
            }
            if let Some(cached) = self.down_neighbors.get(&candidate) {
                return Some(cached.checkout());
            }
        }
    }

    fn one_down_step(&self, mut edges: GraphEdges) -> GraphEdges {
        let row = edges.row;
        edges
            .edges
            .extend(self.graph.adjacent_edges(row, EdgeFilter::NORMAL_DOWN));
        for edge in self.graph.adjacent_edges(row + 1, EdgeFilter::NORMAL_UP) {
            edges.edges.remove(&edge);
        }
        edges.row = row + 1;
        edges
    }

    fn one_up_step(&self, mut edges: GraphEdges) -> GraphEdges {
        let row = edges.row;
        edges
            .edges
            .extend(self.graph.adjacent_edges(row, EdgeFilter::NORMAL_UP));
        for edge in self.graph.adjacent_edges(row - 1, EdgeFilter::NORMAL_DOWN) {
            edges.edges.remove(&edge);
        }
        edges.row = row - 1;
        edges
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use crate::test_support::{crossing, dag_strategy, graph};
    use proptest::prelude::*;

    proptest! {
        /// A warm cache never changes an answer.
        #[test]
        fn prop_cold_and_warm_queries_agree(
            (nodes_count, pairs) in dag_strategy(),
            block_size in 1usize..9,
            warmup in proptest::collection::vec(0usize..64, 0..24),
            queried in 0usize..64,
        ) {
            let queried = queried % nodes_count;
            let settings = SweepSettings { block_size, walk_size: 1000, cache_capacity: 2 };
            let shared = graph(nodes_count, &pairs);

            let mut cold = EdgesInRowGenerator::with_settings(shared.clone(), &settings);
            let mut warm = EdgesInRowGenerator::with_settings(shared, &settings);
            for row in warmup {
                warm.edges_in_row(row % nodes_count);
            }

            let expected = crossing(&pairs, queried);
            prop_assert_eq!(cold.edges_in_row(queried), expected.clone());
            prop_assert_eq!(warm.edges_in_row(queried), expected);
        }

        /// The walk down and the walk up reach the same set.
        #[test]
        fn prop_forward_and_backward_walks_agree(
            (nodes_count, pairs) in dag_strategy(),
            block_size in 1usize..9,
        ) {
            let settings = SweepSettings { block_size, walk_size: 1000, cache_capacity: 4 };
            let mut generator = EdgesInRowGenerator::with_settings(graph(nodes_count, &pairs), &settings);
            for row in 0..nodes_count {
                let (forward, backward) = generator.walks_to(row);
                prop_assert_eq!(forward.edges(), backward.edges(), "row {}", row);
            }
        }

        /// A checkpoint rebuilt from a cached neighbour equals one rebuilt
        /// from scratch, even when walks are shorter than some edges.
        #[test]
        fn prop_seeded_rebuild_matches_cold_rebuild(
            (nodes_count, pairs) in dag_strategy(),
            block_size in 1usize..6,
            walk_size in 0usize..12,
            warmup in proptest::collection::vec(0usize..64, 0..24),
            queried in 0usize..64,
        ) {
            let queried = queried % nodes_count;
            let settings = SweepSettings { block_size, walk_size, cache_capacity: 3 };
            let shared = graph(nodes_count, &pairs);

            let mut cold = EdgesInRowGenerator::with_settings(shared.clone(), &settings);
            let mut warm = EdgesInRowGenerator::with_settings(shared, &settings);
            for row in warmup {
                warm.edges_in_row(row % nodes_count);
            }
            prop_assert_eq!(warm.walks_to(queried), cold.walks_to(queried));
        }

        /// Stepping down and back up restores the edge set.
        #[test]
        fn prop_steps_are_reversible(
            (nodes_count, pairs) in dag_strategy(),
            queried in 0usize..64,
        ) {
            let row = queried % (nodes_count - 1);
            let generator = EdgesInRowGenerator::new(graph(nodes_count, &pairs));
            let start = GraphEdges { edges: crossing(&pairs, row), row };

            let down = generator.one_down_step(start.checkout());
            prop_assert_eq!(down.row(), row + 1);
            prop_assert_eq!(down.edges(), &crossing(&pairs, row + 1));
            prop_assert_eq!(generator.one_up_step(down), start);
        }
    }
}
