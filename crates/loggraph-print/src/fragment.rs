use loggraph_core::{GraphElement, LinearGraph};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Rows `up_node_index..=down_node_index` delimiting a same-branch run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GraphFragment {
    pub up_node_index: usize,
    pub down_node_index: usize,
}

/// Finds the run of commits a hovered element belongs to.
pub trait FragmentGenerator: Send + Sync {
    fn relative_fragment(&self, element: &GraphElement) -> Option<GraphFragment>;

    /// Every node lying on a path from the fragment's top to its bottom.
    fn all_nodes(&self, fragment: &GraphFragment) -> BTreeSet<usize>;
}

/// Extends an element up and down for as long as the history stays a plain
/// chain: one parent above, one child below.
pub struct LinearFragmentGenerator {
    graph: Arc<dyn LinearGraph>,
    max_walk: usize,
}

impl LinearFragmentGenerator {
    pub const DEFAULT_MAX_WALK: usize = 1000;

    pub fn new(graph: Arc<dyn LinearGraph>) -> Self {
        Self::with_max_walk(graph, Self::DEFAULT_MAX_WALK)
    }

    pub fn with_max_walk(graph: Arc<dyn LinearGraph>, max_walk: usize) -> Self {
        Self { graph, max_walk }
    }

    fn single(nodes: Vec<usize>) -> Option<usize> {
        match nodes.as_slice() {
            [only] => Some(*only),
            _ => None,
        }
    }

    fn walk_up(&self, mut current: usize) -> usize {
        for _ in 0..self.max_walk {
            let Some(parent) = Self::single(self.graph.up_nodes(current)) else {
                break;
            };
            if Self::single(self.graph.down_nodes(parent)) != Some(current) {
                break;
            }
            current = parent;
        }
        current
    }

    fn walk_down(&self, mut current: usize) -> usize {
        for _ in 0..self.max_walk {
            let Some(child) = Self::single(self.graph.down_nodes(current)) else {
                break;
            };
            if Self::single(self.graph.up_nodes(child)) != Some(current) {
                break;
            }
            current = child;
        }
        current
    }

    fn reachable(
        &self,
        start: usize,
        neighbours: impl Fn(usize) -> Vec<usize>,
        within: impl Fn(usize) -> bool,
    ) -> BTreeSet<usize> {
        let mut seen = BTreeSet::new();
        let mut stack = vec![start];
        while let Some(node) = stack.pop() {
            if !within(node) || !seen.insert(node) {
                continue;
            }
            stack.extend(neighbours(node));
        }
        seen
    }
}

impl FragmentGenerator for LinearFragmentGenerator {
    fn relative_fragment(&self, element: &GraphElement) -> Option<GraphFragment> {
        let (up, down) = match element {
            GraphElement::Node(node) => (node.node_index, node.node_index),
            GraphElement::Edge(edge) => match (edge.up, edge.down) {
                (Some(up), Some(down)) => (up, down),
                (Some(index), None) | (None, Some(index)) => (index, index),
                (None, None) => return None,
            },
        };
        if down >= self.graph.nodes_count() {
            return None;
        }
        Some(GraphFragment {
            up_node_index: self.walk_up(up),
            down_node_index: self.walk_down(down),
        })
    }

    fn all_nodes(&self, fragment: &GraphFragment) -> BTreeSet<usize> {
        let range = fragment.up_node_index..=fragment.down_node_index;
        let from_top = self.reachable(
            fragment.up_node_index,
            |node| self.graph.down_nodes(node),
            |node| range.contains(&node),
        );
        let from_bottom = self.reachable(
            fragment.down_node_index,
            |node| self.graph.up_nodes(node),
            |node| range.contains(&node),
        );
        from_top.intersection(&from_bottom).copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::graph;
    use loggraph_core::{GraphEdge, GraphNode};

    /// 0 - 1 - 2 - 3 is a chain; 3 forks into 4 and 5 which merge at 6.
    fn forked() -> LinearFragmentGenerator {
        LinearFragmentGenerator::new(graph(
            7,
            &[(0, 1), (1, 2), (2, 3), (3, 4), (3, 5), (4, 6), (5, 6)],
        ))
    }

    #[test]
    fn test_node_fragment_covers_chain() {
        let generator = forked();
        let fragment = generator
            .relative_fragment(&GraphElement::Node(GraphNode::new(1)))
            .expect("fragment");
        assert_eq!(
            fragment,
            GraphFragment {
                up_node_index: 0,
                down_node_index: 3
            }
        );
        assert_eq!(generator.all_nodes(&fragment), BTreeSet::from([0, 1, 2, 3]));
    }

    #[test]
    fn test_fork_stops_walks() {
        let generator = forked();
        let fragment = generator
            .relative_fragment(&GraphElement::Edge(GraphEdge::normal(3, 4)))
            .expect("fragment");
        assert_eq!(fragment.up_node_index, 0);
        assert_eq!(fragment.down_node_index, 4);
        assert_eq!(generator.all_nodes(&fragment), BTreeSet::from([0, 1, 2, 3, 4]));
    }

    #[test]
    fn test_all_nodes_skips_side_branches() {
        let generator = forked();
        let fragment = GraphFragment {
            up_node_index: 3,
            down_node_index: 6,
        };
        assert_eq!(generator.all_nodes(&fragment), BTreeSet::from([3, 4, 5, 6]));
        let partial = GraphFragment {
            up_node_index: 4,
            down_node_index: 6,
        };
        assert_eq!(generator.all_nodes(&partial), BTreeSet::from([4, 6]));
    }

    #[test]
    fn test_max_walk_bounds_fragment() {
        let generator = LinearFragmentGenerator::with_max_walk(
            graph(6, &[(0, 1), (1, 2), (2, 3), (3, 4), (4, 5)]),
            1,
        );
        let fragment = generator
            .relative_fragment(&GraphElement::Node(GraphNode::new(3)))
            .expect("fragment");
        assert_eq!(fragment.up_node_index, 2);
        assert_eq!(fragment.down_node_index, 4);
    }
}
