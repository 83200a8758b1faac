//! Collaborator contracts consumed by the print layer.
//!
//! The graph builder, the permanent layout and the branch color policy all live
//! outside this workspace; these traits are the only view the printer has of them.

use crate::{GraphEdge, GraphNode, NodeId};
use serde::{Deserialize, Serialize};

/// Selects which adjacent edges of a node are returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdgeFilter {
    pub special: bool,
    pub normal_up: bool,
    pub normal_down: bool,
}

impl EdgeFilter {
    pub const ALL: EdgeFilter = EdgeFilter::new(true, true, true);
    pub const NORMAL_ALL: EdgeFilter = EdgeFilter::new(false, true, true);
    pub const NORMAL_UP: EdgeFilter = EdgeFilter::new(false, true, false);
    pub const NORMAL_DOWN: EdgeFilter = EdgeFilter::new(false, false, true);
    pub const SPECIAL: EdgeFilter = EdgeFilter::new(true, false, false);

    pub const fn new(special: bool, normal_up: bool, normal_down: bool) -> Self {
        Self {
            special,
            normal_up,
            normal_down,
        }
    }

    /// Whether `edge`, seen from `node_index`, passes this filter.
    pub fn accepts(&self, edge: &GraphEdge, node_index: usize) -> bool {
        if !edge.edge_type.is_normal_edge() {
            return self.special;
        }
        (self.normal_up && is_edge_up(edge, node_index))
            || (self.normal_down && is_edge_down(edge, node_index))
    }
}

/// Read-only accessor for the row-linearized, possibly filtered graph.
pub trait LinearGraph: Send + Sync {
    fn nodes_count(&self) -> usize;

    /// Edges touching `node_index`, restricted by `filter`.
    fn adjacent_edges(&self, node_index: usize, filter: EdgeFilter) -> Vec<GraphEdge>;

    /// Permanent id of the commit shown at `node_index`.
    fn node_id(&self, node_index: usize) -> NodeId;

    fn graph_node(&self, node_index: usize) -> GraphNode {
        GraphNode::new(node_index)
    }

    fn up_nodes(&self, node_index: usize) -> Vec<usize> {
        self.adjacent_edges(node_index, EdgeFilter::NORMAL_UP)
            .into_iter()
            .filter_map(|edge| edge.up)
            .collect()
    }

    fn down_nodes(&self, node_index: usize) -> Vec<usize> {
        self.adjacent_edges(node_index, EdgeFilter::NORMAL_DOWN)
            .into_iter()
            .filter_map(|edge| edge.down)
            .collect()
    }
}

/// Branch column assignment of the unfiltered graph.
pub trait PermanentGraphLayout: Send + Sync {
    /// `None` when the commit is not part of the layout.
    fn layout_index(&self, node_id: NodeId) -> Option<i32>;
}

/// External branch color policy.
pub trait GraphColorManager: Send + Sync {
    fn node_color(&self, node_id: NodeId, layout_index: i32) -> i32;
}

/// `edge` arrives at `node_index` from above.
pub fn is_edge_up(edge: &GraphEdge, node_index: usize) -> bool {
    edge.down == Some(node_index)
}

/// `edge` leaves `node_index` going down.
pub fn is_edge_down(edge: &GraphEdge, node_index: usize) -> bool {
    edge.up == Some(node_index)
}
