use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub mod error;
pub mod graph;
pub mod memory;

pub use error::{GraphBuildError, PrintError};
pub use graph::{
    EdgeFilter, GraphColorManager, LinearGraph, PermanentGraphLayout, is_edge_down, is_edge_up,
};
pub use memory::{InMemoryGraph, InMemoryGraphBuilder};

/// Permanent commit id. Survives filtering, unlike a row's node index.
///
/// Negative values are boundary sentinels; their layout index is the id itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub i32);

impl NodeId {
    /// Stands in for an endpoint that is not part of the loaded graph.
    pub const NOT_LOADED: NodeId = NodeId(-1);

    pub fn is_sentinel(&self) -> bool {
        self.0 < 0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(i32)]
pub enum EdgeType {
    /// Plain parent/child connection.
    Usual,
    /// Collapsed edge standing in for a run of hidden commits.
    Dotted,
    /// Edge going down to a commit that is not loaded.
    NotLoadCommit,
    /// Arrow stub pointing up, without a loaded upper endpoint.
    DottedArrowUp,
    /// Arrow stub pointing down, without a loaded lower endpoint.
    DottedArrowDown,
}

impl EdgeType {
    /// Normal edges always carry both endpoints.
    pub fn is_normal_edge(&self) -> bool {
        matches!(self, EdgeType::Usual | EdgeType::Dotted)
    }
}

/// Error type for enum conversion failures
#[derive(Error, Debug, Clone)]
pub enum EnumConversionError {
    #[error("Invalid EdgeType value: {0}")]
    InvalidEdgeType(i32),
}

impl TryFrom<i32> for EdgeType {
    type Error = EnumConversionError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(EdgeType::Usual),
            1 => Ok(EdgeType::Dotted),
            2 => Ok(EdgeType::NotLoadCommit),
            3 => Ok(EdgeType::DottedArrowUp),
            4 => Ok(EdgeType::DottedArrowDown),
            _ => Err(EnumConversionError::InvalidEdgeType(value)),
        }
    }
}

/// An edge between two rows. A `None` endpoint lies outside the loaded graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GraphEdge {
    pub up: Option<usize>,
    pub down: Option<usize>,
    /// Permanent id of the commit a `NotLoadCommit` edge leads to.
    pub target_id: Option<NodeId>,
    pub edge_type: EdgeType,
}

impl GraphEdge {
    pub fn new(
        up: Option<usize>,
        down: Option<usize>,
        target_id: Option<NodeId>,
        edge_type: EdgeType,
    ) -> Self {
        Self {
            up,
            down,
            target_id,
            edge_type,
        }
    }

    pub fn normal(up: usize, down: usize) -> Self {
        Self::new(Some(up), Some(down), None, EdgeType::Usual)
    }

    pub fn dotted(up: usize, down: usize) -> Self {
        Self::new(Some(up), Some(down), None, EdgeType::Dotted)
    }

    /// Whichever endpoint is loaded, preferring the upper one.
    pub fn anchor_node_index(&self) -> Option<usize> {
        self.up.or(self.down)
    }
}

impl fmt::Display for GraphEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let show = |index: Option<usize>| index.map_or_else(|| "?".to_string(), |i| i.to_string());
        write!(
            f,
            "{:?}({} -> {})",
            self.edge_type,
            show(self.up),
            show(self.down)
        )
    }
}

/// Endpoints of an edge whose type is normal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NormalEdge {
    pub up: usize,
    pub down: usize,
}

impl NormalEdge {
    pub fn len(&self) -> usize {
        self.down.saturating_sub(self.up)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub fn as_normal_edge(edge: &GraphEdge) -> Option<NormalEdge> {
    if !edge.edge_type.is_normal_edge() {
        return None;
    }
    match (edge.up, edge.down) {
        (Some(up), Some(down)) => Some(NormalEdge { up, down }),
        _ => {
            tracing::warn!("Normal edge {} is missing an endpoint", edge);
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GraphNode {
    pub node_index: usize,
}

impl GraphNode {
    pub fn new(node_index: usize) -> Self {
        Self { node_index }
    }
}

/// The semantic object a drawable corresponds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum GraphElement {
    Node(GraphNode),
    Edge(GraphEdge),
}

impl GraphElement {
    /// Upper and lower node of the element; a node is both.
    pub fn endpoints(&self) -> (Option<usize>, Option<usize>) {
        match self {
            GraphElement::Node(node) => (Some(node.node_index), Some(node.node_index)),
            GraphElement::Edge(edge) => (edge.up, edge.down),
        }
    }
}

impl From<GraphNode> for GraphElement {
    fn from(node: GraphNode) -> Self {
        GraphElement::Node(node)
    }
}

impl From<GraphEdge> for GraphElement {
    fn from(edge: GraphEdge) -> Self {
        GraphElement::Edge(edge)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_type_conversion() {
        assert_eq!(EdgeType::try_from(1).ok(), Some(EdgeType::Dotted));
        assert!(matches!(
            EdgeType::try_from(9),
            Err(EnumConversionError::InvalidEdgeType(9))
        ));
    }

    #[test]
    fn test_normal_edge_detection() {
        assert_eq!(
            as_normal_edge(&GraphEdge::dotted(2, 7)),
            Some(NormalEdge { up: 2, down: 7 })
        );
        let stub = GraphEdge::new(Some(3), None, Some(NodeId(42)), EdgeType::NotLoadCommit);
        assert_eq!(as_normal_edge(&stub), None);
        assert_eq!(stub.anchor_node_index(), Some(3));
    }

    #[test]
    fn test_graph_element_serialization() {
        let element = GraphElement::from(GraphEdge::normal(0, 4));
        let json = serde_json::to_string(&element).expect("serialize");
        let back: GraphElement = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, element);
        assert_eq!(element.endpoints(), (Some(0), Some(4)));
    }
}
