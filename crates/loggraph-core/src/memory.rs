//! Vector-backed graph implementing every collaborator trait at once.
//!
//! Real hosts plug in their own log graph; this one backs tests, benches and
//! small embedders.

use crate::error::GraphBuildError;
use crate::graph::{EdgeFilter, GraphColorManager, LinearGraph, PermanentGraphLayout};
use crate::{EdgeType, GraphEdge, NodeId};
use std::collections::HashMap;

const DEFAULT_PALETTE_SIZE: i32 = 8;

#[derive(Debug, Clone)]
pub struct InMemoryGraph {
    node_ids: Vec<NodeId>,
    adjacency: Vec<Vec<GraphEdge>>,
    layout: HashMap<NodeId, i32>,
    palette_size: i32,
}

impl InMemoryGraph {
    /// Graph with only normal edges, node ids equal to rows and one branch column per row.
    pub fn from_edges(nodes_count: usize, edges: &[(usize, usize)]) -> Result<Self, GraphBuildError> {
        let mut builder = InMemoryGraphBuilder::new(nodes_count);
        for &(up, down) in edges {
            builder.add_edge(up, down)?;
        }
        Ok(builder.build())
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency
            .iter()
            .enumerate()
            .flat_map(|(index, edges)| edges.iter().map(move |edge| (index, edge)))
            .filter(|(index, edge)| edge.anchor_node_index() == Some(*index))
            .count()
    }

    pub fn palette_size(&self) -> i32 {
        self.palette_size
    }
}

impl LinearGraph for InMemoryGraph {
    fn nodes_count(&self) -> usize {
        self.node_ids.len()
    }

    fn adjacent_edges(&self, node_index: usize, filter: EdgeFilter) -> Vec<GraphEdge> {
        match self.adjacency.get(node_index) {
            Some(edges) => edges
                .iter()
                .filter(|edge| filter.accepts(edge, node_index))
                .copied()
                .collect(),
            None => {
                tracing::warn!(
                    "Adjacency requested for row {} outside 0..{}",
                    node_index,
                    self.node_ids.len()
                );
                Vec::new()
            }
        }
    }

    fn node_id(&self, node_index: usize) -> NodeId {
        self.node_ids
            .get(node_index)
            .copied()
            .unwrap_or(NodeId::NOT_LOADED)
    }
}

impl PermanentGraphLayout for InMemoryGraph {
    fn layout_index(&self, node_id: NodeId) -> Option<i32> {
        self.layout.get(&node_id).copied()
    }
}

impl GraphColorManager for InMemoryGraph {
    fn node_color(&self, node_id: NodeId, layout_index: i32) -> i32 {
        if node_id.is_sentinel() || layout_index < 0 {
            return 0;
        }
        layout_index % self.palette_size + 1
    }
}

#[derive(Debug, Clone)]
pub struct InMemoryGraphBuilder {
    node_ids: Vec<NodeId>,
    adjacency: Vec<Vec<GraphEdge>>,
    layout: HashMap<NodeId, i32>,
    palette_size: i32,
}

impl InMemoryGraphBuilder {
    pub fn new(nodes_count: usize) -> Self {
        Self {
            node_ids: (0..nodes_count).map(|i| NodeId(i as i32)).collect(),
            adjacency: vec![Vec::new(); nodes_count],
            layout: HashMap::new(),
            palette_size: DEFAULT_PALETTE_SIZE,
        }
    }

    /// Replaces the permanent id shown at `row`.
    pub fn node_id(&mut self, row: usize, id: NodeId) -> &mut Self {
        if let Some(slot) = self.node_ids.get_mut(row) {
            *slot = id;
        } else {
            tracing::warn!("Ignoring node id {} for missing row {}", id, row);
        }
        self
    }

    /// Commits without an explicit layout index get their own id as column.
    pub fn layout_index(&mut self, id: NodeId, layout_index: i32) -> &mut Self {
        self.layout.insert(id, layout_index);
        self
    }

    pub fn palette_size(&mut self, palette_size: i32) -> &mut Self {
        self.palette_size = palette_size.max(1);
        self
    }

    pub fn add_edge(&mut self, up: usize, down: usize) -> Result<&mut Self, GraphBuildError> {
        self.add_normal(up, down, EdgeType::Usual)
    }

    /// Collapsed edge standing for hidden commits between `up` and `down`.
    pub fn add_dotted_edge(&mut self, up: usize, down: usize) -> Result<&mut Self, GraphBuildError> {
        self.add_normal(up, down, EdgeType::Dotted)
    }

    /// Edge leaving `row` towards a commit that is not loaded.
    pub fn add_not_loaded_edge(
        &mut self,
        row: usize,
        target: NodeId,
    ) -> Result<&mut Self, GraphBuildError> {
        self.add_special(
            row,
            GraphEdge::new(Some(row), None, Some(target), EdgeType::NotLoadCommit),
        )
    }

    pub fn add_arrow_edge(
        &mut self,
        row: usize,
        edge_type: EdgeType,
    ) -> Result<&mut Self, GraphBuildError> {
        let edge = match edge_type {
            EdgeType::DottedArrowUp => GraphEdge::new(None, Some(row), None, edge_type),
            EdgeType::DottedArrowDown | EdgeType::NotLoadCommit => {
                GraphEdge::new(Some(row), None, None, edge_type)
            }
            EdgeType::Usual | EdgeType::Dotted => {
                return Err(GraphBuildError::NormalTypeOnSpecialEdge { row, edge_type });
            }
        };
        self.add_special(row, edge)
    }

    pub fn build(&self) -> InMemoryGraph {
        let mut layout = self.layout.clone();
        for id in self.node_ids.iter().filter(|id| !id.is_sentinel()) {
            layout.entry(*id).or_insert(id.0);
        }
        InMemoryGraph {
            node_ids: self.node_ids.clone(),
            adjacency: self.adjacency.clone(),
            layout,
            palette_size: self.palette_size,
        }
    }

    fn add_normal(
        &mut self,
        up: usize,
        down: usize,
        edge_type: EdgeType,
    ) -> Result<&mut Self, GraphBuildError> {
        let nodes_count = self.node_ids.len();
        if up >= nodes_count || down >= nodes_count {
            return Err(GraphBuildError::RowOutOfRange {
                up,
                down,
                nodes_count,
            });
        }
        if up >= down {
            return Err(GraphBuildError::NotDownward { up, down });
        }
        let edge = GraphEdge::new(Some(up), Some(down), None, edge_type);
        self.adjacency[up].push(edge);
        self.adjacency[down].push(edge);
        Ok(self)
    }

    fn add_special(&mut self, row: usize, edge: GraphEdge) -> Result<&mut Self, GraphBuildError> {
        let nodes_count = self.node_ids.len();
        if row >= nodes_count {
            return Err(GraphBuildError::RowOutOfRange {
                up: row,
                down: row,
                nodes_count,
            });
        }
        self.adjacency[row].push(edge);
        Ok(self)
    }
}
