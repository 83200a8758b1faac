use loggraph_core::{LinearGraph, NodeId, PermanentGraphLayout};
use std::sync::Arc;

/// Resolves rows to the branch column of the permanent layout.
#[derive(Clone)]
pub struct LayoutIndexes {
    graph: Arc<dyn LinearGraph>,
    layout: Arc<dyn PermanentGraphLayout>,
}

impl LayoutIndexes {
    pub fn new(graph: Arc<dyn LinearGraph>, layout: Arc<dyn PermanentGraphLayout>) -> Self {
        Self { graph, layout }
    }

    pub fn graph(&self) -> &Arc<dyn LinearGraph> {
        &self.graph
    }

    /// Sentinel ids map to themselves, so boundary elements sort before every
    /// real branch. Commits missing from the layout are treated the same way.
    pub fn of_node_id(&self, node_id: NodeId) -> i32 {
        if node_id.is_sentinel() {
            return node_id.0;
        }
        self.layout
            .layout_index(node_id)
            .unwrap_or(NodeId::NOT_LOADED.0)
    }

    pub fn of_row(&self, node_index: usize) -> i32 {
        self.of_node_id(self.graph.node_id(node_index))
    }
}
