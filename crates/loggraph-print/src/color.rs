use crate::layout_index::LayoutIndexes;
use loggraph_core::{GraphColorManager, GraphElement, as_normal_edge};
use std::sync::Arc;

/// Neutral color for elements nothing can be said about.
pub const DEFAULT_COLOR_ID: i32 = 0;

/// Colors every element after the branch of its "head" endpoint: the one with
/// the larger layout index. Rows that are hidden or shown elsewhere never
/// change the result, since only permanent ids and layout indices are read.
#[derive(Clone)]
pub struct ColorGetterByLayoutIndex {
    layout: LayoutIndexes,
    colors: Arc<dyn GraphColorManager>,
}

impl ColorGetterByLayoutIndex {
    pub fn new(layout: LayoutIndexes, colors: Arc<dyn GraphColorManager>) -> Self {
        Self { layout, colors }
    }

    pub fn color_id(&self, element: &GraphElement) -> i32 {
        let (up, down) = match element {
            GraphElement::Node(node) => (Some(node.node_index), Some(node.node_index)),
            GraphElement::Edge(edge) => match as_normal_edge(edge) {
                Some(normal) => (Some(normal.up), Some(normal.down)),
                None => (edge.up, edge.down),
            },
        };

        let head = match (up, down) {
            (Some(up), Some(down)) => {
                if self.layout.of_row(up) >= self.layout.of_row(down) {
                    up
                } else {
                    down
                }
            }
            (Some(index), None) | (None, Some(index)) => index,
            (None, None) => return DEFAULT_COLOR_ID,
        };

        let node_id = self.layout.graph().node_id(head);
        self.colors
            .node_color(node_id, self.layout.of_node_id(node_id))
    }
}
