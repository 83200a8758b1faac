//! Left-to-right order of the elements sharing a row.

use crate::layout_index::LayoutIndexes;
use loggraph_core::{GraphEdge, GraphElement, NodeId, as_normal_edge};
use std::cmp::Ordering;

#[derive(Clone)]
pub struct GraphElementComparatorByLayoutIndex {
    layout: LayoutIndexes,
}

impl GraphElementComparatorByLayoutIndex {
    pub fn new(layout: LayoutIndexes) -> Self {
        Self { layout }
    }

    pub fn compare(&self, a: &GraphElement, b: &GraphElement) -> Ordering {
        match (a, b) {
            (GraphElement::Edge(first), GraphElement::Edge(second)) => {
                self.compare_edges(first, second)
            }
            (GraphElement::Edge(edge), GraphElement::Node(node)) => {
                self.compare_edge_with_node(edge, node.node_index)
            }
            (GraphElement::Node(node), GraphElement::Edge(edge)) => {
                self.compare_edge_with_node(edge, node.node_index).reverse()
            }
            // A row holds a single node; this only keeps the order total.
            (GraphElement::Node(first), GraphElement::Node(second)) => {
                first.node_index.cmp(&second.node_index)
            }
        }
    }

    fn compare_edges(&self, first: &GraphEdge, second: &GraphEdge) -> Ordering {
        let Some(first_normal) = as_normal_edge(first) else {
            return match first.anchor_node_index() {
                Some(anchor) => self.compare_edge_with_node(second, anchor).reverse(),
                None => Ordering::Less,
            };
        };
        let Some(second_normal) = as_normal_edge(second) else {
            return match second.anchor_node_index() {
                Some(anchor) => self.compare_edge_with_node(first, anchor),
                None => Ordering::Greater,
            };
        };

        if first_normal.up == second_normal.up {
            let first_down = self.layout.of_row(first_normal.down);
            let second_down = self.layout.of_row(second_normal.down);
            return first_down
                .cmp(&second_down)
                .then(first_normal.down.cmp(&second_normal.down));
        }

        if first_normal.up < second_normal.up {
            self.compare_edge_with_node(first, second_normal.up)
        } else {
            self.compare_edge_with_node(second, first_normal.up)
                .reverse()
        }
    }

    fn compare_edge_with_node(&self, edge: &GraphEdge, node_index: usize) -> Ordering {
        let node_layout = self.layout.of_row(node_index);
        let Some(normal) = as_normal_edge(edge) else {
            let anchor_layout = edge
                .anchor_node_index()
                .map_or(NodeId::NOT_LOADED.0, |anchor| {
                    self.layout.of_row(anchor)
                });
            return anchor_layout.cmp(&node_layout);
        };

        let edge_layout = self
            .layout
            .of_row(normal.up)
            .max(self.layout.of_row(normal.down));
        edge_layout
            .cmp(&node_layout)
            .then(normal.up.cmp(&node_index))
    }
}
