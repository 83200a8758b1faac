use crate::comparator::GraphElementComparatorByLayoutIndex;
use crate::edges_in_row::EdgesInRowGenerator;
use crate::generator::{PrintElementGenerator, ShortEdge, SimpleRowElement};
use crate::print_element::SimpleElementKind;
use crate::settings::{LongEdgeSettings, PrintSettings};
use crate::slru::SlruMap;
use loggraph_core::{
    EdgeFilter, EdgeType, GraphEdge, GraphElement, LinearGraph, as_normal_edge, is_edge_down,
    is_edge_up,
};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

/// Lays out rows of a `LinearGraph`: which elements a row shows, in which
/// order, and how segments connect neighbouring rows.
pub struct PrintElementGeneratorImpl {
    graph: Arc<dyn LinearGraph>,
    edges_in_row: EdgesInRowGenerator,
    comparator: GraphElementComparatorByLayoutIndex,
    row_cache: SlruMap<usize, Vec<GraphElement>>,
    long_edges: LongEdgeSettings,
    long_edge_size: usize,
    visible_part_size: usize,
    edge_with_arrow_size: usize,
    width_sample_rows: usize,
    recommended_width: Option<usize>,
}

impl PrintElementGeneratorImpl {
    pub fn new(
        graph: Arc<dyn LinearGraph>,
        comparator: GraphElementComparatorByLayoutIndex,
    ) -> Self {
        Self::with_settings(graph, comparator, &PrintSettings::default())
    }

    pub fn with_settings(
        graph: Arc<dyn LinearGraph>,
        comparator: GraphElementComparatorByLayoutIndex,
        settings: &PrintSettings,
    ) -> Self {
        let capacity = settings.row_cache_capacity;
        let mut generator = Self {
            edges_in_row: EdgesInRowGenerator::with_settings(graph.clone(), &settings.sweep),
            graph,
            comparator,
            row_cache: SlruMap::new(capacity, capacity.saturating_mul(2)),
            long_edges: settings.long_edges.clone(),
            long_edge_size: 0,
            visible_part_size: 0,
            edge_with_arrow_size: usize::MAX,
            width_sample_rows: settings.width_sample_rows,
            recommended_width: None,
        };
        generator.set_long_edges_hidden(settings.long_edges.hidden);
        generator
    }

    /// Column count that fits most rows: mean plus two standard deviations of
    /// the element count over the first rows of the graph.
    pub fn recommended_width(&mut self) -> usize {
        if let Some(width) = self.recommended_width {
            return width;
        }
        let sample = self.width_sample_rows.min(self.graph.nodes_count());
        if sample == 0 {
            return 0;
        }

        let (mut sum, mut sum_of_squares) = (0.0_f64, 0.0_f64);
        for row in 0..sample {
            let width = self.sorted_visible_elements(row).len() as f64;
            sum += width;
            sum_of_squares += width * width;
        }
        let mean = sum / sample as f64;
        let deviation = (sum_of_squares / sample as f64 - mean * mean).max(0.0).sqrt();
        let width = (mean + 2.0 * deviation).round() as usize;

        tracing::debug!("Recommended width {} from {} rows", width, sample);
        self.recommended_width = Some(width);
        width
    }

    /// Elements shown in `row`, left to right.
    fn sorted_visible_elements(&mut self, row: usize) -> Vec<GraphElement> {
        if let Some(cached) = self.row_cache.get(&row) {
            return cached.clone();
        }

        let mut elements = vec![GraphElement::Node(self.graph.graph_node(row))];
        for edge in self.edges_in_row.edges_in_row(row) {
            if self.is_edge_visible_in_row(&edge, row) {
                elements.push(GraphElement::Edge(edge));
            }
        }
        self.add_special_edges(&mut elements, row);
        stable_sort_by(&mut elements, &mut |a, b| self.comparator.compare(a, b));

        self.row_cache.put(row, elements.clone());
        elements
    }

    fn is_edge_visible_in_row(&self, edge: &GraphEdge, row: usize) -> bool {
        let Some(normal) = as_normal_edge(edge) else {
            return false;
        };
        normal.len() < self.long_edge_size
            || row.saturating_sub(normal.up) <= self.visible_part_size
            || normal.down.saturating_sub(row) <= self.visible_part_size
    }

    /// Boundary edges are drawn in the row next to the node they hang off.
    fn add_special_edges(&self, elements: &mut Vec<GraphElement>, row: usize) {
        if row > 0 {
            let above = row - 1;
            for edge in self.graph.adjacent_edges(above, EdgeFilter::SPECIAL) {
                if is_edge_down(&edge, above) {
                    elements.push(GraphElement::Edge(edge));
                }
            }
        }
        if row + 1 < self.graph.nodes_count() {
            let below = row + 1;
            for edge in self.graph.adjacent_edges(below, EdgeFilter::SPECIAL) {
                if is_edge_up(&edge, below) {
                    elements.push(GraphElement::Edge(edge));
                }
            }
        }
    }

    fn arrow_type(&self, edge: &GraphEdge, row: usize) -> Option<SimpleElementKind> {
        let Some(normal) = as_normal_edge(edge) else {
            return match edge.edge_type {
                EdgeType::DottedArrowUp => Some(SimpleElementKind::UpArrow),
                EdgeType::DottedArrowDown | EdgeType::NotLoadCommit => {
                    Some(SimpleElementKind::DownArrow)
                }
                EdgeType::Usual | EdgeType::Dotted => None,
            };
        };

        let up_offset = row.saturating_sub(normal.up);
        let down_offset = normal.down.saturating_sub(row);
        if normal.len() >= self.long_edge_size {
            if up_offset == self.visible_part_size {
                return Some(SimpleElementKind::DownArrow);
            }
            if down_offset == self.visible_part_size {
                return Some(SimpleElementKind::UpArrow);
            }
        }
        if normal.len() >= self.edge_with_arrow_size {
            if up_offset == 1 {
                return Some(SimpleElementKind::DownArrow);
            }
            if down_offset == 1 {
                return Some(SimpleElementKind::UpArrow);
            }
        }
        None
    }
}

impl PrintElementGenerator for PrintElementGeneratorImpl {
    fn nodes_count(&self) -> usize {
        self.graph.nodes_count()
    }

    fn down_short_edges(&mut self, row: usize) -> Vec<ShortEdge> {
        if row + 1 >= self.graph.nodes_count() {
            return Vec::new();
        }

        let current_row = self.sorted_visible_elements(row);
        let next_row: HashMap<GraphElement, usize> = self
            .sorted_visible_elements(row + 1)
            .into_iter()
            .enumerate()
            .map(|(position, element)| (element, position))
            .collect();
        let graph = &self.graph;
        let end_position = |edge: &GraphEdge| {
            next_row.get(&GraphElement::Edge(*edge)).copied().or_else(|| {
                let down = edge.down?;
                next_row
                    .get(&GraphElement::Node(graph.graph_node(down)))
                    .copied()
            })
        };

        let mut result = Vec::new();
        for (position, element) in current_row.iter().enumerate() {
            match element {
                GraphElement::Node(node) => {
                    for edge in graph.adjacent_edges(node.node_index, EdgeFilter::ALL) {
                        if !is_edge_down(&edge, node.node_index) {
                            continue;
                        }
                        if let Some(down_position) = end_position(&edge) {
                            result.push(ShortEdge {
                                edge,
                                up_position: position,
                                down_position,
                            });
                        }
                    }
                }
                GraphElement::Edge(edge) => {
                    if let Some(down_position) = end_position(edge) {
                        result.push(ShortEdge {
                            edge: *edge,
                            up_position: position,
                            down_position,
                        });
                    }
                }
            }
        }
        result
    }

    fn simple_row_elements(&mut self, row: usize) -> Vec<SimpleRowElement> {
        if row >= self.graph.nodes_count() {
            return Vec::new();
        }
        self.sorted_visible_elements(row)
            .into_iter()
            .enumerate()
            .filter_map(|(position, element)| {
                let kind = match &element {
                    GraphElement::Node(_) => SimpleElementKind::Node,
                    GraphElement::Edge(edge) => self.arrow_type(edge, row)?,
                };
                Some(SimpleRowElement {
                    element,
                    kind,
                    position,
                })
            })
            .collect()
    }

    fn are_long_edges_hidden(&self) -> bool {
        self.long_edges.hidden
    }

    fn set_long_edges_hidden(&mut self, hidden: bool) {
        let settings = &self.long_edges;
        if hidden {
            self.long_edge_size = settings.long_edge_size;
            self.visible_part_size = settings.long_edge_part_size;
            self.edge_with_arrow_size = usize::MAX;
        } else {
            self.long_edge_size = settings.very_long_edge_size;
            self.visible_part_size = settings.very_long_edge_part_size;
            self.edge_with_arrow_size = if settings.show_arrow_when_shown {
                settings.long_edge_size
            } else {
                usize::MAX
            };
        }
        self.long_edges.hidden = hidden;
        self.row_cache.clear();
        self.recommended_width = None;
    }

    fn invalidate(&mut self) {
        self.edges_in_row.invalidate();
        self.row_cache.clear();
        self.recommended_width = None;
    }
}

/// Runs up to this length are insertion-sorted before merging.
const INSERTION_SORT_RUN: usize = 16;

/// Stable merge sort that tolerates comparators which are not a total order;
/// `sort_by` may panic on those. O(n log n) comparisons, so wide merge rows
/// stay cheap.
fn stable_sort_by<T: Clone>(items: &mut [T], compare: &mut impl FnMut(&T, &T) -> Ordering) {
    let len = items.len();
    if len <= INSERTION_SORT_RUN {
        for i in 1..len {
            let mut j = i;
            while j > 0 && compare(&items[j - 1], &items[j]) == Ordering::Greater {
                items.swap(j - 1, j);
                j -= 1;
            }
        }
        return;
    }

    let mid = len / 2;
    stable_sort_by(&mut items[..mid], compare);
    stable_sort_by(&mut items[mid..], compare);

    let mut merged = Vec::with_capacity(len);
    let (mut left, mut right) = (0, mid);
    while left < mid && right < len {
        if compare(&items[left], &items[right]) == Ordering::Greater {
            merged.push(items[right].clone());
            right += 1;
        } else {
            merged.push(items[left].clone());
            left += 1;
        }
    }
    merged.extend_from_slice(&items[left..mid]);
    merged.extend_from_slice(&items[right..]);
    items.clone_from_slice(&merged);
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use crate::layout_index::LayoutIndexes;
    use crate::print_element::{EdgeDirection, PrintElement};
    use crate::test_support::{dag_strategy, graph};
    use loggraph_core::GraphNode;
    use proptest::prelude::*;

    fn generator(nodes_count: usize, pairs: &[(usize, usize)]) -> PrintElementGeneratorImpl {
        let graph = graph(nodes_count, pairs);
        let layout = LayoutIndexes::new(graph.clone(), graph.clone());
        let comparator = GraphElementComparatorByLayoutIndex::new(layout);
        let settings = PrintSettings {
            long_edges: LongEdgeSettings {
                long_edge_size: 8,
                long_edge_part_size: 2,
                ..LongEdgeSettings::default()
            },
            ..PrintSettings::default()
        };
        PrintElementGeneratorImpl::with_settings(graph, comparator, &settings)
    }

    proptest! {
        /// Every segment drawn below a row is drawn above the next one, at
        /// the same pair of columns.
        #[test]
        fn prop_adjacent_rows_agree((nodes_count, pairs) in dag_strategy()) {
            let mut generator = generator(nodes_count, &pairs);
            for row in 0..nodes_count - 1 {
                let mut down: Vec<_> = generator
                    .print_elements(row)
                    .into_iter()
                    .filter_map(|element| match element.print_element {
                        PrintElement::Edge(edge) if edge.direction == EdgeDirection::Down => {
                            Some((element.graph_element, edge.position_in_row, edge.position_in_other_row))
                        }
                        _ => None,
                    })
                    .collect();
                let mut up: Vec<_> = generator
                    .print_elements(row + 1)
                    .into_iter()
                    .filter_map(|element| match element.print_element {
                        PrintElement::Edge(edge) if edge.direction == EdgeDirection::Up => {
                            Some((element.graph_element, edge.position_in_other_row, edge.position_in_row))
                        }
                        _ => None,
                    })
                    .collect();
                down.sort();
                up.sort();
                prop_assert_eq!(down, up);
            }
        }

        /// Each row shows its node exactly once and nothing past the graph.
        #[test]
        fn prop_one_node_per_row((nodes_count, pairs) in dag_strategy()) {
            let mut generator = generator(nodes_count, &pairs);
            for row in 0..nodes_count {
                let nodes: Vec<_> = generator
                    .simple_row_elements(row)
                    .into_iter()
                    .filter(|element| element.kind == SimpleElementKind::Node)
                    .map(|element| element.element)
                    .collect();
                prop_assert_eq!(nodes, vec![GraphElement::Node(GraphNode::new(row))]);
            }
            prop_assert!(generator.print_elements(nodes_count).is_empty());
        }
    }
}
