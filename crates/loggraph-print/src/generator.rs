//! Row-level assembly of print elements, shared by every generator.
//!
//! Implementors only decide which edges leave a row and which markers sit in
//! it; turning that into print elements and back is done here once.

use crate::manager::PrintElementsManager;
use crate::print_element::{
    EdgeDirection, EdgePrintElement, PrintElement, PrintElementWithGraphElement,
    RelatedGraphElement, SimpleElementKind, SimplePrintElement, StyledPrintElement,
};
use loggraph_core::{GraphEdge, GraphElement, PrintError};

/// Edge segment between a row and the row below it, as column positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShortEdge {
    pub edge: GraphEdge,
    pub up_position: usize,
    pub down_position: usize,
}

/// Node marker or arrow sitting in a single row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SimpleRowElement {
    pub element: GraphElement,
    pub kind: SimpleElementKind,
    pub position: usize,
}

pub trait PrintElementGenerator {
    fn nodes_count(&self) -> usize;

    /// Segments leaving `row` downward. Empty for the last row.
    fn down_short_edges(&mut self, row: usize) -> Vec<ShortEdge>;

    fn simple_row_elements(&mut self, row: usize) -> Vec<SimpleRowElement>;

    fn are_long_edges_hidden(&self) -> bool;

    fn set_long_edges_hidden(&mut self, hidden: bool);

    /// Drops everything derived from the current graph version.
    fn invalidate(&mut self);

    /// Up segments, then down segments, then markers. Positions are only
    /// unique within one kind of element.
    fn print_elements(&mut self, row: usize) -> Vec<PrintElementWithGraphElement> {
        let nodes_count = self.nodes_count();
        if row >= nodes_count {
            tracing::warn!(
                "Print elements requested for row {} outside 0..{}",
                row,
                nodes_count
            );
            return Vec::new();
        }

        let simple_elements = self.simple_row_elements(row);
        let mut result = Vec::new();

        if row > 0 {
            for short_edge in self.down_short_edges(row - 1) {
                let has_arrow =
                    ends_in_arrow(&simple_elements, &short_edge.edge, EdgeDirection::Up);
                result.push(edge_print_element(row, &short_edge, EdgeDirection::Up, has_arrow));
            }
        }
        if row + 1 < nodes_count {
            for short_edge in self.down_short_edges(row) {
                let has_arrow =
                    ends_in_arrow(&simple_elements, &short_edge.edge, EdgeDirection::Down);
                result.push(edge_print_element(row, &short_edge, EdgeDirection::Down, has_arrow));
            }
        }
        for element in &simple_elements {
            result.push(simple_print_element(row, element));
        }
        result
    }

    /// Recovers the graph element behind a print element of this generator.
    fn with_graph_element(
        &mut self,
        print_element: &PrintElement,
    ) -> Result<PrintElementWithGraphElement, PrintError> {
        let row = print_element.row_index();
        let not_found = PrintError::ElementNotFound {
            row,
            position: print_element.position_in_row(),
        };
        if row >= self.nodes_count() {
            return Err(not_found);
        }

        match print_element {
            PrintElement::Simple(simple) => self
                .simple_row_elements(row)
                .iter()
                .find(|element| {
                    element.position == simple.position_in_row && element.kind == simple.kind
                })
                .map(|element| simple_print_element(row, element))
                .ok_or(not_found),
            PrintElement::Edge(edge) => {
                let candidates = match edge.direction {
                    EdgeDirection::Down => self.down_short_edges(row),
                    EdgeDirection::Up if row > 0 => self.down_short_edges(row - 1),
                    EdgeDirection::Up => Vec::new(),
                };
                let found = candidates.into_iter().find(|short_edge| {
                    let (current, other) = match edge.direction {
                        EdgeDirection::Down => (short_edge.up_position, short_edge.down_position),
                        EdgeDirection::Up => (short_edge.down_position, short_edge.up_position),
                    };
                    current == edge.position_in_row && other == edge.position_in_other_row
                });
                match found {
                    Some(short_edge) => {
                        let simple_elements = self.simple_row_elements(row);
                        let has_arrow =
                            ends_in_arrow(&simple_elements, &short_edge.edge, edge.direction);
                        Ok(edge_print_element(row, &short_edge, edge.direction, has_arrow))
                    }
                    None => Err(not_found),
                }
            }
        }
    }

    fn related_graph_element<E>(&mut self, element: &E) -> Result<GraphElement, PrintError>
    where
        E: RelatedGraphElement + ?Sized,
        Self: Sized,
    {
        if let Some(graph_element) = element.attached_graph_element() {
            return Ok(*graph_element);
        }
        let resolved = self.with_graph_element(element.print_element())?;
        Ok(resolved.graph_element)
    }

    /// Print elements of `row` with selection and color from `manager`.
    fn styled_print_elements(
        &mut self,
        row: usize,
        manager: &dyn PrintElementsManager,
    ) -> Vec<StyledPrintElement> {
        self.print_elements(row)
            .into_iter()
            .map(|element| StyledPrintElement {
                selected: manager.element_is_selected(&element),
                color_id: manager.color_id(&element.graph_element),
                element,
            })
            .collect()
    }
}

fn edge_print_element(
    row: usize,
    short_edge: &ShortEdge,
    direction: EdgeDirection,
    has_arrow: bool,
) -> PrintElementWithGraphElement {
    let (position_in_row, position_in_other_row) = match direction {
        EdgeDirection::Down => (short_edge.up_position, short_edge.down_position),
        EdgeDirection::Up => (short_edge.down_position, short_edge.up_position),
    };
    PrintElementWithGraphElement::new(
        PrintElement::Edge(EdgePrintElement {
            row_index: row,
            position_in_row,
            position_in_other_row,
            direction,
            has_arrow,
        }),
        GraphElement::Edge(short_edge.edge),
    )
}

fn simple_print_element(row: usize, element: &SimpleRowElement) -> PrintElementWithGraphElement {
    PrintElementWithGraphElement::new(
        PrintElement::Simple(SimplePrintElement {
            row_index: row,
            position_in_row: element.position,
            kind: element.kind,
        }),
        element.element,
    )
}

/// A segment reaching this row gets an arrowhead when the same edge carries an
/// arrow here pointing past the segment's end.
fn ends_in_arrow(
    simple_elements: &[SimpleRowElement],
    edge: &GraphEdge,
    direction: EdgeDirection,
) -> bool {
    let arrow = match direction {
        EdgeDirection::Up => SimpleElementKind::DownArrow,
        EdgeDirection::Down => SimpleElementKind::UpArrow,
    };
    simple_elements
        .iter()
        .any(|element| element.kind == arrow && element.element == GraphElement::Edge(*edge))
}
