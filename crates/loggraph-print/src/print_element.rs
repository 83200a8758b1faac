//! Drawable units handed to the renderer.

use loggraph_core::GraphElement;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SimpleElementKind {
    Node,
    /// The edge continues upward beyond what is drawn.
    UpArrow,
    /// The edge continues downward beyond what is drawn.
    DownArrow,
}

impl SimpleElementKind {
    pub fn is_arrow(&self) -> bool {
        !matches!(self, SimpleElementKind::Node)
    }
}

/// Which neighbouring row an edge segment leads to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeDirection {
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SimplePrintElement {
    pub row_index: usize,
    pub position_in_row: usize,
    pub kind: SimpleElementKind,
}

/// Segment from `position_in_row` of this row to `position_in_other_row` of
/// the row above (`Up`) or below (`Down`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdgePrintElement {
    pub row_index: usize,
    pub position_in_row: usize,
    pub position_in_other_row: usize,
    pub direction: EdgeDirection,
    /// The segment ends in an arrowhead because the rest of the edge is hidden.
    pub has_arrow: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrintElement {
    Simple(SimplePrintElement),
    Edge(EdgePrintElement),
}

impl PrintElement {
    pub fn row_index(&self) -> usize {
        match self {
            PrintElement::Simple(simple) => simple.row_index,
            PrintElement::Edge(edge) => edge.row_index,
        }
    }

    pub fn position_in_row(&self) -> usize {
        match self {
            PrintElement::Simple(simple) => simple.position_in_row,
            PrintElement::Edge(edge) => edge.position_in_row,
        }
    }

    pub fn is_arrow(&self) -> bool {
        matches!(self, PrintElement::Simple(simple) if simple.kind.is_arrow())
    }
}

/// A print element together with the graph element it renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PrintElementWithGraphElement {
    pub print_element: PrintElement,
    pub graph_element: GraphElement,
}

impl PrintElementWithGraphElement {
    pub fn new(print_element: PrintElement, graph_element: GraphElement) -> Self {
        Self {
            print_element,
            graph_element,
        }
    }
}

/// Anything a renderer may hand back for reverse lookup.
pub trait RelatedGraphElement {
    fn print_element(&self) -> &PrintElement;

    fn attached_graph_element(&self) -> Option<&GraphElement> {
        None
    }
}

impl RelatedGraphElement for PrintElement {
    fn print_element(&self) -> &PrintElement {
        self
    }
}

impl RelatedGraphElement for PrintElementWithGraphElement {
    fn print_element(&self) -> &PrintElement {
        &self.print_element
    }

    fn attached_graph_element(&self) -> Option<&GraphElement> {
        Some(&self.graph_element)
    }
}

/// Print element decorated with the manager's view of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyledPrintElement {
    pub element: PrintElementWithGraphElement,
    pub selected: bool,
    pub color_id: i32,
}
