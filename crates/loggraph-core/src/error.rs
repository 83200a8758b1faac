use thiserror::Error;

/// Failures of the print layer. Each one means the caller handed back an element
/// that does not belong to the current graph version.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PrintError {
    #[error("No graph element for print element at row {row}, position {position}")]
    ElementNotFound { row: usize, position: usize },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphBuildError {
    #[error("Edge {up} -> {down} references a row outside 0..{nodes_count}")]
    RowOutOfRange {
        up: usize,
        down: usize,
        nodes_count: usize,
    },
    #[error("Edge {up} -> {down} must point to a lower row")]
    NotDownward { up: usize, down: usize },
    #[error("Special edge at row {row} has type {edge_type:?}, which needs both endpoints")]
    NormalTypeOnSpecialEdge {
        row: usize,
        edge_type: crate::EdgeType,
    },
}
