pub mod color;
pub mod comparator;
pub mod edges_in_row;
pub mod fragment;
pub mod generator;
pub mod generator_impl;
pub mod layout_index;
pub mod manager;
pub mod print_element;
pub mod settings;
pub mod slru;

#[cfg(test)]
mod test_support;

pub use color::{ColorGetterByLayoutIndex, DEFAULT_COLOR_ID};
pub use comparator::GraphElementComparatorByLayoutIndex;
pub use edges_in_row::{EdgesInRowGenerator, GraphEdges};
pub use fragment::{FragmentGenerator, GraphFragment, LinearFragmentGenerator};
pub use generator::{PrintElementGenerator, ShortEdge, SimpleRowElement};
pub use generator_impl::PrintElementGeneratorImpl;
pub use layout_index::LayoutIndexes;
pub use manager::{
    CursorHint, FilterPrintElementsManager, HoverEffect, HoverState, PrintElementsManager,
    PrintElementsManagerImpl, collapsed_edge_near,
};
pub use print_element::{
    EdgeDirection, EdgePrintElement, PrintElement, PrintElementWithGraphElement,
    RelatedGraphElement, SimpleElementKind, SimplePrintElement, StyledPrintElement,
};
pub use settings::{LongEdgeSettings, MAX_CACHE_CAPACITY, PrintSettings, SweepSettings};
pub use slru::SlruMap;
