//! Hover feedback, selection and coloring of print elements.
//!
//! Hovering is split in two: `compute_hover_effect` is a pure function of the
//! hovered element and the graph, `apply_hover_effect` is the only place the
//! hover state changes.

use crate::color::{ColorGetterByLayoutIndex, DEFAULT_COLOR_ID};
use crate::comparator::GraphElementComparatorByLayoutIndex;
use crate::fragment::{FragmentGenerator, LinearFragmentGenerator};
use crate::layout_index::LayoutIndexes;
use crate::print_element::PrintElementWithGraphElement;
use loggraph_core::{
    EdgeFilter, EdgeType, GraphColorManager, GraphEdge, GraphElement, LinearGraph,
    PermanentGraphLayout,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CursorHint {
    Hand,
    Default,
}

/// What hovering an element would do to the selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HoverEffect {
    pub selected_nodes: BTreeSet<usize>,
    /// Set when the hovered element is an arrow marker.
    pub hovered_arrow: Option<PrintElementWithGraphElement>,
}

/// Selection shared by every manager variant.
///
/// Idle until an arrow is hovered; the next hover of anything, arrows
/// included, returns to Idle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HoverState {
    selected_nodes: BTreeSet<usize>,
    special_selected: Option<PrintElementWithGraphElement>,
}

impl HoverState {
    pub fn selected_nodes(&self) -> &BTreeSet<usize> {
        &self.selected_nodes
    }

    pub fn special_selected(&self) -> Option<&PrintElementWithGraphElement> {
        self.special_selected.as_ref()
    }

    pub fn is_arrow_hover(&self) -> bool {
        self.special_selected.is_some()
    }

    pub fn apply(&mut self, effect: HoverEffect) -> Option<CursorHint> {
        self.selected_nodes = effect.selected_nodes;
        if self.special_selected.take().is_some() {
            return Some(CursorHint::Default);
        }
        let arrow = effect.hovered_arrow?;
        self.special_selected = Some(arrow);
        Some(CursorHint::Hand)
    }

    /// Nodes match by index; edges need every loaded endpoint selected.
    pub fn is_selected(&self, element: &PrintElementWithGraphElement) -> bool {
        if self.special_selected.as_ref() == Some(element) {
            return true;
        }
        match &element.graph_element {
            GraphElement::Node(node) => self.selected_nodes.contains(&node.node_index),
            GraphElement::Edge(edge) => {
                let mut endpoints = edge.up.into_iter().chain(edge.down).peekable();
                endpoints.peek().is_some()
                    && endpoints.all(|index| self.selected_nodes.contains(&index))
            }
        }
    }
}

pub trait PrintElementsManager {
    fn graph(&self) -> &Arc<dyn LinearGraph>;

    fn hover_state(&self) -> &HoverState;

    fn hover_state_mut(&mut self) -> &mut HoverState;

    /// Nodes highlighted when `element` is hovered away from collapsed edges.
    fn fragment_selection(&self, element: &GraphElement) -> BTreeSet<usize>;

    fn color_id(&self, element: &GraphElement) -> i32;

    /// Row ordering the generator must use together with this manager.
    fn graph_element_comparator(&self) -> &GraphElementComparatorByLayoutIndex;

    fn element_is_selected(&self, element: &PrintElementWithGraphElement) -> bool {
        self.hover_state().is_selected(element)
    }

    fn compute_hover_effect(&self, element: Option<&PrintElementWithGraphElement>) -> HoverEffect {
        let Some(element) = element else {
            return HoverEffect::default();
        };
        let selected_nodes = match collapsed_edge_near(self.graph().as_ref(), &element.graph_element)
        {
            Some(edge) => edge.up.into_iter().chain(edge.down).collect(),
            None => self.fragment_selection(&element.graph_element),
        };
        HoverEffect {
            selected_nodes,
            hovered_arrow: element.print_element.is_arrow().then_some(*element),
        }
    }

    fn apply_hover_effect(&mut self, effect: HoverEffect) -> Option<CursorHint> {
        self.hover_state_mut().apply(effect)
    }

    fn perform_over_element(
        &mut self,
        element: Option<&PrintElementWithGraphElement>,
    ) -> Option<CursorHint> {
        let effect = self.compute_hover_effect(element);
        self.apply_hover_effect(effect)
    }
}

/// The collapsed edge `element` belongs to: itself, or one attached to its
/// upper or lower node.
pub fn collapsed_edge_near(graph: &dyn LinearGraph, element: &GraphElement) -> Option<GraphEdge> {
    if let GraphElement::Edge(edge) = element
        && edge.edge_type == EdgeType::Dotted
    {
        return Some(*edge);
    }
    let (up, down) = element.endpoints();
    [up, down]
        .into_iter()
        .flatten()
        .filter(|index| *index < graph.nodes_count())
        .flat_map(|index| graph.adjacent_edges(index, EdgeFilter::NORMAL_ALL))
        .find(|edge| edge.edge_type == EdgeType::Dotted)
}

/// Manager of the full log view: fragment highlighting and branch colors.
pub struct PrintElementsManagerImpl {
    graph: Arc<dyn LinearGraph>,
    state: HoverState,
    comparator: GraphElementComparatorByLayoutIndex,
    colors: ColorGetterByLayoutIndex,
    fragments: Box<dyn FragmentGenerator>,
}

impl PrintElementsManagerImpl {
    pub fn new(
        graph: Arc<dyn LinearGraph>,
        layout: Arc<dyn PermanentGraphLayout>,
        colors: Arc<dyn GraphColorManager>,
    ) -> Self {
        let fragments = Box::new(LinearFragmentGenerator::new(graph.clone()));
        Self::with_fragment_generator(graph, layout, colors, fragments)
    }

    pub fn with_fragment_generator(
        graph: Arc<dyn LinearGraph>,
        layout: Arc<dyn PermanentGraphLayout>,
        colors: Arc<dyn GraphColorManager>,
        fragments: Box<dyn FragmentGenerator>,
    ) -> Self {
        let layout = LayoutIndexes::new(graph.clone(), layout);
        Self {
            graph,
            state: HoverState::default(),
            comparator: GraphElementComparatorByLayoutIndex::new(layout.clone()),
            colors: ColorGetterByLayoutIndex::new(layout, colors),
            fragments,
        }
    }
}

impl PrintElementsManager for PrintElementsManagerImpl {
    fn graph(&self) -> &Arc<dyn LinearGraph> {
        &self.graph
    }

    fn hover_state(&self) -> &HoverState {
        &self.state
    }

    fn hover_state_mut(&mut self) -> &mut HoverState {
        &mut self.state
    }

    fn fragment_selection(&self, element: &GraphElement) -> BTreeSet<usize> {
        self.fragments
            .relative_fragment(element)
            .map(|fragment| self.fragments.all_nodes(&fragment))
            .unwrap_or_default()
    }

    fn color_id(&self, element: &GraphElement) -> i32 {
        self.colors.color_id(element)
    }

    fn graph_element_comparator(&self) -> &GraphElementComparatorByLayoutIndex {
        &self.comparator
    }
}

/// Manager of filtered and search views: no branch colors and no fragment
/// highlighting, only collapsed edges light up.
pub struct FilterPrintElementsManager {
    graph: Arc<dyn LinearGraph>,
    state: HoverState,
    comparator: GraphElementComparatorByLayoutIndex,
}

impl FilterPrintElementsManager {
    pub fn new(graph: Arc<dyn LinearGraph>, layout: Arc<dyn PermanentGraphLayout>) -> Self {
        let layout = LayoutIndexes::new(graph.clone(), layout);
        Self {
            graph,
            state: HoverState::default(),
            comparator: GraphElementComparatorByLayoutIndex::new(layout),
        }
    }
}

impl PrintElementsManager for FilterPrintElementsManager {
    fn graph(&self) -> &Arc<dyn LinearGraph> {
        &self.graph
    }

    fn hover_state(&self) -> &HoverState {
        &self.state
    }

    fn hover_state_mut(&mut self) -> &mut HoverState {
        &mut self.state
    }

    fn fragment_selection(&self, _element: &GraphElement) -> BTreeSet<usize> {
        BTreeSet::new()
    }

    fn color_id(&self, _element: &GraphElement) -> i32 {
        DEFAULT_COLOR_ID
    }

    fn graph_element_comparator(&self) -> &GraphElementComparatorByLayoutIndex {
        &self.comparator
    }
}
