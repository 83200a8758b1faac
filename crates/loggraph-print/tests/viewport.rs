use loggraph_core::{EdgeType, GraphElement, InMemoryGraph, InMemoryGraphBuilder, NodeId};
use loggraph_print::{
    CursorHint, DEFAULT_COLOR_ID, FilterPrintElementsManager, PrintElement, PrintElementGenerator,
    PrintElementGeneratorImpl, PrintElementsManager, PrintElementsManagerImpl, PrintSettings,
    SimpleElementKind,
};
use std::sync::Arc;

const ROWS: usize = 45;

/// A main line of `ROWS` commits, a merge reaching from the first commit to
/// the last, and a history boundary below row 10.
fn history() -> anyhow::Result<Arc<InMemoryGraph>> {
    let mut builder = InMemoryGraphBuilder::new(ROWS);
    for row in 0..ROWS {
        builder.layout_index(NodeId(row as i32), 0);
        if row + 1 < ROWS {
            builder.add_edge(row, row + 1)?;
        }
    }
    builder.layout_index(NodeId(ROWS as i32 - 1), 1);
    builder.add_edge(0, ROWS - 1)?;
    builder.add_arrow_edge(10, EdgeType::DottedArrowDown)?;
    Ok(Arc::new(builder.build()))
}

fn viewport(
    graph: &Arc<InMemoryGraph>,
    settings: &PrintSettings,
) -> (PrintElementGeneratorImpl, PrintElementsManagerImpl) {
    let manager = PrintElementsManagerImpl::new(graph.clone(), graph.clone(), graph.clone());
    let generator = PrintElementGeneratorImpl::with_settings(
        graph.clone(),
        manager.graph_element_comparator().clone(),
        settings,
    );
    (generator, manager)
}

#[test]
fn test_scrolling_shows_every_node_once() -> anyhow::Result<()> {
    let graph = history()?;
    let (mut generator, manager) = viewport(&graph, &PrintSettings::default());

    for row in 0..ROWS {
        let styled = generator.styled_print_elements(row, &manager);
        let nodes: Vec<_> = styled
            .iter()
            .filter(|styled| {
                matches!(
                    styled.element.print_element,
                    PrintElement::Simple(simple) if simple.kind == SimpleElementKind::Node
                )
            })
            .collect();
        assert_eq!(nodes.len(), 1, "row {row}");
        assert!(nodes.iter().all(|node| node.color_id != DEFAULT_COLOR_ID));
        assert!(styled.iter().all(|styled| !styled.selected));
    }
    assert!(generator.styled_print_elements(ROWS, &manager).is_empty());
    Ok(())
}

#[test]
fn test_hovering_an_arrow_toggles_the_cursor() -> anyhow::Result<()> {
    let graph = history()?;
    let (mut generator, mut manager) = viewport(&graph, &PrintSettings::default());

    let arrow = generator
        .print_elements(1)
        .into_iter()
        .find(|element| element.print_element.is_arrow())
        .ok_or_else(|| anyhow::anyhow!("no arrow in row 1"))?;

    assert_eq!(manager.perform_over_element(Some(&arrow)), Some(CursorHint::Hand));
    let styled = generator.styled_print_elements(1, &manager);
    assert!(
        styled
            .iter()
            .any(|styled| styled.element == arrow && styled.selected)
    );

    let node = generator
        .print_elements(5)
        .into_iter()
        .find(|element| matches!(element.graph_element, GraphElement::Node(_)))
        .ok_or_else(|| anyhow::anyhow!("no node in row 5"))?;
    assert_eq!(manager.perform_over_element(Some(&node)), Some(CursorHint::Default));
    assert!(manager.element_is_selected(&node));
    assert_eq!(manager.perform_over_element(None), None);
    assert!(!manager.element_is_selected(&node));
    Ok(())
}

#[test]
fn test_history_boundary_arrow_resolves_back() -> anyhow::Result<()> {
    let graph = history()?;
    let (mut generator, _) = viewport(&graph, &PrintSettings::default());

    let boundary: Vec<_> = generator
        .print_elements(11)
        .into_iter()
        .filter(|element| match element.graph_element {
            GraphElement::Edge(edge) => edge.edge_type == EdgeType::DottedArrowDown,
            GraphElement::Node(_) => false,
        })
        .collect();
    assert_eq!(boundary.len(), 2, "segment from row 10 and its arrow");

    for element in boundary {
        let resolved = generator.related_graph_element(&element.print_element)?;
        assert_eq!(resolved, element.graph_element);
    }
    Ok(())
}

#[test]
fn test_long_edge_setting_and_invalidate() -> anyhow::Result<()> {
    let graph = history()?;
    let settings = PrintSettings::from_json_str(r#"{ "long_edges": { "hidden": false } }"#)?;
    let (mut generator, _) = viewport(&graph, &settings);

    assert!(!generator.are_long_edges_hidden());
    let shown = generator.print_elements(20);
    assert_eq!(shown.len(), 5);

    generator.invalidate();
    assert_eq!(generator.print_elements(20), shown);

    generator.set_long_edges_hidden(true);
    assert_eq!(generator.print_elements(20).len(), 3);
    Ok(())
}

#[test]
fn test_filter_view_is_colorless() -> anyhow::Result<()> {
    let graph = history()?;
    let mut manager = FilterPrintElementsManager::new(graph.clone(), graph.clone());
    let mut generator = PrintElementGeneratorImpl::new(
        graph.clone(),
        manager.graph_element_comparator().clone(),
    );

    let row = generator.print_elements(3);
    for element in &row {
        assert_eq!(manager.color_id(&element.graph_element), DEFAULT_COLOR_ID);
    }
    manager.perform_over_element(row.first());
    assert!(manager.hover_state().selected_nodes().is_empty());
    Ok(())
}
