use criterion::{Criterion, black_box, criterion_group, criterion_main};
use loggraph_bench::generate_synthetic_history;
use loggraph_core::LinearGraph;
use loggraph_print::{
    EdgesInRowGenerator, PrintElementGenerator, PrintElementGeneratorImpl, PrintElementsManager,
    PrintElementsManagerImpl,
};
use std::sync::Arc;

const ROWS: usize = 20_000;

fn history() -> Arc<dyn LinearGraph> {
    Arc::new(generate_synthetic_history(ROWS, 12, 42).expect("synthetic history"))
}

fn bench_random_row_access(c: &mut Criterion) {
    let graph = history();
    let mut sweep = EdgesInRowGenerator::new(graph);
    let mut state = 17usize;

    c.bench_function("edges_in_row_random_20k", |b| {
        b.iter(|| {
            state = (state * 1103515245 + 12345) % ROWS;
            black_box(sweep.edges_in_row(black_box(state)));
        })
    });
}

fn bench_scrolling(c: &mut Criterion) {
    let shared = Arc::new(generate_synthetic_history(ROWS, 12, 42).expect("synthetic history"));
    let manager = PrintElementsManagerImpl::new(shared.clone(), shared.clone(), shared.clone());
    let comparator = manager.graph_element_comparator().clone();

    c.bench_function("styled_rows_scroll_200", |b| {
        b.iter(|| {
            let mut generator = PrintElementGeneratorImpl::new(shared.clone(), comparator.clone());
            for row in 5_000..5_200 {
                black_box(generator.styled_print_elements(row, &manager));
            }
        })
    });
}

fn bench_cold_sweep(c: &mut Criterion) {
    let graph = history();

    c.bench_function("edges_in_row_cold_far_row", |b| {
        b.iter(|| {
            let mut sweep = EdgesInRowGenerator::new(graph.clone());
            black_box(sweep.edges_in_row(black_box(ROWS - 7)));
        })
    });
}

criterion_group!(benches, bench_random_row_access, bench_scrolling, bench_cold_sweep);
criterion_main!(benches);
