use loggraph_core::{InMemoryGraph, InMemoryGraphBuilder, NodeId};

/// Deterministic linear congruential step; keeps runs comparable.
fn next(state: &mut u64) -> u64 {
    *state = state
        .wrapping_mul(6364136223846793005)
        .wrapping_add(1442695040888963407);
    *state >> 33
}

/// Synthetic history of `rows` commits over `branches` parallel branches.
///
/// Every commit continues its branch; now and then a branch merges into a
/// neighbour, which produces crossing and long edges.
pub fn generate_synthetic_history(
    rows: usize,
    branches: usize,
    seed: u64,
) -> anyhow::Result<InMemoryGraph> {
    anyhow::ensure!(branches > 0, "at least one branch is required");

    let mut state = seed;
    let mut builder = InMemoryGraphBuilder::new(rows);
    let mut last_row: Vec<Option<usize>> = vec![None; branches];

    for row in 0..rows {
        let branch = (next(&mut state) as usize) % branches;
        builder.layout_index(NodeId(row as i32), branch as i32);

        if let Some(parent) = last_row[branch] {
            builder.add_edge(parent, row)?;
        }
        if branches > 1 && next(&mut state) % 8 == 0 {
            let other = (branch + 1) % branches;
            if let Some(parent) = last_row[other] {
                builder.add_edge(parent, row)?;
            }
        }
        last_row[branch] = Some(row);
    }

    Ok(builder.build())
}

#[cfg(test)]
mod tests {
    use super::*;
    use loggraph_core::LinearGraph;

    #[test]
    fn test_history_is_deterministic() {
        let first = generate_synthetic_history(200, 4, 7).expect("history");
        let second = generate_synthetic_history(200, 4, 7).expect("history");
        assert_eq!(first.nodes_count(), 200);
        assert_eq!(first.edge_count(), second.edge_count());
        assert!(generate_synthetic_history(10, 0, 7).is_err());
    }
}
