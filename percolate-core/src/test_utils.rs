//! Shared test utilities for `percolate-core`.

use std::collections::VecDeque;

use percolate_test_support::ci::property_test_profile::ProptestRunProfile;
use proptest::{prelude::*, test_runner::Config as ProptestConfig};

use crate::grid::Grid;

/// Builds a standard proptest configuration from the shared CI profile.
///
/// This keeps property suites aligned on the same `PERCOLATE_PBT_CASES` and
/// `PERCOLATE_PBT_FORK` interpretation.
#[must_use]
pub(crate) fn suite_proptest_config(default_cases: u32) -> ProptestConfig {
    let profile = ProptestRunProfile::load(default_cases, false);
    ProptestConfig {
        cases: profile.cases(),
        fork: profile.fork(),
        ..ProptestConfig::default()
    }
}

/// Generates occupancy grids of up to `max_side` rows and columns.
pub(crate) fn occupancy_grid(max_side: usize) -> impl Strategy<Value = Grid<bool>> {
    (1..=max_side, 1..=max_side).prop_flat_map(|(rows, cols)| {
        prop::collection::vec(any::<bool>(), rows * cols).prop_map(move |cells| {
            Grid::from_vec(rows, cols, cells).expect("generated buffers match their shape")
        })
    })
}

/// Labels clusters by breadth-first flood fill in row-major seed order.
///
/// Cluster numbering matches the row-major order of each cluster's first
/// cell, so results compare directly against a clustering run.
pub(crate) fn flood_fill_labels(grid: &Grid<bool>) -> Grid<u32> {
    let (rows, cols) = (grid.rows(), grid.cols());
    let mut labels = vec![0u32; grid.len()];
    let mut next = 0u32;
    let mut queue = VecDeque::new();

    for seed in 0..grid.len() {
        if !grid.as_slice()[seed] || labels[seed] != 0 {
            continue;
        }
        next += 1;
        labels[seed] = next;
        queue.push_back(seed);
        while let Some(index) = queue.pop_front() {
            let (row, col) = (index / cols, index % cols);
            let neighbors = [
                (row > 0).then(|| index - cols),
                (row + 1 < rows).then(|| index + cols),
                (col > 0).then(|| index - 1),
                (col + 1 < cols).then(|| index + 1),
            ];
            for neighbor in neighbors.into_iter().flatten() {
                if grid.as_slice()[neighbor] && labels[neighbor] == 0 {
                    labels[neighbor] = next;
                    queue.push_back(neighbor);
                }
            }
        }
    }

    Grid::from_vec(rows, cols, labels).expect("labels keep the grid's shape")
}
