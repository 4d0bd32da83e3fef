//! Seeded random occupancy grids.

use std::sync::Arc;

use rand::{Rng, SeedableRng, rngs::SmallRng};

use crate::{Result, error::ClusterError, grid::Grid};

/// Builds a `rows` x `cols` grid where each cell is occupied independently
/// with `probability`.
///
/// The same seed always yields the same grid.
///
/// # Errors
/// Returns [`ClusterError::InvalidProbability`] when `probability` is not a
/// number within `[0, 1]`, and [`ClusterError::EmptyGrid`] when either
/// dimension is zero.
///
/// # Examples
/// ```
/// use percolate_core::random_occupancy;
///
/// let full = random_occupancy(3, 4, 1.0, 7).expect("valid parameters");
/// assert_eq!(full.occupied_count(), 12);
/// assert_eq!(random_occupancy(3, 4, 0.4, 7), random_occupancy(3, 4, 0.4, 7));
/// ```
pub fn random_occupancy(
    rows: usize,
    cols: usize,
    probability: f64,
    seed: u64,
) -> Result<Grid<bool>> {
    if !(0.0..=1.0).contains(&probability) {
        return Err(ClusterError::InvalidProbability {
            got: Arc::from(probability.to_string()),
        });
    }
    if rows == 0 || cols == 0 {
        return Err(ClusterError::EmptyGrid { rows, cols });
    }

    let mut rng = SmallRng::seed_from_u64(seed);
    let cells = (0..rows.saturating_mul(cols))
        .map(|_| rng.gen_bool(probability))
        .collect();
    Grid::from_vec(rows, cols, cells)
}
