//! Seeded grid fixtures.

use percolate_core::{Grid, random_occupancy};

use crate::error::BenchSetupError;

/// Seed used for every generated benchmark grid.
pub const SEED: u64 = 42;

/// Site-percolation threshold of the square lattice, where cluster structure
/// is most irregular.
pub const CRITICAL_OCCUPANCY: f64 = 0.592_746;

/// Generates a square grid with the shared seed.
///
/// # Errors
/// Returns [`BenchSetupError::Cluster`] when `side` is zero or `probability`
/// lies outside `[0, 1]`.
pub fn square_grid(side: usize, probability: f64) -> Result<Grid<bool>, BenchSetupError> {
    Ok(random_occupancy(side, side, probability, SEED)?)
}
