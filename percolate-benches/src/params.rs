//! Benchmark parameter types.
//!
//! The `Display` forms become Criterion benchmark IDs, so they stay short.

use std::fmt;

/// Parameters for a worker-count sweep.
#[derive(Clone, Copy, Debug)]
pub struct WorkerBenchParams {
    /// Side length of the square grid.
    pub side: usize,
    /// Number of workers used for the run.
    pub workers: usize,
}

impl fmt::Display for WorkerBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{0}x{0},w={1}", self.side, self.workers)
    }
}

/// Parameters for an occupancy sweep at a fixed grid size.
#[derive(Clone, Copy, Debug)]
pub struct OccupancyBenchParams {
    /// Side length of the square grid.
    pub side: usize,
    /// Probability that a cell is occupied.
    pub probability: f64,
}

impl fmt::Display for OccupancyBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{0}x{0},p={1:.3}", self.side, self.probability)
    }
}
