//! Benchmark support crate for percolate.
//!
//! Provides seeded grid fixtures and parameter types shared by the Criterion
//! benchmarks for the labeling pipeline.

pub mod error;
pub mod fixtures;
pub mod params;
