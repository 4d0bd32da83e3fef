//! Benchmark setup error type.

use percolate_core::ClusterError;

/// Errors that may occur while preparing benchmark inputs.
#[derive(Debug, thiserror::Error)]
pub enum BenchSetupError {
    /// Grid generation or clusterizer configuration failed.
    #[error("clustering setup failed: {0}")]
    Cluster(#[from] ClusterError),
}
