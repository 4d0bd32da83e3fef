//! Builder utilities for configuring clustering runs.
//!
//! Validates the worker count before a [`Clusterizer`] is constructed, so a
//! run never starts with an unusable configuration.

use std::{num::NonZeroUsize, thread};

use crate::{Result, clusterizer::Clusterizer, error::ClusterError};

/// Configures and constructs [`Clusterizer`] instances.
///
/// # Examples
/// ```
/// use percolate_core::ClusterizerBuilder;
///
/// let clusterizer = ClusterizerBuilder::new()
///     .with_workers(4)
///     .build()
///     .expect("builder configuration is valid");
/// assert_eq!(clusterizer.workers().get(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct ClusterizerBuilder {
    workers: usize,
}

impl Default for ClusterizerBuilder {
    fn default() -> Self {
        Self {
            workers: thread::available_parallelism().map_or(1, NonZeroUsize::get),
        }
    }
}

impl ClusterizerBuilder {
    /// Creates a builder using one worker per available CPU.
    ///
    /// # Examples
    /// ```
    /// use percolate_core::ClusterizerBuilder;
    ///
    /// let builder = ClusterizerBuilder::new();
    /// assert!(builder.workers() >= 1);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the number of workers used for the parallel phases.
    ///
    /// # Examples
    /// ```
    /// use percolate_core::ClusterizerBuilder;
    ///
    /// let builder = ClusterizerBuilder::new().with_workers(3);
    /// assert_eq!(builder.workers(), 3);
    /// ```
    #[must_use]
    pub const fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Returns the configured worker count, which may still be invalid.
    #[must_use]
    pub const fn workers(&self) -> usize {
        self.workers
    }

    /// Validates the configuration and constructs a [`Clusterizer`].
    ///
    /// # Errors
    /// Returns [`ClusterError::InvalidWorkerCount`] when the worker count is
    /// zero.
    ///
    /// # Examples
    /// ```
    /// use percolate_core::{ClusterError, ClusterizerBuilder};
    ///
    /// let err = ClusterizerBuilder::new().with_workers(0).build().unwrap_err();
    /// assert_eq!(err, ClusterError::InvalidWorkerCount { got: 0 });
    /// ```
    pub fn build(self) -> Result<Clusterizer> {
        let workers = NonZeroUsize::new(self.workers)
            .ok_or(ClusterError::InvalidWorkerCount { got: self.workers })?;
        Ok(Clusterizer::new(workers))
    }
}
