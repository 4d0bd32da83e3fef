//! Orchestration of a clustering run.
//!
//! A run moves through a fixed sequence of phases. Marking and resolving run
//! one task per row partition on a pool scoped to the run; merging and
//! relabeling run on the calling thread between them. Every transition is
//! traced, and a failure in any phase discards the working grid.

use std::{
    any::Any,
    num::NonZeroUsize,
    panic::{self, AssertUnwindSafe},
    sync::Arc,
};

use rayon::{ThreadPoolBuilder, prelude::*};
use tracing::{Dispatch, Span, debug, dispatcher, info, instrument, warn};

use crate::{
    Result,
    builder::ClusterizerBuilder,
    cell::{Cell, CellSlab, split_slabs},
    error::ClusterError,
    grid::Grid,
    marker::{CellMarker, MarkedPartition},
    merge::{merge_seams, relabel},
    partition::{Partition, partition_rows},
    resolve::{publish, resolve_slab},
    result::LabeledGrid,
    union_find::LabelAllocator,
};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Phase {
    Idle,
    Partitioning,
    MarkingParallel,
    BoundaryMerging,
    Relabeling,
    Resolving,
    Done,
    Failed,
}

impl Phase {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Partitioning => "partitioning",
            Self::MarkingParallel => "marking",
            Self::BoundaryMerging => "boundary_merging",
            Self::Relabeling => "relabeling",
            Self::Resolving => "resolving",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }
}

#[derive(Debug)]
struct RunState {
    phase: Phase,
}

impl RunState {
    const fn new() -> Self {
        Self { phase: Phase::Idle }
    }

    fn advance(&mut self, next: Phase) {
        debug!(from = self.phase.as_str(), to = next.as_str(), "phase transition");
        self.phase = next;
    }

    fn fail(&mut self, err: &ClusterError) {
        warn!(
            phase = self.phase.as_str(),
            code = %err.code(),
            error = %err,
            "clustering run failed"
        );
        self.advance(Phase::Failed);
    }

    /// Moves to `Done` or `Failed` according to `outcome` and passes it on.
    fn finish(&mut self, outcome: Result<LabeledGrid>) -> Result<LabeledGrid> {
        match outcome {
            Ok(labeled) => {
                self.advance(Phase::Done);
                info!(clusters = labeled.cluster_count(), "clustering completed");
                Ok(labeled)
            }
            Err(err) => {
                self.fail(&err);
                Err(err)
            }
        }
    }
}

/// Entry point for labeling the clusters of an occupancy grid.
///
/// # Examples
/// ```
/// use percolate_core::{ClusterizerBuilder, Grid};
///
/// let grid = Grid::from_rows(vec![
///     vec![true, true, false],
///     vec![false, false, false],
///     vec![false, true, true],
/// ])
/// .expect("grid is rectangular");
/// let labeled = ClusterizerBuilder::new()
///     .with_workers(2)
///     .build()
///     .expect("builder must succeed")
///     .run(&grid)
///     .expect("run must succeed");
/// assert_eq!(labeled.cluster_count(), 2);
/// assert_eq!(labeled.label(0, 0), Some(1));
/// assert_eq!(labeled.label(2, 2), Some(2));
/// ```
#[derive(Debug, Clone)]
pub struct Clusterizer {
    workers: NonZeroUsize,
}

impl Clusterizer {
    pub(crate) const fn new(workers: NonZeroUsize) -> Self {
        Self { workers }
    }

    /// Returns the configured worker count.
    ///
    /// Runs never use more workers than the grid has rows.
    #[must_use]
    pub const fn workers(&self) -> NonZeroUsize {
        self.workers
    }

    /// Labels every cluster of `grid`.
    ///
    /// `grid` is only read; the run works on its own buffer. Labels are
    /// numbered `1..=K` in row-major order of each cluster's first cell, so the
    /// result does not depend on the worker count.
    ///
    /// # Errors
    /// Returns [`ClusterError::WorkerPool`] when the thread pool cannot be
    /// created, [`ClusterError::WorkerPanicked`] when a worker panics,
    /// [`ClusterError::LabelSpaceExhausted`] when the grid needs more labels
    /// than fit in a `u32`, and [`ClusterError::ReferenceCycle`] or
    /// [`ClusterError::DanglingReference`] when a reference chain is corrupt.
    #[instrument(
        name = "core.clusterize",
        err,
        skip(self, grid),
        fields(rows = grid.rows(), cols = grid.cols(), workers = self.workers.get()),
    )]
    pub fn run(&self, grid: &Grid<bool>) -> Result<LabeledGrid> {
        let mut state = RunState::new();
        let outcome = self.execute(grid, &mut state);
        state.finish(outcome)
    }

    fn execute(&self, grid: &Grid<bool>, state: &mut RunState) -> Result<LabeledGrid> {
        let cols = grid.cols();

        state.advance(Phase::Partitioning);
        let partitions = partition_rows(grid.rows(), self.workers);
        let mut cells = vec![Cell::Empty; grid.len()];

        state.advance(Phase::MarkingParallel);
        let allocator = LabelAllocator::new();
        let marked = mark(grid, &partitions, &mut cells, &allocator)?;

        let mut equivalences = Vec::new();
        let mut origins = Vec::with_capacity(usize::try_from(allocator.issued()).unwrap_or_default());
        let mut seams = Vec::new();
        for partition in marked {
            equivalences.extend(partition.equivalences);
            origins.extend(partition.origins);
            seams.extend(partition.seams);
        }

        let mut whole = CellSlab::new(&mut cells, 0, cols);
        state.advance(Phase::BoundaryMerging);
        merge_seams(&mut whole, &seams, &mut equivalences)?;

        state.advance(Phase::Relabeling);
        let relabeling = relabel(&mut whole, &origins, &equivalences)?;

        state.advance(Phase::Resolving);
        resolve(&partitions, &mut cells, cols)?;

        let labels = publish(grid.rows(), cols, cells)?;
        Ok(LabeledGrid::from_parts(labels, relabeling.cluster_count))
    }
}

#[instrument(
    name = "core.mark",
    err,
    skip(grid, partitions, cells, allocator),
    fields(partitions = partitions.len()),
)]
fn mark(
    grid: &Grid<bool>,
    partitions: &[Partition],
    cells: &mut [Cell],
    allocator: &LabelAllocator,
) -> Result<Vec<MarkedPartition>> {
    let slabs = split_slabs(cells, Partition::ranges(partitions), grid.cols());
    let jobs = partitions.iter().copied().zip(slabs).collect();
    run_partitioned(jobs, |partition, slab| {
        CellMarker::new(grid, partition, allocator).mark(slab)
    })
}

#[instrument(
    name = "core.resolve",
    err,
    skip(partitions, cells),
    fields(partitions = partitions.len()),
)]
fn resolve(partitions: &[Partition], cells: &mut [Cell], cols: usize) -> Result<usize> {
    let slabs = split_slabs(cells, Partition::ranges(partitions), cols);
    let jobs = partitions.iter().copied().zip(slabs).collect();
    let rewritten: usize = run_partitioned(jobs, |_, mut slab| resolve_slab(&mut slab))?
        .into_iter()
        .sum();
    debug!(rewritten, "references resolved");
    Ok(rewritten)
}

/// Runs `task` once per partition and returns the results in partition order.
///
/// More than one partition runs on a pool with one thread per partition; a
/// single partition runs on the calling thread. Tasks run inside the caller's
/// current span and subscriber. Panics inside `task` are reported as
/// [`ClusterError::WorkerPanicked`].
pub(crate) fn run_partitioned<'a, T, F>(
    jobs: Vec<(Partition, CellSlab<'a>)>,
    task: F,
) -> Result<Vec<T>>
where
    T: Send,
    F: Fn(Partition, CellSlab<'a>) -> Result<T> + Send + Sync,
{
    let parent = Span::current();
    let subscriber = dispatcher::get_default(Dispatch::clone);
    let run_one = |(partition, slab): (Partition, CellSlab<'a>)| {
        dispatcher::with_default(&subscriber, || parent.in_scope(|| task(partition, slab)))
    };

    let outcome = if jobs.len() <= 1 {
        panic::catch_unwind(AssertUnwindSafe(|| {
            jobs.into_iter().map(run_one).collect::<Result<Vec<T>>>()
        }))
    } else {
        let pool = ThreadPoolBuilder::new()
            .num_threads(jobs.len())
            .thread_name(|index| format!("percolate-worker-{index}"))
            .build()
            .map_err(|err| ClusterError::WorkerPool {
                reason: Arc::from(err.to_string()),
            })?;
        panic::catch_unwind(AssertUnwindSafe(|| {
            pool.install(|| jobs.into_par_iter().map(run_one).collect::<Result<Vec<T>>>())
        }))
    };

    outcome.map_err(|payload| ClusterError::WorkerPanicked {
        message: panic_message(payload.as_ref()),
    })?
}

fn panic_message(payload: &(dyn Any + Send)) -> Arc<str> {
    payload
        .downcast_ref::<&str>()
        .map(|message| Arc::from(*message))
        .or_else(|| {
            payload
                .downcast_ref::<String>()
                .map(|message| Arc::from(message.as_str()))
        })
        .unwrap_or_else(|| Arc::from("non-string panic payload"))
}

/// Labels the clusters of `grid` using `worker_count` workers.
///
/// Shorthand for building a [`Clusterizer`] with
/// [`ClusterizerBuilder::with_workers`] and running it once.
///
/// # Errors
/// Returns [`ClusterError::InvalidWorkerCount`] when `worker_count` is zero,
/// and any error of [`Clusterizer::run`].
///
/// # Examples
/// ```
/// use percolate_core::{Grid, clusterize};
///
/// let grid = Grid::from_rows(vec![vec![true, false, true]]).expect("grid is rectangular");
/// let labeled = clusterize(grid, 1).expect("run must succeed");
/// assert_eq!(labeled.labels().as_slice(), &[1, 0, 2]);
/// ```
pub fn clusterize(grid: Grid<bool>, worker_count: usize) -> Result<LabeledGrid> {
    ClusterizerBuilder::new()
        .with_workers(worker_count)
        .build()?
        .run(&grid)
}
