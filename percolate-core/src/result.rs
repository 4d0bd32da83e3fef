//! Result types for clustering runs.
//!
//! Provides the labeled grid produced by [`crate::Clusterizer::run`] and the
//! validation of its label invariants.

use std::collections::{BTreeMap, BTreeSet};

use thiserror::Error;

use crate::{
    grid::Grid,
    spanning::{Axis, SpanResult, classify_spanning},
};

/// Grid of cluster labels in normal form.
///
/// Empty cells hold `0`; occupied cells hold a label in `1..=cluster_count`.
///
/// # Examples
/// ```
/// use percolate_core::{Grid, LabeledGrid};
///
/// let labels = Grid::from_rows(vec![vec![1, 0], vec![0, 2]]).expect("rectangular");
/// let grid = LabeledGrid::try_from_labels(labels).expect("labels are contiguous");
/// assert_eq!(grid.cluster_count(), 2);
/// assert_eq!(grid.label(1, 1), Some(2));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledGrid {
    labels: Grid<u32>,
    cluster_count: usize,
}

/// Error returned when a label grid is not numbered `1..=K`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NonContiguousLabels {
    /// Occupied cells exist but none carries label `1`.
    #[error("cluster labels must start at 1")]
    MissingOne,
    /// The labels skip a value.
    #[error("cluster labels must be contiguous without gaps (missing {missing})")]
    Gap {
        /// Smallest label absent from the grid.
        missing: u32,
    },
}

impl LabeledGrid {
    /// Wraps labels produced by a run whose cluster count is already known.
    pub(crate) const fn from_parts(labels: Grid<u32>, cluster_count: usize) -> Self {
        Self {
            labels,
            cluster_count,
        }
    }

    /// Attempts to build a labeled grid from raw labels.
    ///
    /// An all-zero grid is accepted and yields `cluster_count == 0`.
    ///
    /// # Errors
    /// Returns [`NonContiguousLabels::MissingOne`] when label `1` is absent
    /// from a grid with occupied cells, and [`NonContiguousLabels::Gap`] when
    /// the labels skip a value.
    ///
    /// # Examples
    /// ```
    /// use percolate_core::{Grid, LabeledGrid, NonContiguousLabels};
    ///
    /// let labels = Grid::from_rows(vec![vec![1, 0, 3]]).expect("rectangular");
    /// assert_eq!(
    ///     LabeledGrid::try_from_labels(labels),
    ///     Err(NonContiguousLabels::Gap { missing: 2 }),
    /// );
    /// ```
    pub fn try_from_labels(labels: Grid<u32>) -> Result<Self, NonContiguousLabels> {
        let seen: BTreeSet<u32> = labels
            .as_slice()
            .iter()
            .copied()
            .filter(|&label| label != 0)
            .collect();

        if !seen.is_empty() && !seen.contains(&1) {
            return Err(NonContiguousLabels::MissingOne);
        }
        if let Some(missing) = (1u32..)
            .zip(&seen)
            .find_map(|(expected, &label)| (expected != label).then_some(expected))
        {
            return Err(NonContiguousLabels::Gap { missing });
        }

        Ok(Self {
            cluster_count: seen.len(),
            labels,
        })
    }

    /// Returns the label grid.
    #[must_use]
    pub const fn labels(&self) -> &Grid<u32> {
        &self.labels
    }

    /// Consumes the result, returning the label grid.
    #[must_use]
    pub fn into_labels(self) -> Grid<u32> {
        self.labels
    }

    /// Number of rows.
    #[rustfmt::skip]
    #[must_use]
    pub fn rows(&self) -> usize { self.labels.rows() }

    /// Number of columns.
    #[rustfmt::skip]
    #[must_use]
    pub fn cols(&self) -> usize { self.labels.cols() }

    /// Label at `(row, col)`, `0` for empty cells, `None` out of bounds.
    #[must_use]
    pub fn label(&self, row: usize, col: usize) -> Option<u32> {
        self.labels.get(row, col).copied()
    }

    /// Cluster containing `(row, col)`, if the cell is occupied.
    #[must_use]
    pub fn cluster_at(&self, row: usize, col: usize) -> Option<ClusterLabel> {
        self.label(row, col)
            .filter(|&label| label != 0)
            .map(ClusterLabel::new)
    }

    /// Number of distinct clusters.
    #[must_use]
    pub const fn cluster_count(&self) -> usize {
        self.cluster_count
    }

    /// See [`cluster_sizes`].
    #[must_use]
    pub fn cluster_sizes(&self) -> BTreeMap<ClusterLabel, usize> {
        cluster_sizes(self)
    }

    /// See [`classify_spanning`].
    #[must_use]
    pub fn spanning(&self, axis: Axis) -> SpanResult {
        classify_spanning(self, axis)
    }
}

/// Counts the cells of every cluster.
///
/// The sizes sum to the number of occupied cells.
///
/// # Examples
/// ```
/// use percolate_core::{ClusterLabel, Grid, LabeledGrid, cluster_sizes};
///
/// let labels = Grid::from_rows(vec![vec![1, 1, 0], vec![0, 0, 2]]).expect("rectangular");
/// let grid = LabeledGrid::try_from_labels(labels).expect("labels are contiguous");
/// let sizes = cluster_sizes(&grid);
/// assert_eq!(sizes[&ClusterLabel::new(1)], 2);
/// assert_eq!(sizes[&ClusterLabel::new(2)], 1);
/// ```
#[must_use]
pub fn cluster_sizes(grid: &LabeledGrid) -> BTreeMap<ClusterLabel, usize> {
    let mut sizes = BTreeMap::new();
    for &label in grid.labels.as_slice() {
        if label != 0 {
            *sizes.entry(ClusterLabel::new(label)).or_insert(0) += 1;
        }
    }
    sizes
}

/// Identifier of a cluster in a [`LabeledGrid`].
///
/// # Examples
/// ```
/// use percolate_core::ClusterLabel;
///
/// let label = ClusterLabel::new(4);
/// assert_eq!(label.get(), 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClusterLabel(u32);

impl ClusterLabel {
    /// Wraps a raw label.
    #[rustfmt::skip]
    #[must_use]
    pub const fn new(label: u32) -> Self { Self(label) }

    /// Returns the raw label.
    #[rustfmt::skip]
    #[must_use]
    pub const fn get(self) -> u32 { self.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    fn labels(rows: &[&[u32]]) -> Grid<u32> {
        Grid::from_rows(rows.iter().map(|row| row.to_vec()).collect()).expect("rectangular")
    }

    #[rstest]
    #[case::all_empty(vec![vec![0, 0], vec![0, 0]], 0)]
    #[case::one_cluster(vec![vec![1, 1], vec![0, 1]], 1)]
    #[case::unordered(vec![vec![2, 0], vec![0, 1]], 2)]
    fn contiguous_labels_are_accepted(#[case] rows: Vec<Vec<u32>>, #[case] expected: usize) {
        let grid = Grid::from_rows(rows).expect("rectangular");
        let labeled = LabeledGrid::try_from_labels(grid).expect("contiguous");
        assert_eq!(labeled.cluster_count(), expected);
    }

    #[rstest]
    #[case::missing_one(vec![vec![2, 0, 3]], NonContiguousLabels::MissingOne)]
    #[case::gap(vec![vec![1, 0, 4], vec![2, 0, 0]], NonContiguousLabels::Gap { missing: 3 })]
    fn gaps_are_rejected(#[case] rows: Vec<Vec<u32>>, #[case] expected: NonContiguousLabels) {
        let grid = Grid::from_rows(rows).expect("rectangular");
        assert_eq!(LabeledGrid::try_from_labels(grid), Err(expected));
    }

    #[test]
    fn cluster_at_skips_empty_cells() {
        let grid = LabeledGrid::try_from_labels(labels(&[&[1, 0]])).expect("contiguous");
        assert_eq!(grid.cluster_at(0, 0), Some(ClusterLabel::new(1)));
        assert_eq!(grid.cluster_at(0, 1), None);
        assert_eq!(grid.cluster_at(5, 0), None);
    }

    #[test]
    fn sizes_count_every_occupied_cell() {
        let grid = LabeledGrid::try_from_labels(labels(&[&[1, 1, 0], &[2, 0, 1]]))
            .expect("contiguous");
        let sizes = grid.cluster_sizes();
        assert_eq!(sizes.values().sum::<usize>(), 4);
        assert_eq!(sizes.get(&ClusterLabel::new(1)), Some(&3));
        assert_eq!(sizes.get(&ClusterLabel::new(2)), Some(&1));
    }
}
