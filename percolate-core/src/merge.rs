//! Boundary merging and global relabeling.
//!
//! Both phases run on a single thread after every marker has joined. The
//! boundary merger turns seam cells into label equivalences; the relabeler
//! closes those equivalences into clusters and rewrites each cluster center
//! with its final label. Ordinary cells are left as references and picked up
//! by [`crate::resolve`].

use std::collections::HashMap;

use tracing::{debug, instrument};

use crate::{
    Result,
    cell::{Cell, CellSlab, Label},
    error::ClusterError,
    grid::Coord,
    union_find::UnionFind,
};

/// Two labels known to belong to the same cluster, stored as `(low, high)`.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub(crate) struct EquivalencePair {
    low: Label,
    high: Label,
}

impl EquivalencePair {
    pub(crate) const fn new(left: Label, right: Label) -> Self {
        if left <= right {
            Self { low: left, high: right }
        } else {
            Self { low: right, high: left }
        }
    }

    #[rustfmt::skip]
    pub(crate) const fn low(self) -> Label { self.low }

    #[rustfmt::skip]
    pub(crate) const fn high(self) -> Label { self.high }
}

/// Outcome of [`relabel`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Relabeling {
    /// Number of distinct clusters.
    pub(crate) cluster_count: usize,
    /// Cluster centers whose label changed.
    pub(crate) rewritten: usize,
}

/// Records the equivalence between every seam cell and the cell above it.
///
/// Returns the number of pairs added to `pairs`.
#[instrument(
    name = "core.merge",
    err,
    skip(grid, seams, pairs),
    fields(seams = seams.len()),
)]
pub(crate) fn merge_seams(
    grid: &mut CellSlab<'_>,
    seams: &[Coord],
    pairs: &mut Vec<EquivalencePair>,
) -> Result<usize> {
    let before = pairs.len();
    for &seam in seams {
        let north_row = seam
            .row()
            .checked_sub(1)
            .ok_or(ClusterError::DanglingReference {
                row: seam.row(),
                col: seam.col(),
            })?;
        let (_, own) = grid.terminal(seam)?;
        let (_, above) = grid.terminal(Coord::new(north_row, seam.col()))?;
        if own != above {
            pairs.push(EquivalencePair::new(own, above));
        }
    }
    Ok(pairs.len() - before)
}

/// Assigns every cluster its final label and rewrites the cluster centers.
///
/// Clusters are the connected components of `pairs` over the labels in
/// `origins`; each is represented by its smallest label while closing the
/// components. Final labels run from 1 in the row-major order of the
/// clusters' first centers, which requires `origins` to be row-major.
#[instrument(
    name = "core.relabel",
    level = "debug",
    err,
    skip(grid, origins, pairs),
    fields(origins = origins.len(), pairs = pairs.len()),
)]
pub(crate) fn relabel(
    grid: &mut CellSlab<'_>,
    origins: &[(Label, Coord)],
    pairs: &[EquivalencePair],
) -> Result<Relabeling> {
    debug_assert!(origins.windows(2).all(|window| match window {
        [(_, left), (_, right)] => left < right,
        _ => true,
    }));

    let mut forest = UnionFind::with_capacity(origins.len());
    for &(label, _) in origins {
        forest.make_set(label);
    }
    for pair in pairs {
        forest.union(pair.low(), pair.high());
    }

    let mut final_labels: HashMap<Label, Label> = HashMap::new();
    let mut rewritten = 0usize;
    for &(label, center) in origins {
        let canonical = forest.find(label);
        let next = Label::try_from(final_labels.len() + 1)
            .map_err(|_| ClusterError::LabelSpaceExhausted)?;
        let final_label = *final_labels.entry(canonical).or_insert(next);

        if grid.get(center) != Some(Cell::Label(final_label)) {
            if !grid.set(center, Cell::Label(final_label)) {
                return Err(ClusterError::DanglingReference {
                    row: center.row(),
                    col: center.col(),
                });
            }
            rewritten += 1;
        }
    }

    debug!(
        clusters = final_labels.len(),
        rewritten, "cluster centers relabeled"
    );
    Ok(Relabeling {
        cluster_count: final_labels.len(),
        rewritten,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pairs_are_normalised() {
        let pair = EquivalencePair::new(9, 4);
        assert_eq!((pair.low(), pair.high()), (4, 9));
        assert_eq!(pair, EquivalencePair::new(4, 9));
    }

    /// A fully occupied 2x2 grid marked as two one-row partitions.
    fn two_partition_cells() -> Vec<Cell> {
        vec![
            Cell::Label(1),
            Cell::RefTo(Coord::new(0, 0)),
            Cell::Label(3),
            Cell::RefTo(Coord::new(1, 0)),
        ]
    }

    #[test]
    fn seams_pair_labels_across_partitions() {
        let mut cells = two_partition_cells();
        let mut grid = CellSlab::new(&mut cells, 0, 2);
        let mut pairs = Vec::new();

        let added = merge_seams(
            &mut grid,
            &[Coord::new(1, 0), Coord::new(1, 1)],
            &mut pairs,
        )
        .expect("seams resolve");

        assert_eq!(added, 2);
        assert_eq!(
            pairs,
            vec![EquivalencePair::new(1, 3), EquivalencePair::new(1, 3)]
        );
    }

    #[test]
    fn seams_on_the_first_row_are_rejected() {
        let mut cells = two_partition_cells();
        let mut grid = CellSlab::new(&mut cells, 0, 2);
        let err = merge_seams(&mut grid, &[Coord::new(0, 1)], &mut Vec::new())
            .expect_err("row 0 has nothing above it");
        assert_eq!(err, ClusterError::DanglingReference { row: 0, col: 1 });
    }

    #[test]
    fn relabel_compacts_labels_in_row_major_order() {
        // 7 . 5
        // . . .
        // 9 . .
        let mut cells = vec![
            Cell::Label(7),
            Cell::Empty,
            Cell::Label(5),
            Cell::Empty,
            Cell::Empty,
            Cell::Empty,
            Cell::Label(9),
            Cell::Empty,
            Cell::Empty,
        ];
        let origins = [
            (7, Coord::new(0, 0)),
            (5, Coord::new(0, 2)),
            (9, Coord::new(2, 0)),
        ];
        let mut grid = CellSlab::new(&mut cells, 0, 3);
        let relabeling = relabel(&mut grid, &origins, &[EquivalencePair::new(7, 9)])
            .expect("relabel succeeds");

        assert_eq!(relabeling.cluster_count, 2);
        assert_eq!(relabeling.rewritten, 3);
        assert_eq!(grid.get(Coord::new(0, 0)), Some(Cell::Label(1)));
        assert_eq!(grid.get(Coord::new(0, 2)), Some(Cell::Label(2)));
        assert_eq!(grid.get(Coord::new(2, 0)), Some(Cell::Label(1)));
    }

    #[test]
    fn relabel_closes_transitive_equivalences() {
        let mut cells = vec![Cell::Label(4), Cell::Label(2), Cell::Label(3), Cell::Label(1)];
        let origins = [
            (4, Coord::new(0, 0)),
            (2, Coord::new(0, 1)),
            (3, Coord::new(0, 2)),
            (1, Coord::new(0, 3)),
        ];
        let pairs = [EquivalencePair::new(4, 3), EquivalencePair::new(3, 1)];
        let mut grid = CellSlab::new(&mut cells, 0, 4);
        let relabeling = relabel(&mut grid, &origins, &pairs).expect("relabel succeeds");

        assert_eq!(relabeling.cluster_count, 2);
        assert_eq!(
            cells,
            vec![Cell::Label(1), Cell::Label(2), Cell::Label(1), Cell::Label(1)]
        );
    }

    #[test]
    fn relabel_leaves_final_centers_untouched() {
        let mut cells = vec![Cell::Label(1), Cell::Empty, Cell::Label(2)];
        let origins = [(1, Coord::new(0, 0)), (2, Coord::new(0, 2))];
        let mut grid = CellSlab::new(&mut cells, 0, 3);
        let relabeling = relabel(&mut grid, &origins, &[]).expect("relabel succeeds");
        assert_eq!(relabeling.rewritten, 0);
    }
}
