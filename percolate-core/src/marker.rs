//! Raster labeling pass over one row partition.
//!
//! The marker reads only the occupancy grid and writes only its own slab, so
//! any number of markers can run concurrently. Neighbor decisions are taken
//! from occupancy, never from labels computed by another worker. Cells whose
//! north neighbor lives in the partition above are recorded as seams and
//! reconciled by [`crate::merge`] once every worker has finished.

use tracing::{debug, instrument};

use crate::{
    Result,
    cell::{Cell, CellSlab, Label},
    grid::{Coord, Grid},
    merge::EquivalencePair,
    partition::Partition,
    union_find::{LabelAllocator, UnionFind},
};

/// Output of one marker, merged with the others after the join.
#[derive(Debug, Default)]
pub(crate) struct MarkedPartition {
    /// Label unions discovered inside the partition.
    pub(crate) equivalences: Vec<EquivalencePair>,
    /// Cluster centers in row-major order.
    pub(crate) origins: Vec<(Label, Coord)>,
    /// First-row cells whose north neighbor belongs to another partition.
    pub(crate) seams: Vec<Coord>,
}

pub(crate) struct CellMarker<'a> {
    occupancy: &'a Grid<bool>,
    partition: Partition,
    allocator: &'a LabelAllocator,
}

impl<'a> CellMarker<'a> {
    pub(crate) fn new(
        occupancy: &'a Grid<bool>,
        partition: Partition,
        allocator: &'a LabelAllocator,
    ) -> Self {
        Self {
            occupancy,
            partition,
            allocator,
        }
    }

    fn occupied(&self, row: usize, col: usize) -> bool {
        self.occupancy.get(row, col).copied().unwrap_or(false)
    }

    /// Labels every cell of the partition into `slab`.
    ///
    /// `slab` must cover exactly the partition's rows.
    #[instrument(
        name = "core.mark_partition",
        level = "debug",
        err,
        skip(self, slab),
        fields(
            partition = self.partition.index(),
            start = self.partition.start(),
            end = self.partition.end(),
        ),
    )]
    pub(crate) fn mark(&self, mut slab: CellSlab<'_>) -> Result<MarkedPartition> {
        let start = self.partition.start();
        debug_assert_eq!(
            (slab.first_row(), slab.end_row()),
            (start, self.partition.end())
        );
        let cols = self.occupancy.cols();
        let mut forest = UnionFind::new();
        let mut marked = MarkedPartition::default();

        for row in start..self.partition.end() {
            for col in 0..cols {
                let here = Coord::new(row, col);
                if !self.occupied(row, col) {
                    slab.set(here, Cell::Empty);
                    continue;
                }

                let north = (row > start && self.occupied(row - 1, col))
                    .then(|| Coord::new(row - 1, col));
                let west = (col > 0 && self.occupied(row, col - 1)).then(|| Coord::new(row, col - 1));

                let cell = match (north, west) {
                    (None, None) => {
                        let label = forest.make_new_cluster(self.allocator)?;
                        marked.origins.push((label, here));
                        Cell::Label(label)
                    }
                    (Some(neighbor), None) | (None, Some(neighbor)) => Cell::RefTo(neighbor),
                    (Some(north_coord), Some(west_coord)) => {
                        let (_, north_label) = slab.terminal(north_coord)?;
                        let (_, west_label) = slab.terminal(west_coord)?;
                        let north_root = forest.find(north_label);
                        let west_root = forest.find(west_label);
                        if north_root != west_root {
                            forest.union(north_root, west_root);
                            marked
                                .equivalences
                                .push(EquivalencePair::new(north_root, west_root));
                        }
                        Cell::RefTo(west_coord)
                    }
                };
                slab.set(here, cell);

                if row == start && row > 0 && self.occupied(row - 1, col) {
                    marked.seams.push(here);
                }
            }
        }

        debug!(
            clusters = marked.origins.len(),
            unions = marked.equivalences.len(),
            seams = marked.seams.len(),
            "partition marked"
        );
        Ok(marked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::num::NonZeroUsize;

    use crate::{cell::split_slabs, partition::partition_rows};

    fn grid(rows: &[&[u8]]) -> Grid<bool> {
        Grid::from_rows(
            rows.iter()
                .map(|row| row.iter().map(|&value| value != 0).collect())
                .collect(),
        )
        .expect("test grids are rectangular")
    }

    fn mark_all(occupancy: &Grid<bool>, workers: usize) -> (Vec<Cell>, Vec<MarkedPartition>) {
        let partitions = partition_rows(
            occupancy.rows(),
            NonZeroUsize::new(workers).expect("non-zero"),
        );
        let allocator = LabelAllocator::new();
        let mut cells = vec![Cell::Empty; occupancy.len()];
        let slabs = split_slabs(
            &mut cells,
            Partition::ranges(&partitions),
            occupancy.cols(),
        );
        let marked = partitions
            .iter()
            .zip(slabs)
            .map(|(partition, slab)| {
                CellMarker::new(occupancy, *partition, &allocator)
                    .mark(slab)
                    .expect("marking succeeds")
            })
            .collect();
        (cells, marked)
    }

    #[test]
    fn lone_cells_become_cluster_centers() {
        let occupancy = grid(&[&[1, 0, 1]]);
        let (cells, marked) = mark_all(&occupancy, 1);
        assert_eq!(cells, vec![Cell::Label(1), Cell::Empty, Cell::Label(2)]);
        assert_eq!(
            marked[0].origins,
            vec![(1, Coord::new(0, 0)), (2, Coord::new(0, 2))]
        );
    }

    #[test]
    fn single_neighbors_become_references() {
        let occupancy = grid(&[&[1, 1], &[1, 0]]);
        let (cells, _) = mark_all(&occupancy, 1);
        assert_eq!(
            cells,
            vec![
                Cell::Label(1),
                Cell::RefTo(Coord::new(0, 0)),
                Cell::RefTo(Coord::new(0, 0)),
                Cell::Empty,
            ]
        );
    }

    #[test]
    fn joining_cells_union_and_reference_west() {
        // 1 0 1
        // 1 1 1
        let occupancy = grid(&[&[1, 0, 1], &[1, 1, 1]]);
        let (cells, marked) = mark_all(&occupancy, 1);
        assert_eq!(cells[5], Cell::RefTo(Coord::new(1, 1)));
        assert_eq!(marked[0].equivalences, vec![EquivalencePair::new(2, 1)]);
    }

    #[test]
    fn first_rows_of_later_partitions_record_seams() {
        // 1 1
        // 1 0
        // 1 1
        let occupancy = grid(&[&[1, 1], &[1, 0], &[1, 1]]);
        let (cells, marked) = mark_all(&occupancy, 3);
        assert!(marked[0].seams.is_empty());
        assert_eq!(marked[1].seams, vec![Coord::new(1, 0)]);
        assert_eq!(marked[2].seams, vec![Coord::new(2, 0)]);
        assert!(matches!(cells[2], Cell::Label(_)));
        assert!(matches!(cells[4], Cell::Label(_)));
    }

    #[test]
    fn labels_are_unique_across_partitions() {
        let occupancy = grid(&[&[1, 0, 1], &[1, 0, 1], &[0, 1, 0], &[1, 0, 1]]);
        let (_, marked) = mark_all(&occupancy, 4);
        let mut labels: Vec<Label> = marked
            .iter()
            .flat_map(|partition| partition.origins.iter().map(|(label, _)| *label))
            .collect();
        let total = labels.len();
        labels.sort_unstable();
        labels.dedup();
        assert_eq!(labels.len(), total);
    }
}
