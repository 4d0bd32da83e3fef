//! Working cells of a clustering run and reference-chain walking.

use crate::{Result, error::ClusterError, grid::Coord};

/// Cluster label. `0` is reserved for empty cells in published grids.
pub(crate) type Label = u32;

/// State of one cell while a run is in progress.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) enum Cell {
    /// Unoccupied, or not yet visited.
    #[default]
    Empty,
    /// Cluster center holding a concrete label.
    Label(Label),
    /// The label is whatever the referenced cell resolves to.
    RefTo(Coord),
}

/// Mutable view over a contiguous band of rows addressed by global
/// coordinates.
///
/// Workers receive one slab per partition; the sequential phases use a slab
/// spanning the whole grid.
#[derive(Debug)]
pub(crate) struct CellSlab<'a> {
    cells: &'a mut [Cell],
    first_row: usize,
    cols: usize,
}

impl<'a> CellSlab<'a> {
    pub(crate) const fn new(cells: &'a mut [Cell], first_row: usize, cols: usize) -> Self {
        Self {
            cells,
            first_row,
            cols,
        }
    }

    pub(crate) const fn first_row(&self) -> usize {
        self.first_row
    }

    pub(crate) fn end_row(&self) -> usize {
        self.first_row + self.cells.len().checked_div(self.cols).unwrap_or(0)
    }

    fn index(&self, coord: Coord) -> Option<usize> {
        if coord.row() < self.first_row || coord.col() >= self.cols {
            return None;
        }
        let index = (coord.row() - self.first_row) * self.cols + coord.col();
        (index < self.cells.len()).then_some(index)
    }

    pub(crate) fn get(&self, coord: Coord) -> Option<Cell> {
        self.index(coord)
            .and_then(|index| self.cells.get(index).copied())
    }

    /// Writes `cell` at `coord`. Writes outside the slab are ignored and
    /// reported as `false`.
    pub(crate) fn set(&mut self, coord: Coord, cell: Cell) -> bool {
        self.index(coord)
            .and_then(|index| self.cells.get_mut(index))
            .map(|slot| *slot = cell)
            .is_some()
    }

    /// Follows the reference chain from `start` to its cluster center.
    ///
    /// Every reference visited on the way is rewritten to point at the center
    /// directly, so later walks through the same cells take one step.
    ///
    /// # Errors
    /// Returns [`ClusterError::DanglingReference`] when the chain reaches an
    /// empty cell or leaves the slab, and [`ClusterError::ReferenceCycle`]
    /// when it is longer than the slab has cells.
    pub(crate) fn terminal(&mut self, start: Coord) -> Result<(Coord, Label)> {
        let dangling = ClusterError::DanglingReference {
            row: start.row(),
            col: start.col(),
        };
        let limit = self.cells.len();
        let mut steps = 0usize;
        let mut current = start;
        let (center, label) = loop {
            match self.get(current) {
                Some(Cell::Label(label)) => break (current, label),
                Some(Cell::RefTo(next)) => {
                    steps += 1;
                    if steps > limit {
                        return Err(ClusterError::ReferenceCycle {
                            row: start.row(),
                            col: start.col(),
                        });
                    }
                    current = next;
                }
                Some(Cell::Empty) | None => return Err(dangling),
            }
        };

        let mut cursor = start;
        while cursor != center {
            let Some(Cell::RefTo(next)) = self.get(cursor) else {
                break;
            };
            self.set(cursor, Cell::RefTo(center));
            cursor = next;
        }

        Ok((center, label))
    }

    /// Coordinates covered by the slab in row-major order.
    pub(crate) fn coords(&self) -> impl Iterator<Item = Coord> + use<> {
        let cols = self.cols;
        (self.first_row..self.end_row())
            .flat_map(move |row| (0..cols).map(move |col| Coord::new(row, col)))
    }
}

/// Splits a row-major cell buffer into one slab per `(start, end)` row range.
///
/// Ranges must be sorted, contiguous and start at row 0.
pub(crate) fn split_slabs<'a>(
    mut cells: &'a mut [Cell],
    ranges: impl IntoIterator<Item = (usize, usize)>,
    cols: usize,
) -> Vec<CellSlab<'a>> {
    let mut slabs = Vec::new();
    for (start, end) in ranges {
        let len = (end - start) * cols;
        let (head, tail) = cells.split_at_mut(len.min(cells.len()));
        slabs.push(CellSlab::new(head, start, cols));
        cells = tail;
    }
    slabs
}
