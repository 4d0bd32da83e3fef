//! Rectangular grids stored row-major in a flat buffer.
//!
//! [`Grid`] is the input and output container of the library. Every
//! constructor validates the shape, so a `Grid` value always has at least one
//! row and one column and exactly `rows * cols` cells.

use crate::{Result, error::ClusterError};

/// Coordinate of a cell within a grid.
///
/// # Examples
/// ```
/// use percolate_core::Coord;
///
/// let coord = Coord::new(2, 5);
/// assert_eq!((coord.row(), coord.col()), (2, 5));
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Coord {
    row: usize,
    col: usize,
}

impl Coord {
    /// Creates a coordinate from a row and column index.
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Returns the row index.
    #[must_use]
    #[rustfmt::skip]
    pub const fn row(self) -> usize { self.row }

    /// Returns the column index.
    #[must_use]
    #[rustfmt::skip]
    pub const fn col(self) -> usize { self.col }
}

/// Rectangular, non-empty grid of values.
///
/// # Examples
/// ```
/// use percolate_core::Grid;
///
/// let grid = Grid::from_rows(vec![vec![true, false], vec![false, true]])
///     .expect("rows are rectangular");
/// assert_eq!((grid.rows(), grid.cols()), (2, 2));
/// assert_eq!(grid.get(1, 1), Some(&true));
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Grid<T> {
    rows: usize,
    cols: usize,
    cells: Vec<T>,
}

impl<T> Grid<T> {
    /// Builds a grid from nested rows.
    ///
    /// # Errors
    /// Returns [`ClusterError::EmptyGrid`] when there are no rows or the first
    /// row is empty, and [`ClusterError::RaggedRows`] when a row's length
    /// differs from the first row's.
    ///
    /// # Examples
    /// ```
    /// use percolate_core::{ClusterError, Grid};
    ///
    /// let err = Grid::from_rows(vec![vec![1, 2], vec![3]]).expect_err("ragged");
    /// assert!(matches!(err, ClusterError::RaggedRows { row: 1, expected: 2, actual: 1 }));
    /// ```
    pub fn from_rows(rows: Vec<Vec<T>>) -> Result<Self> {
        let row_count = rows.len();
        let cols = rows.first().map_or(0, Vec::len);
        if row_count == 0 || cols == 0 {
            return Err(ClusterError::EmptyGrid {
                rows: row_count,
                cols,
            });
        }

        let mut cells = Vec::with_capacity(row_count.saturating_mul(cols));
        for (index, row) in rows.into_iter().enumerate() {
            if row.len() != cols {
                return Err(ClusterError::RaggedRows {
                    row: index,
                    expected: cols,
                    actual: row.len(),
                });
            }
            cells.extend(row);
        }

        Ok(Self {
            rows: row_count,
            cols,
            cells,
        })
    }

    /// Builds a grid from a row-major cell buffer.
    ///
    /// # Errors
    /// Returns [`ClusterError::EmptyGrid`] when either dimension is zero and
    /// [`ClusterError::CellCountMismatch`] when `cells.len() != rows * cols`.
    ///
    /// # Examples
    /// ```
    /// use percolate_core::Grid;
    ///
    /// let grid = Grid::from_vec(2, 3, vec![0u32; 6]).expect("six cells fit 2x3");
    /// assert_eq!(grid.row(1), Some(&[0, 0, 0][..]));
    /// ```
    pub fn from_vec(rows: usize, cols: usize, cells: Vec<T>) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(ClusterError::EmptyGrid { rows, cols });
        }
        if rows.checked_mul(cols) != Some(cells.len()) {
            return Err(ClusterError::CellCountMismatch {
                rows,
                cols,
                cells: cells.len(),
            });
        }
        Ok(Self { rows, cols, cells })
    }

    /// Returns the number of rows.
    #[must_use]
    #[rustfmt::skip]
    pub const fn rows(&self) -> usize { self.rows }

    /// Returns the number of columns.
    #[must_use]
    #[rustfmt::skip]
    pub const fn cols(&self) -> usize { self.cols }

    /// Returns the total number of cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always `false`; grids hold at least one cell.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Returns the cell at `(row, col)`, or `None` when out of bounds.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<&T> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.cells.get(row * self.cols + col)
    }

    /// Returns the cell at `coord`, or `None` when out of bounds.
    #[must_use]
    pub fn at(&self, coord: Coord) -> Option<&T> {
        self.get(coord.row(), coord.col())
    }

    /// Returns one row as a slice, or `None` when out of bounds.
    #[must_use]
    pub fn row(&self, row: usize) -> Option<&[T]> {
        if row >= self.rows {
            return None;
        }
        let start = row * self.cols;
        self.cells.get(start..start + self.cols)
    }

    /// Iterates over the rows in order.
    pub fn iter_rows(&self) -> impl ExactSizeIterator<Item = &[T]> + '_ {
        self.cells.chunks_exact(self.cols)
    }

    /// Iterates over one column from top to bottom.
    ///
    /// Yields nothing when `col` is out of bounds.
    pub fn column(&self, col: usize) -> impl Iterator<Item = &T> + '_ {
        let take = if col < self.cols { self.rows } else { 0 };
        self.cells.iter().skip(col).step_by(self.cols).take(take)
    }

    /// Returns the row-major cell buffer.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.cells
    }

    /// Consumes the grid, returning its row-major cell buffer.
    #[must_use]
    pub fn into_vec(self) -> Vec<T> {
        self.cells
    }

    /// Applies `f` to every cell, keeping the shape.
    #[must_use]
    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> Grid<U> {
        Grid {
            rows: self.rows,
            cols: self.cols,
            cells: self.cells.iter().map(f).collect(),
        }
    }
}

impl Grid<bool> {
    /// Counts occupied cells.
    ///
    /// # Examples
    /// ```
    /// use percolate_core::Grid;
    ///
    /// let grid = Grid::from_rows(vec![vec![true, false, true]]).expect("valid");
    /// assert_eq!(grid.occupied_count(), 2);
    /// ```
    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|&&cell| cell).count()
    }
}
