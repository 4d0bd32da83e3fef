//! Textual grid format read and written by the CLI.
//!
//! Rows are separated by newlines or `;`, cells by `,`. Each cell is an
//! integer and any nonzero value marks the cell as occupied. Blank rows are
//! ignored, so trailing newlines and `;` terminators are accepted.

use std::io::{self, Write};

use percolate_core::{ClusterError, Grid};
use thiserror::Error;

/// Errors raised while parsing the textual grid format.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridTextError {
    /// A cell did not hold an integer.
    #[error("cell ({row}, {col}) is not an integer: `{value}`")]
    InvalidCell {
        /// Zero-based row of the cell, counting non-blank rows only.
        row: usize,
        /// Zero-based column of the cell.
        col: usize,
        /// Raw cell text after trimming.
        value: String,
    },
    /// The rows do not form a non-empty rectangle.
    #[error(transparent)]
    Shape(#[from] ClusterError),
}

/// Parses an occupancy grid.
///
/// # Errors
/// Returns [`GridTextError::InvalidCell`] when a cell is not an integer and
/// [`GridTextError::Shape`] when the rows are empty or ragged.
///
/// # Examples
/// ```
/// use percolate_cli::grid_text::parse_grid;
///
/// let grid = parse_grid("1,0,1;0,0,2\n").expect("grid parses");
/// assert_eq!((grid.rows(), grid.cols()), (2, 3));
/// assert_eq!(grid.occupied_count(), 3);
/// ```
pub fn parse_grid(text: &str) -> Result<Grid<bool>, GridTextError> {
    let rows = text
        .split(['\n', ';'])
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .enumerate()
        .map(|(row, line)| parse_row(row, line))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Grid::from_rows(rows)?)
}

fn parse_row(row: usize, line: &str) -> Result<Vec<bool>, GridTextError> {
    line.split(',')
        .map(str::trim)
        .enumerate()
        .map(|(col, value)| {
            value
                .parse::<i64>()
                .map(|cell| cell != 0)
                .map_err(|_| GridTextError::InvalidCell {
                    row,
                    col,
                    value: value.to_owned(),
                })
        })
        .collect()
}

/// Writes an occupancy grid as `0`/`1` cells, one row per line.
///
/// # Errors
/// Returns [`io::Error`] if writing to `writer` fails.
pub fn write_occupancy(grid: &Grid<bool>, writer: impl Write) -> io::Result<()> {
    write_rows(grid.iter_rows(), writer, |&cell| u8::from(cell))
}

/// Writes a label grid, one row per line.
///
/// # Errors
/// Returns [`io::Error`] if writing to `writer` fails.
pub fn write_labels(grid: &Grid<u32>, writer: impl Write) -> io::Result<()> {
    write_rows(grid.iter_rows(), writer, |&label| label)
}

fn write_rows<'a, T: 'a, D: std::fmt::Display>(
    rows: impl Iterator<Item = &'a [T]>,
    mut writer: impl Write,
    render: impl Fn(&T) -> D,
) -> io::Result<()> {
    for row in rows {
        let mut cells = row.iter();
        if let Some(first) = cells.next() {
            write!(writer, "{}", render(first))?;
        }
        for cell in cells {
            write!(writer, ",{}", render(cell))?;
        }
        writeln!(writer)?;
    }
    Ok(())
}
