//! Detection of clusters that connect opposite edges of a grid.

use std::collections::BTreeSet;

use crate::result::LabeledGrid;

/// Direction along which spanning is checked.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Axis {
    /// First row to last row.
    Rows,
    /// First column to last column.
    Columns,
    /// Both of the above, reported independently.
    Both,
}

/// Outcome of [`classify_spanning`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum SpanResult {
    /// No cluster connects opposite edges on a checked axis.
    NoSpan,
    /// Some cluster touches the first and the last row.
    SpansRows,
    /// Some cluster touches the first and the last column.
    SpansColumns,
    /// Both of the above, possibly through different clusters.
    SpansBoth,
}

impl SpanResult {
    /// Combines per-axis flags into a result.
    #[must_use]
    pub const fn from_flags(rows: bool, columns: bool) -> Self {
        match (rows, columns) {
            (false, false) => Self::NoSpan,
            (true, false) => Self::SpansRows,
            (false, true) => Self::SpansColumns,
            (true, true) => Self::SpansBoth,
        }
    }

    /// Whether the rows axis is spanned.
    #[must_use]
    pub const fn spans_rows(self) -> bool {
        matches!(self, Self::SpansRows | Self::SpansBoth)
    }

    /// Whether the columns axis is spanned.
    #[must_use]
    pub const fn spans_columns(self) -> bool {
        matches!(self, Self::SpansColumns | Self::SpansBoth)
    }

    /// Whether any axis is spanned.
    #[must_use]
    pub const fn is_spanning(self) -> bool {
        !matches!(self, Self::NoSpan)
    }
}

fn occupied_labels<'a>(cells: impl Iterator<Item = &'a u32>) -> BTreeSet<u32> {
    cells.copied().filter(|&label| label != 0).collect()
}

fn spans_rows(grid: &LabeledGrid) -> bool {
    let labels = grid.labels();
    if labels.rows() < 2 {
        return false;
    }
    let (Some(first), Some(last)) = (labels.row(0), labels.row(labels.rows() - 1)) else {
        return false;
    };
    let top = occupied_labels(first.iter());
    last.iter().any(|label| top.contains(label))
}

fn spans_columns(grid: &LabeledGrid) -> bool {
    let labels = grid.labels();
    if labels.cols() < 2 {
        return false;
    }
    let left = occupied_labels(labels.column(0));
    labels
        .column(labels.cols() - 1)
        .any(|label| left.contains(label))
}

/// Reports whether some cluster touches both opposite edges along `axis`.
///
/// An axis with a single row or column has no opposite edges and never spans.
/// Axes that were not requested are reported as not spanned.
///
/// # Examples
/// ```
/// use percolate_core::{Axis, Grid, LabeledGrid, SpanResult, classify_spanning};
///
/// let labels = Grid::from_rows(vec![vec![1, 0], vec![1, 0]]).expect("rectangular");
/// let grid = LabeledGrid::try_from_labels(labels).expect("labels are contiguous");
/// assert_eq!(classify_spanning(&grid, Axis::Both), SpanResult::SpansRows);
/// assert_eq!(classify_spanning(&grid, Axis::Columns), SpanResult::NoSpan);
/// ```
#[must_use]
pub fn classify_spanning(grid: &LabeledGrid, axis: Axis) -> SpanResult {
    let check_rows = matches!(axis, Axis::Rows | Axis::Both);
    let check_columns = matches!(axis, Axis::Columns | Axis::Both);
    SpanResult::from_flags(
        check_rows && spans_rows(grid),
        check_columns && spans_columns(grid),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    use crate::grid::Grid;

    fn labeled(rows: &[&[u32]]) -> LabeledGrid {
        let labels =
            Grid::from_rows(rows.iter().map(|row| row.to_vec()).collect()).expect("rectangular");
        LabeledGrid::try_from_labels(labels).expect("contiguous")
    }

    #[rstest]
    #[case(Axis::Rows, SpanResult::SpansRows)]
    #[case(Axis::Columns, SpanResult::NoSpan)]
    #[case(Axis::Both, SpanResult::SpansRows)]
    fn vertical_bar_spans_rows_only(#[case] axis: Axis, #[case] expected: SpanResult) {
        let grid = labeled(&[&[0, 1, 0], &[0, 1, 0], &[0, 1, 0]]);
        assert_eq!(classify_spanning(&grid, axis), expected);
    }

    #[test]
    fn cross_spans_both_axes() {
        let grid = labeled(&[&[0, 1, 0], &[1, 1, 1], &[0, 1, 0]]);
        assert_eq!(classify_spanning(&grid, Axis::Both), SpanResult::SpansBoth);
    }

    #[test]
    fn distinct_clusters_on_opposite_edges_do_not_span() {
        let grid = labeled(&[&[1, 1], &[0, 0], &[2, 2]]);
        assert_eq!(classify_spanning(&grid, Axis::Rows), SpanResult::NoSpan);
    }

    #[test]
    fn single_row_spans_columns_but_not_rows() {
        let grid = labeled(&[&[1, 1, 1]]);
        assert_eq!(classify_spanning(&grid, Axis::Both), SpanResult::SpansColumns);
    }

    #[test]
    fn single_cell_never_spans() {
        let grid = labeled(&[&[1]]);
        assert_eq!(classify_spanning(&grid, Axis::Both), SpanResult::NoSpan);
    }

    #[rstest]
    #[case(SpanResult::NoSpan, false, false)]
    #[case(SpanResult::SpansRows, true, false)]
    #[case(SpanResult::SpansColumns, false, true)]
    #[case(SpanResult::SpansBoth, true, true)]
    fn flags_round_trip(#[case] result: SpanResult, #[case] rows: bool, #[case] columns: bool) {
        assert_eq!(SpanResult::from_flags(rows, columns), result);
        assert_eq!(result.spans_rows(), rows);
        assert_eq!(result.spans_columns(), columns);
    }
}
