//! Spanning classification of clustering results.

mod common;

use common::occupancy;
use percolate_core::{Axis, Grid, LabeledGrid, SpanResult, classify_spanning, clusterize};
use rstest::rstest;

#[rstest]
#[case::vertical_path(&[".#..", ".##.", "..#.", "..#."], SpanResult::SpansRows)]
#[case::horizontal_path(&["....", "###.", "..##", "...."], SpanResult::SpansColumns)]
#[case::cross(&["..#..", "..#..", "#####", "..#..", "..#.."], SpanResult::SpansBoth)]
#[case::isolated(&["#..#", "....", "....", "#..#"], SpanResult::NoSpan)]
fn classifies_clustered_grids(#[case] rows: &[&str], #[case] expected: SpanResult) {
    let labeled = clusterize(occupancy(rows), 2).expect("run must succeed");
    assert_eq!(classify_spanning(&labeled, Axis::Both), expected);
}

#[rstest]
#[case(Axis::Rows, SpanResult::NoSpan)]
#[case(Axis::Columns, SpanResult::SpansColumns)]
#[case(Axis::Both, SpanResult::SpansColumns)]
fn requested_axes_limit_the_result(#[case] axis: Axis, #[case] expected: SpanResult) {
    let labeled = clusterize(occupancy(&["....", "####", "...."]), 3).expect("run must succeed");
    assert_eq!(labeled.spanning(axis), expected);
}

#[rstest]
fn edges_must_share_a_cluster() {
    let labels = Grid::from_rows(vec![vec![1, 0], vec![0, 0], vec![0, 2]]).expect("rectangular");
    let grid = LabeledGrid::try_from_labels(labels).expect("labels are contiguous");
    assert_eq!(classify_spanning(&grid, Axis::Both), SpanResult::NoSpan);
}

#[rstest]
fn single_column_never_spans_columns() {
    let labeled = clusterize(occupancy(&["#", "#", "#"]), 2).expect("run must succeed");
    assert_eq!(labeled.spanning(Axis::Both), SpanResult::SpansRows);
}
