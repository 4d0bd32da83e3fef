use std::sync::Arc;

use percolate_core::{ClusterError, ClusterErrorCode, ErrorKind, Grid, random_occupancy};
use rstest::rstest;

#[rstest]
#[case(ClusterError::EmptyGrid { rows: 0, cols: 3 }, ClusterErrorCode::EmptyGrid, ErrorKind::Shape)]
#[case(
    ClusterError::RaggedRows { row: 2, expected: 4, actual: 3 },
    ClusterErrorCode::RaggedRows,
    ErrorKind::Shape,
)]
#[case(
    ClusterError::CellCountMismatch { rows: 2, cols: 2, cells: 5 },
    ClusterErrorCode::CellCountMismatch,
    ErrorKind::Shape,
)]
#[case(
    ClusterError::InvalidWorkerCount { got: 0 },
    ClusterErrorCode::InvalidWorkerCount,
    ErrorKind::Config,
)]
#[case(
    ClusterError::InvalidProbability { got: Arc::from("1.5") },
    ClusterErrorCode::InvalidProbability,
    ErrorKind::Config,
)]
#[case(
    ClusterError::WorkerPool { reason: Arc::from("no threads") },
    ClusterErrorCode::WorkerPool,
    ErrorKind::Execution,
)]
#[case(
    ClusterError::WorkerPanicked { message: Arc::from("boom") },
    ClusterErrorCode::WorkerPanicked,
    ErrorKind::Execution,
)]
#[case(
    ClusterError::ReferenceCycle { row: 1, col: 1 },
    ClusterErrorCode::ReferenceCycle,
    ErrorKind::Execution,
)]
#[case(
    ClusterError::DanglingReference { row: 0, col: 4 },
    ClusterErrorCode::DanglingReference,
    ErrorKind::Execution,
)]
#[case(
    ClusterError::LabelSpaceExhausted,
    ClusterErrorCode::LabelSpaceExhausted,
    ErrorKind::Execution,
)]
fn returns_expected_code_and_kind(
    #[case] error: ClusterError,
    #[case] expected: ClusterErrorCode,
    #[case] kind: ErrorKind,
) {
    assert_eq!(error.code(), expected);
    assert_eq!(error.code().as_str(), expected.as_str());
    assert_eq!(error.kind(), kind);
    assert_eq!(expected.kind(), kind);
}

#[rstest]
#[case(ClusterErrorCode::EmptyGrid, "PERCOLATE_EMPTY_GRID")]
#[case(ClusterErrorCode::InvalidWorkerCount, "PERCOLATE_INVALID_WORKER_COUNT")]
#[case(ClusterErrorCode::WorkerPanicked, "PERCOLATE_WORKER_PANICKED")]
#[case(ClusterErrorCode::LabelSpaceExhausted, "PERCOLATE_LABEL_SPACE_EXHAUSTED")]
fn codes_render_as_stable_strings(#[case] code: ClusterErrorCode, #[case] expected: &str) {
    assert_eq!(code.as_str(), expected);
    assert_eq!(code.to_string(), expected);
}

#[rstest]
fn shape_errors_surface_before_any_run() {
    let err = Grid::from_rows(vec![vec![true, false], vec![true]]).expect_err("ragged rows");
    assert_eq!(err.kind(), ErrorKind::Shape);
    assert_eq!(
        err.to_string(),
        "row 1 has 1 cells but the first row has 2"
    );
}

#[rstest]
fn invalid_probability_reports_the_value() {
    let err = random_occupancy(2, 2, 2.5, 0).expect_err("probability out of range");
    assert_eq!(err.code(), ClusterErrorCode::InvalidProbability);
    assert!(err.to_string().contains("2.5"));
}
