//! Error types for the percolate core library.
//!
//! Defines the error enum exposed by the public API, its stable codes, and a
//! convenient result alias.

use std::{fmt, sync::Arc};

use thiserror::Error;

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? => ($kind:ident, $code:expr)
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }

            /// Return the coarse category this code belongs to.
            #[must_use]
            pub const fn kind(self) -> ErrorKind {
                match self {
                    $(Self::$CodeVariant => ErrorKind::$kind,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            #[must_use]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// Coarse classification of a [`ClusterError`].
///
/// Shape and configuration errors are raised before any partitioning happens.
/// Execution errors abort a run that had already started; no partial grid is
/// ever returned.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ErrorKind {
    /// The input grid is not a non-empty rectangle.
    Shape,
    /// The requested configuration is invalid.
    Config,
    /// A run failed while executing.
    Execution,
}

/// Error type produced when building grids or running [`crate::Clusterizer`].
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum ClusterError {
    /// The grid has no rows or no columns.
    #[error("grid must have at least one row and one column (got {rows}x{cols})")]
    EmptyGrid {
        /// Number of rows supplied.
        rows: usize,
        /// Number of columns supplied.
        cols: usize,
    },
    /// A row's length differs from the first row's length.
    #[error("row {row} has {actual} cells but the first row has {expected}")]
    RaggedRows {
        /// Index of the offending row.
        row: usize,
        /// Length of the first row.
        expected: usize,
        /// Length of the offending row.
        actual: usize,
    },
    /// A flat cell buffer does not match the declared dimensions.
    #[error("a {rows}x{cols} grid cannot be built from {cells} cells")]
    CellCountMismatch {
        /// Declared row count.
        rows: usize,
        /// Declared column count.
        cols: usize,
        /// Number of cells supplied.
        cells: usize,
    },
    /// At least one worker is required.
    #[error("worker count must be at least 1 (got {got})")]
    InvalidWorkerCount {
        /// The invalid worker count supplied by the caller.
        got: usize,
    },
    /// Occupation probabilities must lie within `[0, 1]`.
    #[error("occupation probability must be within [0, 1] (got {got})")]
    InvalidProbability {
        /// The rejected probability, rendered for display.
        got: Arc<str>,
    },
    /// The worker pool could not be created.
    #[error("failed to build worker pool: {reason}")]
    WorkerPool {
        /// Description reported by the thread-pool builder.
        reason: Arc<str>,
    },
    /// A worker terminated abnormally.
    #[error("a worker panicked: {message}")]
    WorkerPanicked {
        /// Panic payload, when it was a string.
        message: Arc<str>,
    },
    /// Following a reference chain did not terminate.
    #[error("reference chain starting at ({row}, {col}) does not terminate")]
    ReferenceCycle {
        /// Row where the walk started.
        row: usize,
        /// Column where the walk started.
        col: usize,
    },
    /// A reference chain reached an empty cell or left its partition.
    #[error("reference chain starting at ({row}, {col}) points at no cluster")]
    DanglingReference {
        /// Row where the walk started.
        row: usize,
        /// Column where the walk started.
        col: usize,
    },
    /// More labels were needed than the label type can represent.
    #[error("label space exhausted")]
    LabelSpaceExhausted,
}

define_error_codes! {
    /// Stable codes describing [`ClusterError`] variants.
    enum ClusterErrorCode for ClusterError {
        /// The grid has no rows or no columns.
        EmptyGrid => EmptyGrid { .. } => (Shape, "PERCOLATE_EMPTY_GRID"),
        /// A row's length differs from the first row's length.
        RaggedRows => RaggedRows { .. } => (Shape, "PERCOLATE_RAGGED_ROWS"),
        /// A flat cell buffer does not match the declared dimensions.
        CellCountMismatch => CellCountMismatch { .. } => (Shape, "PERCOLATE_CELL_COUNT_MISMATCH"),
        /// At least one worker is required.
        InvalidWorkerCount => InvalidWorkerCount { .. } => (Config, "PERCOLATE_INVALID_WORKER_COUNT"),
        /// Occupation probabilities must lie within `[0, 1]`.
        InvalidProbability => InvalidProbability { .. } => (Config, "PERCOLATE_INVALID_PROBABILITY"),
        /// The worker pool could not be created.
        WorkerPool => WorkerPool { .. } => (Execution, "PERCOLATE_WORKER_POOL"),
        /// A worker terminated abnormally.
        WorkerPanicked => WorkerPanicked { .. } => (Execution, "PERCOLATE_WORKER_PANICKED"),
        /// Following a reference chain did not terminate.
        ReferenceCycle => ReferenceCycle { .. } => (Execution, "PERCOLATE_REFERENCE_CYCLE"),
        /// A reference chain reached an empty cell or left its partition.
        DanglingReference => DanglingReference { .. } => (Execution, "PERCOLATE_DANGLING_REFERENCE"),
        /// More labels were needed than the label type can represent.
        LabelSpaceExhausted => LabelSpaceExhausted => (Execution, "PERCOLATE_LABEL_SPACE_EXHAUSTED"),
    }
}

impl ClusterError {
    /// Return the coarse category of this error.
    ///
    /// # Examples
    /// ```
    /// use percolate_core::{ClusterError, ErrorKind};
    ///
    /// let err = ClusterError::InvalidWorkerCount { got: 0 };
    /// assert_eq!(err.kind(), ErrorKind::Config);
    /// ```
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.code().kind()
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, ClusterError>;
