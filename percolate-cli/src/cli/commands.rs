//! Command implementations and argument parsing for the percolate CLI.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use percolate_core::{
    Axis, ClusterError, ClusterErrorCode, ClusterizerBuilder, Grid, LabeledGrid, SpanResult,
    random_occupancy,
};
use thiserror::Error;
use tracing::{Span, field, info, instrument};

use crate::grid_text::{GridTextError, parse_grid, write_labels, write_occupancy};

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(
    name = "percolate",
    about = "Label clusters in occupancy grids and detect percolation."
)]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Label the clusters of a grid file and report whether any spans it.
    Label(LabelCommand),
    /// Print a random occupancy grid.
    Generate(GenerateCommand),
}

/// Options accepted by the `label` command.
#[derive(Debug, Args, Clone)]
pub struct LabelCommand {
    /// Grid file: rows separated by newlines or `;`, cells by `,`.
    pub path: PathBuf,

    /// Number of workers (defaults to the available parallelism).
    #[arg(long, value_parser = clap::value_parser!(usize))]
    pub workers: Option<usize>,

    /// Axis checked for spanning clusters.
    #[arg(long, value_enum, default_value_t = AxisArg::Both)]
    pub axis: AxisArg,

    /// Print the labeled grid after the summary.
    #[arg(long)]
    pub show_grid: bool,
}

/// Options accepted by the `generate` command.
#[derive(Debug, Args, Clone)]
pub struct GenerateCommand {
    /// Number of rows.
    #[arg(long)]
    pub rows: usize,

    /// Number of columns.
    #[arg(long)]
    pub cols: usize,

    /// Probability that a cell is occupied.
    #[arg(long)]
    pub probability: f64,

    /// Seed for the random number generator.
    #[arg(long, default_value_t = 0)]
    pub seed: u64,
}

/// Spanning axes selectable on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AxisArg {
    /// First row to last row.
    Rows,
    /// First column to last column.
    Columns,
    /// Both directions.
    Both,
}

impl From<AxisArg> for Axis {
    fn from(axis: AxisArg) -> Self {
        match axis {
            AxisArg::Rows => Self::Rows,
            AxisArg::Columns => Self::Columns,
            AxisArg::Both => Self::Both,
        }
    }
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Reading the input grid failed.
    #[error("failed to read `{path}`: {source}")]
    Io {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// The input grid could not be parsed.
    #[error("failed to parse `{path}`: {source}")]
    GridText {
        /// Path of the malformed grid.
        path: PathBuf,
        /// Parse failure.
        #[source]
        source: GridTextError,
    },
    /// Core clustering failed.
    #[error(transparent)]
    Core(#[from] ClusterError),
}

impl CliError {
    /// Stable code of the underlying core error, when there is one.
    #[must_use]
    pub fn code(&self) -> Option<ClusterErrorCode> {
        match self {
            Self::Core(core)
            | Self::GridText {
                source: GridTextError::Shape(core),
                ..
            } => Some(core.code()),
            _ => None,
        }
    }
}

/// Labeling outcome reported by the `label` command.
#[derive(Debug, Clone)]
pub struct LabelSummary {
    /// Path the grid was read from.
    pub source: PathBuf,
    /// Labeled grid.
    pub labeled: LabeledGrid,
    /// Axis that was checked.
    pub axis: Axis,
    /// Spanning classification along `axis`.
    pub span: SpanResult,
    /// Whether to print the labeled grid.
    pub show_grid: bool,
}

/// Summarises the outcome of executing a CLI command.
#[derive(Debug, Clone)]
pub enum ExecutionSummary {
    /// Result of the `label` command.
    Label(LabelSummary),
    /// Grid produced by the `generate` command.
    Generate(Grid<bool>),
}

/// Executes the CLI command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] when reading, parsing or clustering fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use percolate_cli::cli::{AxisArg, Cli, Command, ExecutionSummary, LabelCommand, run_cli};
/// # use tempfile::NamedTempFile;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let file = NamedTempFile::new()?;
/// std::fs::write(file.path(), "1,0,1;1,0,1;0,0,1")?;
/// let cli = Cli {
///     command: Command::Label(LabelCommand {
///         path: file.path().to_path_buf(),
///         workers: Some(2),
///         axis: AxisArg::Both,
///         show_grid: false,
///     }),
/// };
/// let ExecutionSummary::Label(summary) = run_cli(cli)? else {
///     panic!("label command yields a label summary");
/// };
/// assert_eq!(summary.labeled.cluster_count(), 2);
/// # Ok(())
/// # }
/// ```
#[instrument(
    name = "cli.run",
    err,
    skip(cli),
    fields(command = field::Empty),
)]
pub fn run_cli(cli: Cli) -> Result<ExecutionSummary, CliError> {
    let span = Span::current();
    match cli.command {
        Command::Label(label) => {
            span.record("command", field::display("label"));
            run_label(label).map(ExecutionSummary::Label)
        }
        Command::Generate(generate) => {
            span.record("command", field::display("generate"));
            run_generate(&generate).map(ExecutionSummary::Generate)
        }
    }
}

#[instrument(
    name = "cli.label",
    err,
    skip(command),
    fields(path = field::Empty, workers = field::Empty, axis = ?command.axis),
)]
pub(super) fn run_label(command: LabelCommand) -> Result<LabelSummary, CliError> {
    let LabelCommand {
        path,
        workers,
        axis,
        show_grid,
    } = command;
    let span = Span::current();
    span.record("path", field::display(path.display()));

    let mut builder = ClusterizerBuilder::new();
    if let Some(count) = workers {
        builder = builder.with_workers(count);
    }
    let clusterizer = builder.build()?;
    span.record("workers", clusterizer.workers().get());

    let grid = read_grid(&path)?;
    let labeled = clusterizer.run(&grid)?;
    let checked_axis = Axis::from(axis);
    let spanning = labeled.spanning(checked_axis);
    info!(
        clusters = labeled.cluster_count(),
        span = ?spanning,
        "label command completed"
    );

    Ok(LabelSummary {
        source: path,
        labeled,
        axis: checked_axis,
        span: spanning,
        show_grid,
    })
}

#[instrument(
    name = "cli.generate",
    err,
    skip(command),
    fields(
        rows = command.rows,
        cols = command.cols,
        probability = command.probability,
        seed = command.seed,
    ),
)]
pub(super) fn run_generate(command: &GenerateCommand) -> Result<Grid<bool>, CliError> {
    let grid = random_occupancy(
        command.rows,
        command.cols,
        command.probability,
        command.seed,
    )?;
    info!(occupied = grid.occupied_count(), "grid generated");
    Ok(grid)
}

#[instrument(name = "cli.read_grid", err, skip(path), fields(path = %path.display()))]
pub(super) fn read_grid(path: &Path) -> Result<Grid<bool>, CliError> {
    let text = fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_grid(&text).map_err(|source| CliError::GridText {
        path: path.to_path_buf(),
        source,
    })
}

pub(super) fn span_label(span: SpanResult) -> &'static str {
    match span {
        SpanResult::NoSpan => "none",
        SpanResult::SpansRows => "rows",
        SpanResult::SpansColumns => "columns",
        SpanResult::SpansBoth => "both",
    }
}

fn axis_label(axis: Axis) -> &'static str {
    match axis {
        Axis::Rows => "rows",
        Axis::Columns => "columns",
        Axis::Both => "both",
    }
}

/// Renders `summary` to `writer` in a human-readable text format.
///
/// Generated grids are written in the same format `label` reads.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use percolate_cli::cli::{ExecutionSummary, render_summary};
/// # use percolate_core::Grid;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let summary = ExecutionSummary::Generate(Grid::from_rows(vec![vec![true, false]])?);
/// let mut buffer = Vec::new();
/// render_summary(&summary, &mut buffer)?;
/// assert_eq!(String::from_utf8(buffer)?, "1,0\n");
/// # Ok(())
/// # }
/// ```
pub fn render_summary(summary: &ExecutionSummary, mut writer: impl Write) -> io::Result<()> {
    match summary {
        ExecutionSummary::Generate(grid) => write_occupancy(grid, writer),
        ExecutionSummary::Label(summary) => {
            let labeled = &summary.labeled;
            let largest = labeled.cluster_sizes().into_values().max().unwrap_or(0);
            writeln!(writer, "source: {}", summary.source.display())?;
            writeln!(writer, "rows: {}", labeled.rows())?;
            writeln!(writer, "columns: {}", labeled.cols())?;
            writeln!(writer, "clusters: {}", labeled.cluster_count())?;
            writeln!(writer, "largest cluster: {largest}")?;
            writeln!(
                writer,
                "spanning ({}): {}",
                axis_label(summary.axis),
                span_label(summary.span)
            )?;
            if summary.show_grid {
                writeln!(writer)?;
                write_labels(labeled.labels(), &mut writer)?;
            }
            Ok(())
        }
    }
}
