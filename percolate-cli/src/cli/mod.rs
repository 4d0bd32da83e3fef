//! Command-line interface orchestration for percolate.
//!
//! `label` reads a textual grid, labels its clusters and reports whether any
//! cluster spans it; `generate` prints a seeded random grid in the same
//! format.

mod commands;

pub use commands::{
    AxisArg, Cli, CliError, Command, ExecutionSummary, GenerateCommand, LabelCommand,
    LabelSummary, render_summary, run_cli,
};

#[cfg(test)]
mod test_helpers;
