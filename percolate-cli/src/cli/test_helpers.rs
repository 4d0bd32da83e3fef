//! Small helpers shared across CLI tests.

use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

use tempfile::TempDir;

use super::{AxisArg, Cli, CliError, Command, ExecutionSummary, LabelCommand, LabelSummary, run_cli};

pub(super) fn temp_dir() -> TempDir {
    match TempDir::new() {
        Ok(dir) => dir,
        Err(err) => panic!("failed to create temp dir: {err}"),
    }
}

pub(super) fn create_grid_file(dir: &TempDir, name: &str, contents: &str) -> io::Result<PathBuf> {
    let path = dir.path().join(name);
    let mut file = File::create(&path)?;
    file.write_all(contents.as_bytes())?;
    Ok(path)
}

pub(super) fn label_cli(path: PathBuf, workers: Option<usize>, axis: AxisArg) -> Cli {
    Cli {
        command: Command::Label(LabelCommand {
            path,
            workers,
            axis,
            show_grid: false,
        }),
    }
}

pub(super) fn run_label_expecting_summary(cli: Cli) -> LabelSummary {
    match run_cli(cli) {
        Ok(ExecutionSummary::Label(summary)) => summary,
        Ok(other) => panic!("expected a label summary, got {other:?}"),
        Err(err) => panic!("label command failed: {err}"),
    }
}

pub(super) fn run_cli_expecting_error(cli: Cli, panic_msg: &str) -> CliError {
    match run_cli(cli) {
        Ok(_) => panic!("{panic_msg}"),
        Err(err) => err,
    }
}
