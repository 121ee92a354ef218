//! Lint command implementation

use std::path::Path;

use miette::{Result, miette};
use tracing::debug;

use lintbridge_core::{LintBridge, Outcome, SkipReason};

use crate::cli::{Cli, OutputFormat, absolute};
use crate::output::output_report;
use crate::utils::{create_tokio_runtime, read_input};

/// Lints one file. Returns whether any error-severity diagnostic was found.
pub fn run_lint(cli: &Cli, file: &Path, stdin: bool, format: OutputFormat) -> Result<bool> {
    let path = absolute(file)?;
    let text = read_input(&path, stdin)?;
    let root = cli.project_root()?;
    debug!("Linting {} (project root {})", path.display(), root.display());

    let bridge = LintBridge::new(Some(root.clone()), cli.settings()?);
    let report = match create_tokio_runtime()?.block_on(bridge.scan(&text, &path)) {
        Outcome::Current(report) => report,
        Outcome::Skipped(SkipReason::NoProjectContext) => {
            return Err(miette!(
                "{} is outside the project root {}",
                path.display(),
                root.display()
            ));
        }
        Outcome::Skipped(reason) => return Err(miette!("Lint skipped: {:?}", reason)),
        Outcome::Superseded => return Err(miette!("Lint was superseded")),
    };

    if let Some(failure) = &report.failure {
        return Err(miette!("{}", failure));
    }

    output_report(&path, &report, format)?;
    Ok(report.has_errors())
}
