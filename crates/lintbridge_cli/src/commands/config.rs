//! Config command implementation

use std::path::Path;

use miette::{IntoDiagnostic, Result};

use lintbridge_core::LintBridge;

use crate::cli::{Cli, absolute};
use crate::utils::create_tokio_runtime;

/// Prints the flags that would be used for `file`, as JSON.
pub fn run_config(cli: &Cli, file: &Path) -> Result<()> {
    let path = absolute(file)?;
    let bridge = LintBridge::new(Some(cli.project_root()?), cli.settings()?);
    let config = create_tokio_runtime()?
        .block_on(bridge.resolve_config(&path))
        .into_diagnostic()?;

    println!(
        "{}",
        serde_json::to_string_pretty(&config).into_diagnostic()?
    );
    Ok(())
}
