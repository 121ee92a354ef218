//! CLI utility functions

use std::path::Path;

use miette::{IntoDiagnostic, Result, WrapErr};
use tokio::runtime::Runtime;

pub fn create_tokio_runtime() -> Result<Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .into_diagnostic()
}

/// Reads the buffer content for `path`, from stdin when requested.
pub fn read_input(path: &Path, stdin: bool) -> Result<String> {
    if stdin {
        std::io::read_to_string(std::io::stdin())
            .into_diagnostic()
            .wrap_err("Failed to read stdin")
    } else {
        std::fs::read_to_string(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to read {}", path.display()))
    }
}
