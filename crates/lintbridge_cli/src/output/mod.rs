//! Output formatting module

mod json;
mod text;

use std::io::Write;
use std::path::Path;

use lintbridge_core::LintReport;
use miette::{IntoDiagnostic, Result};

use crate::cli::OutputFormat;

pub fn output_report(path: &Path, report: &LintReport, format: OutputFormat) -> Result<()> {
    let rendered = match format {
        OutputFormat::Json => json::render_json(path, report)?,
        OutputFormat::Text => text::render_text(path, report),
    };

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(rendered.as_bytes()).into_diagnostic()?;
    stdout.flush().into_diagnostic()
}
