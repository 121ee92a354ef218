//! JSON output formatter

use std::path::Path;

use miette::{IntoDiagnostic, Result};
use serde::Serialize;

use lintbridge_core::{Diagnostic, LintReport};

#[derive(Serialize)]
struct JsonReport<'a> {
    path: String,
    errors: &'a [Diagnostic],
}

pub fn render_json(path: &Path, report: &LintReport) -> Result<String> {
    let output = JsonReport {
        path: path.display().to_string(),
        errors: &report.errors,
    };
    let mut rendered = serde_json::to_string_pretty(&output).into_diagnostic()?;
    rendered.push('\n');
    Ok(rendered)
}
