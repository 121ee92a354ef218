//! Text output formatter

use std::fmt::Write;
use std::path::Path;

use lintbridge_core::LintReport;

/// Renders one `path:line: severity [code]: message` row per diagnostic,
/// with 1-based line numbers, followed by a summary line.
pub fn render_text(path: &Path, report: &LintReport) -> String {
    let mut out = String::new();

    for diag in &report.errors {
        let _ = writeln!(
            out,
            "{}:{}: {} [{}]: {}",
            path.display(),
            diag.line + 1,
            diag.severity.as_str(),
            diag.code,
            diag.message
        );
    }

    let errors = report
        .errors
        .iter()
        .filter(|d| d.severity == lintbridge_core::Severity::Error)
        .count();
    let warnings = report.errors.len() - errors;
    let _ = writeln!(
        out,
        "Found {} errors and {} warnings in {}",
        errors,
        warnings,
        path.display()
    );
    out
}
