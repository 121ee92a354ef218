//! Parsing of linter stdout into diagnostics.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Matches `Line <n>, <E|W>:<code>: <text>`.
static LINE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Line (\d+), ([EW]):(\d+): (.*)$").expect("Invalid diagnostic line pattern")
});

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Error - must be fixed.
    Error,
    /// Warning - should be reviewed.
    Warning,
}

impl Severity {
    fn from_code(code: &str) -> Option<Self> {
        match code {
            "E" => Some(Severity::Error),
            "W" => Some(Severity::Warning),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        }
    }
}

/// A single diagnostic reported by the linter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Zero-based line number.
    pub line: u32,
    pub severity: Severity,
    /// Numeric sub-code, e.g. `0001`.
    pub code: String,
    /// Display message in the form `E:0001: Missing semicolon`.
    pub message: String,
}

impl Diagnostic {
    /// Parses one output line, returning `None` for anything else.
    pub fn from_line(line: &str) -> Option<Self> {
        let line = line.strip_suffix('\r').unwrap_or(line);
        let caps = LINE_PATTERN.captures(line)?;

        let line_number: u32 = caps[1].parse().ok()?;
        let severity_code = &caps[2];
        let code = &caps[3];
        let text = &caps[4];

        Some(Self {
            line: line_number.checked_sub(1)?,
            severity: Severity::from_code(severity_code)?,
            code: code.to_string(),
            message: format!("{severity_code}:{code}: {text}"),
        })
    }
}

/// Parses linter stdout, keeping diagnostics in output order.
pub fn parse_output(stdout: &str) -> Vec<Diagnostic> {
    stdout.lines().filter_map(Diagnostic::from_line).collect()
}
