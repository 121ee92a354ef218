//! LSP type conversion utilities.

use tower_lsp::lsp_types::{Diagnostic, DiagnosticSeverity, NumberOrString, Position, Range};

use lintbridge_core::{Diagnostic as BridgeDiagnostic, Severity as BridgeSeverity};

/// Source name shown next to diagnostics.
pub const DIAGNOSTIC_SOURCE: &str = "gjslint";

/// Converts a bridge diagnostic to an LSP diagnostic spanning its line.
pub fn to_lsp_diagnostic(diag: &BridgeDiagnostic, text: &str) -> Diagnostic {
    let severity = match diag.severity {
        BridgeSeverity::Error => DiagnosticSeverity::ERROR,
        BridgeSeverity::Warning => DiagnosticSeverity::WARNING,
    };

    Diagnostic {
        range: line_range(diag.line, text),
        severity: Some(severity),
        code: Some(NumberOrString::String(diag.code.clone())),
        source: Some(DIAGNOSTIC_SOURCE.to_string()),
        message: diag.message.clone(),
        ..Default::default()
    }
}

/// Range covering a whole line, in UTF-16 code units.
///
/// Lines past the end of the text get an empty range at column 0.
pub fn line_range(line: u32, text: &str) -> Range {
    let width = text
        .lines()
        .nth(line as usize)
        .map(|l| l.encode_utf16().count() as u32)
        .unwrap_or(0);
    Range::new(Position::new(line, 0), Position::new(line, width))
}

/// Range covering the whole document.
pub fn full_document_range(text: &str) -> Range {
    let end = offset_to_position(text.len(), text).unwrap_or_default();
    Range::new(Position::new(0, 0), end)
}

/// Converts a byte offset to an LSP position.
pub fn offset_to_position(offset: usize, text: &str) -> Option<Position> {
    if offset > text.len() {
        return None;
    }

    let mut line = 0u32;
    let mut col = 0u32;
    let mut current_offset = 0;

    for ch in text.chars() {
        if current_offset >= offset {
            break;
        }

        if ch == '\n' {
            line += 1;
            col = 0;
        } else {
            col += ch.len_utf16() as u32;
        }

        current_offset += ch.len_utf8();
    }

    Some(Position::new(line, col))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn diagnostic(line: u32, severity: BridgeSeverity) -> BridgeDiagnostic {
        BridgeDiagnostic {
            line,
            severity,
            code: "0001".to_string(),
            message: "E:0001: Missing semicolon".to_string(),
        }
    }

    #[test]
    fn test_to_lsp_diagnostic() {
        let text = "var a = 1\nvar b = 2\n";
        let lsp = to_lsp_diagnostic(&diagnostic(1, BridgeSeverity::Error), text);

        assert_eq!(lsp.range, Range::new(Position::new(1, 0), Position::new(1, 9)));
        assert_eq!(lsp.severity, Some(DiagnosticSeverity::ERROR));
        assert_eq!(lsp.code, Some(NumberOrString::String("0001".to_string())));
        assert_eq!(lsp.source.as_deref(), Some("gjslint"));
        assert_eq!(lsp.message, "E:0001: Missing semicolon");
    }

    #[test]
    fn test_warning_severity() {
        let lsp = to_lsp_diagnostic(&diagnostic(0, BridgeSeverity::Warning), "x");
        assert_eq!(lsp.severity, Some(DiagnosticSeverity::WARNING));
    }

    #[test]
    fn test_line_range_past_end() {
        assert_eq!(
            line_range(5, "one line"),
            Range::new(Position::new(5, 0), Position::new(5, 0))
        );
    }

    #[test]
    fn test_line_range_counts_utf16_units() {
        assert_eq!(line_range(0, "a🎉b").end, Position::new(0, 4));
    }

    #[test]
    fn test_full_document_range() {
        assert_eq!(
            full_document_range("ab\ncd\n"),
            Range::new(Position::new(0, 0), Position::new(2, 0))
        );
        assert_eq!(
            full_document_range(""),
            Range::new(Position::new(0, 0), Position::new(0, 0))
        );
    }

    #[test]
    fn test_offset_to_position_multiline() {
        let text = "Line 1\nLine 2\nLine 3";
        assert_eq!(offset_to_position(7, text), Some(Position::new(1, 0)));
        assert_eq!(offset_to_position(20, text), Some(Position::new(2, 6)));
        assert_eq!(offset_to_position(21, text), None);
    }
}
