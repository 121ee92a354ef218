//! Bridge error types.

use std::path::PathBuf;

use thiserror::Error;

use crate::invoker::ToolKind;

/// Errors that can occur while linting or fixing a buffer.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The file is not inside a resolvable project root.
    #[error("No project context for {}", path.display())]
    NoProjectContext { path: PathBuf },

    /// A configuration file exists but is not valid.
    #[error("Invalid config {}: {message}", path.display())]
    ConfigParse { path: PathBuf, message: String },

    /// A configuration file exists but could not be read.
    #[error("Failed to read config {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The external tool could not be started.
    #[error("Failed to start {program}: {source}")]
    ToolSpawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The external tool ran but reported a failure.
    #[error("{kind} failed: {stderr}")]
    ToolExecution { kind: ToolKind, stderr: String },

    /// The temporary copy could not be created, read or removed.
    #[error("Temporary file error at {}: {source}", path.display())]
    TempFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl BridgeError {
    /// Creates a config parse error.
    pub fn config_parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ConfigParse {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a temp file error.
    pub fn temp_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::TempFile {
            path: path.into(),
            source,
        }
    }

    /// Creates a tool execution error.
    pub fn execution(kind: ToolKind, stderr: impl Into<String>) -> Self {
        Self::ToolExecution {
            kind,
            stderr: stderr.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_execution_error_message() {
        let err = BridgeError::execution(ToolKind::Lint, "boom");
        assert_eq!(err.to_string(), "lint failed: boom");
    }

    #[test]
    fn test_config_parse_message_includes_path() {
        let err = BridgeError::config_parse("/p/.gjslintrc", "expected value");
        assert!(err.to_string().contains("/p/.gjslintrc"));
        assert!(err.to_string().contains("expected value"));
    }
}
