//! External tool invocation.

use std::fmt;
use std::future::Future;
use std::process::Stdio;

use serde::{Deserialize, Serialize};
use tokio::process::Command;
use tracing::{debug, warn};

use crate::BridgeError;
use crate::temp_buffer::{TempArtifact, shell_escape};

/// Operation class of a tool run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    /// Read-only analysis producing diagnostics.
    Lint,
    /// Rewrites the file to its canonical style.
    Fix,
}

impl ToolKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolKind::Lint => "lint",
            ToolKind::Fix => "fix",
        }
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Program and leading arguments used to start a tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCommand {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl ToolCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Adds leading arguments placed before the flags.
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Parses a whitespace-separated command such as `python /opt/gjslint.py`.
    pub fn parse(command: &str) -> Option<Self> {
        let mut parts = command.split_whitespace();
        let program = parts.next()?;
        Some(Self::new(program).with_args(parts))
    }

    /// Default command for a tool kind (the Closure Linter entry points).
    pub fn default_for(kind: ToolKind) -> Self {
        match kind {
            ToolKind::Lint => Self::new("gjslint"),
            ToolKind::Fix => Self::new("fixjsstyle"),
        }
    }

    /// Renders the full command line for display, escaping the temp path.
    pub fn command_line(&self, flags: &str, artifact: &TempArtifact) -> String {
        let mut parts = vec![shell_escape(&self.program)];
        parts.extend(self.args.iter().map(|a| shell_escape(a)));
        parts.extend(flags.split_whitespace().map(str::to_string));
        parts.push(artifact.escaped_path());
        parts.join(" ")
    }
}

/// Runs an external tool against a temporary copy.
///
/// Implementations consume the artifact and must remove it before the
/// returned future completes, whatever the outcome.
pub trait ToolRunner: Send + Sync {
    /// Runs `kind` on `artifact` and returns the lint output or fixed text.
    fn run(
        &self,
        kind: ToolKind,
        artifact: TempArtifact,
        flags: &str,
    ) -> impl Future<Output = Result<String, BridgeError>> + Send;
}

/// Spawns the configured tools as child processes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInvoker {
    lint: ToolCommand,
    fix: ToolCommand,
}

impl ToolInvoker {
    pub fn new(lint: ToolCommand, fix: ToolCommand) -> Self {
        Self { lint, fix }
    }

    /// Returns the command used for a tool kind.
    pub fn command(&self, kind: ToolKind) -> &ToolCommand {
        match kind {
            ToolKind::Lint => &self.lint,
            ToolKind::Fix => &self.fix,
        }
    }

    async fn execute(
        &self,
        kind: ToolKind,
        artifact: &TempArtifact,
        flags: &str,
    ) -> Result<String, BridgeError> {
        let command = self.command(kind);
        debug!("Running {}", command.command_line(flags, artifact));

        let output = Command::new(&command.program)
            .args(&command.args)
            .args(flags.split_whitespace())
            .arg(artifact.path())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|source| BridgeError::ToolSpawn {
                program: command.program.clone(),
                source,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        match kind {
            // The linter exits non-zero whenever it finds problems, so only
            // stderr output marks a failed run.
            ToolKind::Lint => {
                if stderr.trim().is_empty() {
                    Ok(stdout)
                } else {
                    Err(BridgeError::execution(kind, stderr))
                }
            }
            ToolKind::Fix => {
                if !output.status.success() {
                    let reason = if stderr.trim().is_empty() {
                        format!("exited with {}", output.status)
                    } else {
                        stderr
                    };
                    return Err(BridgeError::execution(kind, reason));
                }
                tokio::fs::read_to_string(artifact.path())
                    .await
                    .map_err(|e| BridgeError::temp_file(artifact.path(), e))
            }
        }
    }
}

impl Default for ToolInvoker {
    fn default() -> Self {
        Self::new(
            ToolCommand::default_for(ToolKind::Lint),
            ToolCommand::default_for(ToolKind::Fix),
        )
    }
}

impl ToolRunner for ToolInvoker {
    async fn run(
        &self,
        kind: ToolKind,
        artifact: TempArtifact,
        flags: &str,
    ) -> Result<String, BridgeError> {
        let result = self.execute(kind, &artifact, flags).await;

        if let Err(e) = artifact.dispose().await {
            warn!("{}", e);
        }

        result
    }
}
