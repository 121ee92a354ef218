//! CLI argument definitions

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use miette::{IntoDiagnostic, Result, miette};

use lintbridge_core::{BridgeSettings, ToolCommand};

/// LintBridge - Closure Linter for unsaved JavaScript buffers
#[derive(Parser)]
#[command(name = "lintbridge")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Project root; `.gjslintrc` lookup stops here [default: current directory]
    #[arg(long, global = true, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Lint command, program and leading arguments (e.g. "python gjslint.py")
    #[arg(long, global = true, env = "LINTBRIDGE_LINT_CMD", value_name = "CMD")]
    pub lint_cmd: Option<String>,

    /// Fix command, program and leading arguments
    #[arg(long, global = true, env = "LINTBRIDGE_FIX_CMD", value_name = "CMD")]
    pub fix_cmd: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Lint a file
    Lint {
        /// File to lint
        file: PathBuf,

        /// Read the unsaved content of FILE from stdin
        #[arg(long)]
        stdin: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Fix a file in place
    Fix {
        /// File to fix
        file: PathBuf,

        /// Read the unsaved content of FILE from stdin and print the fixed text
        #[arg(long)]
        stdin: bool,

        /// Report whether the file needs fixing without writing it
        #[arg(long)]
        check: bool,
    },

    /// Print the effective configuration for a file
    Config {
        /// File whose configuration to resolve
        file: PathBuf,
    },

    /// Start the LSP server
    Lsp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

impl Cli {
    /// Tool settings from `--lint-cmd` / `--fix-cmd`, defaulting to the
    /// Closure Linter executables.
    pub fn settings(&self) -> Result<BridgeSettings> {
        let mut settings = BridgeSettings::default();
        if let Some(command) = &self.lint_cmd {
            settings.lint_command = parse_command("--lint-cmd", command)?;
        }
        if let Some(command) = &self.fix_cmd {
            settings.fix_command = parse_command("--fix-cmd", command)?;
        }
        Ok(settings)
    }

    /// Absolute project root.
    pub fn project_root(&self) -> Result<PathBuf> {
        match &self.root {
            Some(root) => absolute(root),
            None => std::env::current_dir().into_diagnostic(),
        }
    }
}

fn parse_command(flag: &str, command: &str) -> Result<ToolCommand> {
    ToolCommand::parse(command).ok_or_else(|| miette!("{} must not be empty", flag))
}

/// Makes `path` absolute without touching the filesystem.
pub fn absolute(path: &Path) -> Result<PathBuf> {
    std::path::absolute(path).into_diagnostic()
}
