//! LintBridge CLI
//!
//! Runs Closure Linter (`gjslint` / `fixjsstyle`) against files or unsaved
//! buffers, and hosts the language server.

mod cli;
mod commands;
mod output;
mod utils;

use std::process::ExitCode;

use clap::Parser;
use miette::Result;
use tracing::error;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(has_errors) => {
            if has_errors {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            error!("{:?}", e);
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> Result<bool> {
    match &cli.command {
        Commands::Lint {
            file,
            stdin,
            format,
        } => commands::lint::run_lint(&cli, file, *stdin, *format),
        Commands::Fix { file, stdin, check } => commands::fix::run_fix(&cli, file, *stdin, *check),
        Commands::Config { file } => commands::config::run_config(&cli, file).map(|_| false),
        Commands::Lsp => commands::lsp::run_lsp().map(|_| false),
    }
}
