//! Subcommand implementations

pub mod config;
pub mod fix;
pub mod lint;
pub mod lsp;
