//! # lintbridge_core
//!
//! Lint/fix orchestration for running Closure Linter against unsaved editor
//! buffers.
//!
//! This crate provides:
//! - `.gjslintrc` discovery and layering over defaults
//! - Temporary sibling copies of unsaved text
//! - Tool invocation and output parsing
//! - Latest-request-wins tracking for lint and fix requests
//! - Fix application that preserves the viewport and avoids save loops
//!
//! ## Example
//!
//! ```rust,ignore
//! use lintbridge_core::{BridgeSettings, LintBridge};
//!
//! let bridge = LintBridge::new(Some(project_root), BridgeSettings::default());
//!
//! if let Some(report) = bridge.scan(&text, &path).await.current() {
//!     for diag in report.errors {
//!         println!("{}: {}", diag.line + 1, diag.message);
//!     }
//! }
//! ```

mod bridge;
pub mod config;
mod error;
pub mod fix;
pub mod invoker;
pub mod parser;
pub mod session;
pub mod temp_buffer;

pub use bridge::{BridgeSettings, LintBridge, LintReport};
pub use config::{CONFIG_FILE_NAME, Config, ConfigResolver};
pub use error::BridgeError;
pub use fix::{CursorPos, Editor, FixApplied, FixOnSave, FixedText, ScrollPos, Viewport};
pub use invoker::{ToolCommand, ToolInvoker, ToolKind, ToolRunner};
pub use parser::{Diagnostic, Severity, parse_output};
pub use session::{Outcome, RequestSession, SessionState, SkipReason};
pub use temp_buffer::TempArtifact;
