//! Host-facing lint and fix operations.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::{Config, ConfigResolver};
use crate::error::BridgeError;
use crate::fix::{DocumentHold, Editor, EditorSnapshot, FixApplied, FixOnSave, FixedText, apply_fix};
use crate::invoker::{ToolCommand, ToolInvoker, ToolKind, ToolRunner};
use crate::parser::{Diagnostic, Severity, parse_output};
use crate::session::{Outcome, RequestSession, SkipReason};
use crate::temp_buffer::materialize;

/// Result of one lint run.
///
/// A failed run carries no diagnostics and a failure message, so hosts can
/// tell "nothing found" from "could not run".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LintReport {
    pub errors: Vec<Diagnostic>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
}

impl LintReport {
    pub fn success(errors: Vec<Diagnostic>) -> Self {
        Self {
            errors,
            failure: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            errors: Vec::new(),
            failure: Some(message.into()),
        }
    }

    pub fn is_failure(&self) -> bool {
        self.failure.is_some()
    }

    /// Whether any diagnostic has error severity.
    pub fn has_errors(&self) -> bool {
        self.errors.iter().any(|d| d.severity == Severity::Error)
    }
}

/// Host-level settings for a bridge.
#[derive(Debug, Clone)]
pub struct BridgeSettings {
    pub lint_command: ToolCommand,
    pub fix_command: ToolCommand,
    /// Flags used when no `.gjslintrc` is found.
    pub defaults: Config,
}

impl Default for BridgeSettings {
    fn default() -> Self {
        Self {
            lint_command: ToolCommand::default_for(ToolKind::Lint),
            fix_command: ToolCommand::default_for(ToolKind::Fix),
            defaults: Config::default(),
        }
    }
}

/// Lints and fixes unsaved buffers through an external tool.
#[derive(Debug)]
pub struct LintBridge<R = ToolInvoker> {
    resolver: ConfigResolver,
    runner: R,
    project_root: RwLock<Option<PathBuf>>,
    session: RequestSession,
    fix_on_save: Arc<FixOnSave>,
}

impl LintBridge<ToolInvoker> {
    /// Creates a bridge that runs the configured tools as processes.
    pub fn new(project_root: Option<PathBuf>, settings: BridgeSettings) -> Self {
        let runner = ToolInvoker::new(settings.lint_command, settings.fix_command);
        Self::with_runner(project_root, runner).with_resolver(ConfigResolver::new(settings.defaults))
    }
}

impl<R: ToolRunner> LintBridge<R> {
    /// Creates a bridge around a custom tool runner.
    pub fn with_runner(project_root: Option<PathBuf>, runner: R) -> Self {
        Self {
            resolver: ConfigResolver::default(),
            runner,
            project_root: RwLock::new(project_root),
            session: RequestSession::new(),
            fix_on_save: Arc::new(FixOnSave::default()),
        }
    }

    pub fn with_resolver(mut self, resolver: ConfigResolver) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    pub fn session(&self) -> &RequestSession {
        &self.session
    }

    pub fn project_root(&self) -> Option<PathBuf> {
        self.project_root.read().clone()
    }

    pub fn set_project_root(&self, root: Option<PathBuf>) {
        *self.project_root.write() = root;
    }

    /// Resolves the effective config for a file.
    pub async fn resolve_config(&self, path: &Path) -> Result<Config, BridgeError> {
        let root = self.project_root();
        self.resolver.resolve(root.as_deref(), path).await
    }

    /// Lints `text` as the unsaved content of `path`.
    pub async fn scan(&self, text: &str, path: &Path) -> Outcome<LintReport> {
        self.scan_in(&self.session, text, path).await
    }

    /// Like [`LintBridge::scan`], but freshness is tracked in `session`.
    ///
    /// Hosts with several open views pass one session per view, so a lint of
    /// one document never supersedes a lint of another.
    pub async fn scan_in(
        &self,
        session: &RequestSession,
        text: &str,
        path: &Path,
    ) -> Outcome<LintReport> {
        let ticket = session.begin(ToolKind::Lint);

        let report = match self.run_tool(ToolKind::Lint, text, path).await {
            Ok(stdout) => LintReport::success(parse_output(&stdout)),
            Err(BridgeError::NoProjectContext { .. }) => {
                debug!("Skipping lint outside project: {}", path.display());
                return ticket.skip(SkipReason::NoProjectContext);
            }
            Err(e) => {
                warn!("Lint failed for {}: {}", path.display(), e);
                LintReport::failed(e.to_string())
            }
        };

        ticket.complete(report)
    }

    /// Runs the fixer on `text` as the unsaved content of `path`.
    pub async fn fix_text(&self, text: &str, path: &Path) -> Outcome<FixedText> {
        self.fix_text_in(&self.session, text, path).await
    }

    /// Like [`LintBridge::fix_text`], but freshness is tracked in `session`.
    pub async fn fix_text_in(
        &self,
        session: &RequestSession,
        text: &str,
        path: &Path,
    ) -> Outcome<FixedText> {
        let ticket = session.begin(ToolKind::Fix);

        let fixed = match self.run_tool(ToolKind::Fix, text, path).await {
            Ok(fixed) => FixedText::compare(text, fixed),
            Err(BridgeError::NoProjectContext { .. }) => {
                debug!("Skipping fix outside project: {}", path.display());
                return ticket.skip(SkipReason::NoProjectContext);
            }
            Err(e) => {
                warn!("Fix failed for {}: {}", path.display(), e);
                FixedText::Failed(e.to_string())
            }
        };

        ticket.complete(fixed)
    }

    /// Fixes the editor's document in place.
    ///
    /// The result is dropped if the buffer was edited, or another fix was
    /// started, while the tool was running.
    pub async fn fix<E: Editor + ?Sized>(&self, editor: &E) -> Outcome<FixApplied> {
        let Some(snapshot) = EditorSnapshot::capture(editor) else {
            debug!("No document path, skipping fix");
            return Outcome::Skipped(SkipReason::NoDocument);
        };
        let _hold = DocumentHold::acquire(editor);

        match self.fix_text(&snapshot.text, &snapshot.path).await {
            Outcome::Current(FixedText::Changed(fixed)) => {
                if editor.text() != snapshot.text {
                    debug!("{} changed during fix, discarding", snapshot.path.display());
                    return Outcome::Superseded;
                }
                Outcome::Current(apply_fix(editor, &snapshot, &fixed))
            }
            Outcome::Current(FixedText::Unchanged) => Outcome::Current(FixApplied::Unchanged),
            Outcome::Current(FixedText::Failed(message)) => {
                Outcome::Current(FixApplied::Failed(message))
            }
            Outcome::Superseded => Outcome::Superseded,
            Outcome::Skipped(reason) => Outcome::Skipped(reason),
        }
    }

    /// Turns fix-on-save on or off.
    pub fn set_fix_on_save(&self, enabled: bool) {
        debug!("Fix on save: {}", enabled);
        self.fix_on_save.set_enabled(enabled);
    }

    pub fn fix_on_save(&self) -> &Arc<FixOnSave> {
        &self.fix_on_save
    }

    /// Save listener: fixes the document and saves it again when it changed.
    ///
    /// The listener is detached for the whole sequence, so the re-save made
    /// here does not trigger another fix.
    pub async fn on_document_saved<E: Editor + ?Sized>(&self, editor: &E) -> Outcome<FixApplied> {
        let Some(_detached) = self.fix_on_save.detach() else {
            return Outcome::Skipped(SkipReason::NotListening);
        };

        let outcome = self.fix(editor).await;

        if let Outcome::Current(FixApplied::Replaced) = outcome
            && let Err(e) = editor.save()
        {
            warn!("Failed to save fixed document: {}", e);
            return Outcome::Current(FixApplied::Failed(e.to_string()));
        }

        outcome
    }

    async fn run_tool(&self, kind: ToolKind, text: &str, path: &Path) -> Result<String, BridgeError> {
        let config = self.resolve_config(path).await?;
        let artifact = materialize(text, path).await?;
        self.runner.run(kind, artifact, config.flags(kind)).await
    }
}
