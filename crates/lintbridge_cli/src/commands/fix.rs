//! Fix command implementation

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use miette::{IntoDiagnostic, Result, miette};
use parking_lot::Mutex;
use tracing::{debug, error};

use lintbridge_core::{Editor, FixApplied, FixedText, LintBridge, Outcome, SkipReason, Viewport};

use crate::cli::{Cli, absolute};
use crate::utils::{create_tokio_runtime, read_input};

/// A file on disk presented to the bridge as an editor buffer.
#[derive(Debug)]
pub struct FileBuffer {
    path: PathBuf,
    text: Mutex<String>,
    viewport: Mutex<Viewport>,
    refs: AtomicUsize,
}

impl FileBuffer {
    pub fn new(path: PathBuf, text: String) -> Self {
        Self {
            path,
            text: Mutex::new(text),
            viewport: Mutex::new(Viewport::default()),
            refs: AtomicUsize::new(0),
        }
    }
}

impl Editor for FileBuffer {
    fn path(&self) -> Option<PathBuf> {
        Some(self.path.clone())
    }

    fn text(&self) -> String {
        self.text.lock().clone()
    }

    fn viewport(&self) -> Viewport {
        *self.viewport.lock()
    }

    fn replace_text(&self, text: &str) {
        *self.text.lock() = text.to_string();
    }

    fn restore_viewport(&self, viewport: Viewport) {
        *self.viewport.lock() = viewport;
    }

    fn add_ref(&self) {
        self.refs.fetch_add(1, Ordering::SeqCst);
    }

    fn release_ref(&self) {
        self.refs.fetch_sub(1, Ordering::SeqCst);
    }

    fn save(&self) -> std::io::Result<()> {
        debug!("Writing {}", self.path.display());
        std::fs::write(&self.path, self.text.lock().as_bytes())
    }
}

/// Fixes one file. Returns `true` when the run should exit non-zero: the
/// fixer failed, or `--check` found changes.
pub fn run_fix(cli: &Cli, file: &Path, stdin: bool, check: bool) -> Result<bool> {
    let path = absolute(file)?;
    let text = read_input(&path, stdin)?;
    let root = cli.project_root()?;
    let bridge = LintBridge::new(Some(root.clone()), cli.settings()?);
    let runtime = create_tokio_runtime()?;

    if stdin || check {
        let fixed = match runtime.block_on(bridge.fix_text(&text, &path)) {
            Outcome::Current(fixed) => fixed,
            Outcome::Skipped(reason) => return Err(skipped(&path, &root, reason)),
            Outcome::Superseded => return Err(miette!("Fix was superseded")),
        };

        return match fixed {
            FixedText::Failed(message) => {
                error!("{}", message);
                Ok(true)
            }
            FixedText::Changed(_) if check => {
                println!("{} needs fixing", path.display());
                Ok(true)
            }
            FixedText::Unchanged if check => Ok(false),
            FixedText::Changed(fixed) => write_stdout(&fixed).map(|_| false),
            FixedText::Unchanged => write_stdout(&text).map(|_| false),
        };
    }

    // Saving the file is what triggers the fix; the bridge re-saves the
    // fixed text once without fixing again.
    bridge.set_fix_on_save(true);
    let buffer = FileBuffer::new(path.clone(), text);

    match runtime.block_on(bridge.on_document_saved(&buffer)) {
        Outcome::Current(FixApplied::Replaced) => {
            println!("Fixed {}", path.display());
            Ok(false)
        }
        Outcome::Current(FixApplied::Unchanged) => {
            println!("{} is already styled", path.display());
            Ok(false)
        }
        Outcome::Current(FixApplied::Failed(message)) => {
            error!("{}", message);
            Ok(true)
        }
        Outcome::Skipped(reason) => Err(skipped(&path, &root, reason)),
        Outcome::Superseded => Err(miette!("Fix was superseded")),
    }
}

fn skipped(path: &Path, root: &Path, reason: SkipReason) -> miette::Report {
    match reason {
        SkipReason::NoProjectContext => miette!(
            "{} is outside the project root {}",
            path.display(),
            root.display()
        ),
        other => miette!("Fix skipped: {:?}", other),
    }
}

fn write_stdout(text: &str) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(text.as_bytes()).into_diagnostic()?;
    stdout.flush().into_diagnostic()
}
