//! Temporary on-disk copies of unsaved buffers.
//!
//! External tools only accept file paths, so the in-memory text is written to
//! a sibling of the real file (`lintbridge-temp[N].<name>`). The real file is
//! never touched. Each copy is owned by exactly one invocation and removed
//! when that invocation ends.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::BridgeError;

/// Prefix of every temporary copy.
pub const TEMP_PREFIX: &str = "lintbridge-temp";

/// Upper bound on disambiguator values tried before giving up.
const MAX_ATTEMPTS: u32 = 1024;

/// A temporary copy of a buffer, deleted on dispose or drop.
#[derive(Debug)]
pub struct TempArtifact {
    path: PathBuf,
    owner_path: PathBuf,
    disposed: bool,
}

impl TempArtifact {
    /// Path of the temporary copy.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of the real file this copy stands in for.
    pub fn owner_path(&self) -> &Path {
        &self.owner_path
    }

    /// The temp path with shell-sensitive characters backslash-escaped.
    pub fn escaped_path(&self) -> String {
        shell_escape(&self.path.to_string_lossy())
    }

    /// Removes the temporary copy.
    ///
    /// A copy that is already gone counts as removed.
    pub async fn dispose(mut self) -> Result<(), BridgeError> {
        self.disposed = true;
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                debug!("Removed temp copy {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(BridgeError::temp_file(&self.path, e)),
        }
    }
}

impl Drop for TempArtifact {
    fn drop(&mut self) {
        if self.disposed {
            return;
        }
        if let Err(e) = std::fs::remove_file(&self.path)
            && e.kind() != ErrorKind::NotFound
        {
            warn!("Failed to remove temp copy {}: {}", self.path.display(), e);
        }
    }
}

/// Returns the `attempt`-th candidate path for a copy of `file_name` in `dir`.
pub fn candidate_path(dir: &Path, file_name: &str, attempt: u32) -> PathBuf {
    if attempt == 0 {
        dir.join(format!("{TEMP_PREFIX}.{file_name}"))
    } else {
        dir.join(format!("{TEMP_PREFIX}{attempt}.{file_name}"))
    }
}

/// Writes `text` to a fresh temporary copy next to `file_path`.
///
/// Candidates are created with create-exclusive semantics, so concurrent
/// callers for the same file always end up on distinct paths.
pub async fn materialize(text: &str, file_path: &Path) -> Result<TempArtifact, BridgeError> {
    let file_name = file_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| {
            BridgeError::temp_file(
                file_path,
                std::io::Error::new(ErrorKind::InvalidInput, "path has no file name"),
            )
        })?;
    let dir = file_path.parent().unwrap_or_else(|| Path::new("."));

    for attempt in 0..MAX_ATTEMPTS {
        let path = candidate_path(dir, &file_name, attempt);
        let mut file = match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(BridgeError::temp_file(path, e)),
        };

        // From here on the artifact owns the path, so a failed write cleans up.
        let artifact = TempArtifact {
            path,
            owner_path: file_path.to_path_buf(),
            disposed: false,
        };

        let written = match file.write_all(text.as_bytes()).await {
            Ok(()) => file.flush().await,
            Err(e) => Err(e),
        };

        return match written {
            Ok(()) => {
                debug!("Wrote temp copy {}", artifact.path.display());
                Ok(artifact)
            }
            Err(e) => Err(BridgeError::temp_file(artifact.path(), e)),
        };
    }

    Err(BridgeError::temp_file(
        candidate_path(dir, &file_name, MAX_ATTEMPTS),
        std::io::Error::new(ErrorKind::AlreadyExists, "no free temp path"),
    ))
}

/// Backslash-escapes characters a POSIX shell would interpret.
pub fn shell_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        let safe = ch.is_ascii_alphanumeric()
            || matches!(ch, '/' | '.' | '_' | '-' | ',' | ':' | '=' | '+' | '@' | '%');
        if !safe {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}
