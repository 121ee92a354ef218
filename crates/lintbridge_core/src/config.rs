//! Hierarchical `.gjslintrc` resolution.

use std::io::ErrorKind;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::BridgeError;
use crate::invoker::ToolKind;

/// Name of the configuration file looked up in each ancestor directory.
pub const CONFIG_FILE_NAME: &str = ".gjslintrc";

/// Default flags passed to the linter.
pub const DEFAULT_LINT_FLAGS: &str = "--quiet --nosummary --strict";

/// Default flags passed to the fixer.
pub const DEFAULT_FIX_FLAGS: &str = "--strict";

/// Effective tool flags for one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Flags for the lint tool.
    pub lint_flags: String,
    /// Flags for the fix tool.
    pub fix_flags: String,
}

impl Config {
    /// Returns the flags for the given tool kind.
    pub fn flags(&self, kind: ToolKind) -> &str {
        match kind {
            ToolKind::Lint => &self.lint_flags,
            ToolKind::Fix => &self.fix_flags,
        }
    }

    /// Parses a config file body and layers it over `self`.
    ///
    /// Keys missing from the file keep the value from `self`.
    pub fn layered_with(&self, json: &str) -> Result<Self, serde_json::Error> {
        let file: ConfigFile = serde_json::from_str(json)?;
        let flags = file.flags.unwrap_or_default();

        Ok(Self {
            lint_flags: flags.lint.unwrap_or_else(|| self.lint_flags.clone()),
            fix_flags: flags.fix.unwrap_or_else(|| self.fix_flags.clone()),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            lint_flags: DEFAULT_LINT_FLAGS.to_string(),
            fix_flags: DEFAULT_FIX_FLAGS.to_string(),
        }
    }
}

/// On-disk shape of `.gjslintrc`. Unknown keys are ignored.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    flags: Option<FlagsSection>,
}

#[derive(Debug, Default, Deserialize)]
struct FlagsSection {
    #[serde(default, alias = "gjslint")]
    lint: Option<String>,
    #[serde(default, alias = "fixjsstyle")]
    fix: Option<String>,
}

/// Locates the nearest `.gjslintrc` for a file and layers it over defaults.
///
/// The defaults are fixed at construction and never modified by a lookup.
#[derive(Debug, Clone, Default)]
pub struct ConfigResolver {
    defaults: Config,
}

impl ConfigResolver {
    /// Creates a resolver with the given defaults.
    pub fn new(defaults: Config) -> Self {
        Self { defaults }
    }

    /// Returns the defaults used when no config file is found.
    pub fn defaults(&self) -> &Config {
        &self.defaults
    }

    /// Resolves the effective config for `file_path`.
    ///
    /// Search starts in the file's directory and walks up to `project_root`,
    /// stopping at the first `.gjslintrc`. A malformed file fails the lookup
    /// without consulting its ancestors.
    pub async fn resolve(
        &self,
        project_root: Option<&Path>,
        file_path: &Path,
    ) -> Result<Config, BridgeError> {
        let no_context = || BridgeError::NoProjectContext {
            path: file_path.to_path_buf(),
        };

        let root = project_root.ok_or_else(no_context)?;
        let mut current = file_path.parent().ok_or_else(no_context)?;
        if !current.starts_with(root) {
            return Err(no_context());
        }

        loop {
            if let Some(config) = self.read_level(current).await? {
                return Ok(config);
            }

            if current == root {
                debug!("No {} up to {}", CONFIG_FILE_NAME, root.display());
                return Ok(self.defaults.clone());
            }

            current = match current.parent() {
                Some(parent) => parent,
                None => return Ok(self.defaults.clone()),
            };
        }
    }

    async fn read_level(&self, dir: &Path) -> Result<Option<Config>, BridgeError> {
        let path = dir.join(CONFIG_FILE_NAME);
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory) => {
                return Ok(None);
            }
            Err(source) => return Err(BridgeError::ConfigRead { path, source }),
        };

        match self.defaults.layered_with(&content) {
            Ok(config) => {
                debug!("Using config: {}", path.display());
                Ok(Some(config))
            }
            Err(e) => {
                error!("Invalid JSON in {}: {}", path.display(), e);
                Err(BridgeError::config_parse(path, e.to_string()))
            }
        }
    }
}
