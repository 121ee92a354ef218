//! Client-provided settings (`initializationOptions`).

use serde::Deserialize;
use tracing::warn;

use lintbridge_core::{BridgeSettings, ToolCommand};

/// Settings accepted in `initializationOptions`.
///
/// ```json
/// { "lintCommand": ["python", "/opt/gjslint.py"], "fixOnSave": true }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializationOptions {
    #[serde(default)]
    pub lint_command: Option<Vec<String>>,
    #[serde(default)]
    pub fix_command: Option<Vec<String>>,
    #[serde(default)]
    pub fix_on_save: bool,
}

impl InitializationOptions {
    /// Reads options from the raw value, falling back to defaults when the
    /// value is missing or malformed.
    pub fn from_value(value: Option<serde_json::Value>) -> Self {
        let Some(value) = value else {
            return Self::default();
        };
        match serde_json::from_value(value) {
            Ok(options) => options,
            Err(e) => {
                warn!("Ignoring invalid initializationOptions: {}", e);
                Self::default()
            }
        }
    }

    /// Builds bridge settings, keeping defaults for commands not given.
    pub fn settings(&self) -> BridgeSettings {
        let mut settings = BridgeSettings::default();
        if let Some(command) = self.lint_command.as_deref().and_then(command_from_parts) {
            settings.lint_command = command;
        }
        if let Some(command) = self.fix_command.as_deref().and_then(command_from_parts) {
            settings.fix_command = command;
        }
        settings
    }
}

fn command_from_parts(parts: &[String]) -> Option<ToolCommand> {
    let (program, args) = parts.split_first()?;
    Some(ToolCommand::new(program.clone()).with_args(args.iter().cloned()))
}
