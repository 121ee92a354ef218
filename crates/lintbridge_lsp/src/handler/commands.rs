//! `workspace/executeCommand` handler.

use std::collections::HashMap;

use serde_json::Value;
use tower_lsp::jsonrpc::{Error, Result};
use tower_lsp::lsp_types::*;
use tracing::{debug, warn};

use super::formatting::{FixEdits, fix_edits};
use super::initialize::{FIX_COMMAND, SET_FIX_ON_SAVE_COMMAND};
use crate::state::SharedState;

/// Handles the `workspace/executeCommand` request.
pub async fn handle_execute_command(
    state: &SharedState,
    client: &tower_lsp::Client,
    params: ExecuteCommandParams,
) -> Result<Option<Value>> {
    debug!("Execute command: {}", params.command);

    match params.command.as_str() {
        SET_FIX_ON_SAVE_COMMAND => {
            let enabled = params
                .arguments
                .first()
                .and_then(Value::as_bool)
                .ok_or_else(|| Error::invalid_params("expected a boolean argument"))?;
            state.bridge().set_fix_on_save(enabled);
            Ok(Some(Value::Bool(enabled)))
        }
        FIX_COMMAND => {
            let uri = params
                .arguments
                .first()
                .and_then(Value::as_str)
                .and_then(|s| Url::parse(s).ok())
                .ok_or_else(|| Error::invalid_params("expected a document URI"))?;

            match fix_edits(state, &uri).await {
                FixEdits::Edits(edits) if edits.is_empty() => Ok(Some(Value::Bool(false))),
                FixEdits::Edits(edits) => {
                    let edit = WorkspaceEdit {
                        changes: Some(HashMap::from([(uri, edits)])),
                        ..Default::default()
                    };
                    let applied = match client.apply_edit(edit).await {
                        Ok(response) => response.applied,
                        Err(e) => {
                            warn!("applyEdit failed: {}", e);
                            false
                        }
                    };
                    Ok(Some(Value::Bool(applied)))
                }
                FixEdits::Failed(message) => {
                    client.log_message(MessageType::WARNING, &message).await;
                    Err(Error {
                        message: message.into(),
                        ..Error::internal_error()
                    })
                }
                FixEdits::None => Ok(None),
            }
        }
        other => Err(Error::invalid_params(format!("unknown command: {other}"))),
    }
}
