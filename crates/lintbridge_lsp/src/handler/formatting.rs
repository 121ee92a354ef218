//! Fix handlers (formatting and fix-on-save).

use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tracing::{debug, warn};

use lintbridge_core::{FixedText, Outcome};

use crate::conversion::full_document_range;
use crate::state::SharedState;

/// Edits produced by running the fixer on a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixEdits {
    /// Text edits to apply; empty when the document is already styled.
    Edits(Vec<TextEdit>),
    /// The fixer failed.
    Failed(String),
    /// Nothing to report: unknown document, superseded, or skipped.
    None,
}

/// Runs the fixer on the cached text of `uri`.
///
/// The result is dropped when the document changed while the fixer ran.
pub async fn fix_edits(state: &SharedState, uri: &Url) -> FixEdits {
    let Some((text, version)) = state.document(uri) else {
        debug!("Fix requested for unknown document: {}", uri);
        return FixEdits::None;
    };
    let Ok(path) = uri.to_file_path() else {
        debug!("Skipping fix for non-file URI: {}", uri);
        return FixEdits::None;
    };

    let bridge = state.bridge();
    let session = state.session(uri);
    let fixed = match bridge.fix_text_in(&session, &text, &path).await {
        Outcome::Current(fixed) => fixed,
        Outcome::Superseded | Outcome::Skipped(_) => return FixEdits::None,
    };

    if state.document(uri).map(|(_, v)| v) != Some(version) {
        debug!("{} changed during fix, discarding", uri);
        return FixEdits::None;
    }

    match fixed {
        FixedText::Changed(new_text) => FixEdits::Edits(vec![TextEdit {
            range: full_document_range(&text),
            new_text,
        }]),
        FixedText::Unchanged => FixEdits::Edits(Vec::new()),
        FixedText::Failed(message) => FixEdits::Failed(message),
    }
}

/// Handles the `textDocument/formatting` request.
pub async fn handle_formatting(
    state: &SharedState,
    client: &tower_lsp::Client,
    params: DocumentFormattingParams,
) -> Result<Option<Vec<TextEdit>>> {
    debug!("Formatting request: {}", params.text_document.uri);
    Ok(report(client, fix_edits(state, &params.text_document.uri).await).await)
}

/// Handles the `textDocument/willSaveWaitUntil` request.
///
/// Returns the fix edits while fix-on-save is listening. The client saves
/// the fixed text itself, so the server never issues a save.
pub async fn handle_will_save_wait_until(
    state: &SharedState,
    client: &tower_lsp::Client,
    params: WillSaveTextDocumentParams,
) -> Result<Option<Vec<TextEdit>>> {
    let bridge = state.bridge();
    let Some(_detached) = bridge.fix_on_save().detach() else {
        return Ok(None);
    };
    debug!("Fix on save: {}", params.text_document.uri);

    Ok(report(client, fix_edits(state, &params.text_document.uri).await).await)
}

async fn report(client: &tower_lsp::Client, edits: FixEdits) -> Option<Vec<TextEdit>> {
    match edits {
        FixEdits::Edits(edits) => Some(edits),
        FixEdits::Failed(message) => {
            warn!("Fix failed: {}", message);
            client.log_message(MessageType::WARNING, message).await;
            None
        }
        FixEdits::None => None,
    }
}
