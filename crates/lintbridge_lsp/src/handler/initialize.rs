//! Initialize and shutdown handlers.

use std::path::PathBuf;

use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tracing::info;

use lintbridge_core::LintBridge;

use crate::config::InitializationOptions;
use crate::state::BackendState;

/// Command toggling fix-on-save; takes one boolean argument.
pub const SET_FIX_ON_SAVE_COMMAND: &str = "lintbridge.setFixOnSave";
/// Command fixing a document; takes its URI.
pub const FIX_COMMAND: &str = "lintbridge.fix";

/// Handles the `initialize` LSP request.
///
/// Replaces the bridge so the workspace root and client settings apply to
/// every later request.
pub async fn handle_initialize(
    state: &BackendState,
    params: InitializeParams,
) -> Result<InitializeResult> {
    info!("LintBridge LSP server initializing...");

    let root = workspace_root(&params);
    let options = InitializationOptions::from_value(params.initialization_options);

    match &root {
        Some(path) => info!("Project root: {}", path.display()),
        None => info!("No workspace root, documents will not be linted"),
    }

    let bridge = LintBridge::new(root, options.settings());
    bridge.set_fix_on_save(options.fix_on_save);
    state.set_bridge(bridge);

    Ok(InitializeResult {
        capabilities: ServerCapabilities {
            text_document_sync: Some(TextDocumentSyncCapability::Options(
                TextDocumentSyncOptions {
                    open_close: Some(true),
                    change: Some(TextDocumentSyncKind::FULL),
                    will_save_wait_until: Some(true),
                    save: Some(TextDocumentSyncSaveOptions::SaveOptions(SaveOptions {
                        include_text: Some(true),
                    })),
                    ..Default::default()
                },
            )),
            document_formatting_provider: Some(OneOf::Left(true)),
            execute_command_provider: Some(ExecuteCommandOptions {
                commands: vec![SET_FIX_ON_SAVE_COMMAND.to_string(), FIX_COMMAND.to_string()],
                work_done_progress_options: Default::default(),
            }),
            ..Default::default()
        },
        server_info: Some(ServerInfo {
            name: "lintbridge-lsp".to_string(),
            version: Some(env!("CARGO_PKG_VERSION").to_string()),
        }),
    })
}

/// Workspace root: the first workspace folder, else `rootUri`.
fn workspace_root(params: &InitializeParams) -> Option<PathBuf> {
    params
        .workspace_folders
        .as_ref()
        .and_then(|folders| folders.first())
        .and_then(|folder| folder.uri.to_file_path().ok())
        .or_else(|| {
            params
                .root_uri
                .as_ref()
                .and_then(|uri| uri.to_file_path().ok())
        })
}

/// Handles the `initialized` LSP notification.
pub async fn handle_initialized(client: &tower_lsp::Client) {
    client
        .log_message(MessageType::INFO, "LintBridge LSP server initialized!")
        .await;
}

/// Handles the `shutdown` LSP request.
pub async fn handle_shutdown() -> Result<()> {
    info!("LintBridge LSP server shutting down...");
    Ok(())
}
