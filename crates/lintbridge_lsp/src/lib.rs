//! LintBridge LSP Server
//!
//! Language Server Protocol front end for LintBridge.
//! Lints JavaScript and HTML buffers through Closure Linter as they are
//! edited and exposes the fixer as document formatting.

mod config;
mod conversion;
mod debounce;
mod handler;
mod state;

use std::path::Path;
use std::sync::Arc;

use serde_json::Value;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer, LspService, Server};
use tracing::{debug, info};

use lintbridge_core::Outcome;

pub use config::InitializationOptions;
pub use conversion::{DIAGNOSTIC_SOURCE, to_lsp_diagnostic};
pub use debounce::DEFAULT_DEBOUNCE_MS;
pub use handler::{FIX_COMMAND, SET_FIX_ON_SAVE_COMMAND};

use state::{BackendState, SharedState};

/// Language ids the linter understands.
const LINTABLE_LANGUAGES: &[&str] = &["javascript", "html"];
/// File extensions linted when the language id is unknown.
const LINTABLE_EXTENSIONS: &[&str] = &["js", "html", "htm"];

/// The LSP backend for LintBridge.
#[derive(Clone)]
pub struct Backend {
    /// LSP client for sending notifications.
    client: Client,
    /// Shared state
    state: SharedState,
}

impl Backend {
    /// Creates a new backend with the given client.
    ///
    /// Tool settings and the project root are applied on `initialize`.
    pub fn new(client: Client) -> Self {
        Self {
            client,
            state: Arc::new(BackendState::new()),
        }
    }

    /// Lints a document and publishes diagnostics.
    ///
    /// Only the latest successful run for the document publishes; a failed
    /// run is reported to the client log and leaves the previous diagnostics
    /// in place.
    async fn validate_document(&self, uri: &Url, text: &str, version: Option<i32>) {
        let Ok(path) = uri.to_file_path() else {
            debug!("Skipping validation for non-file URI: {}", uri);
            return;
        };
        if !is_lintable(self.state.language_id(uri).as_deref(), &path) {
            debug!("Skipping validation for unsupported document: {}", uri);
            return;
        }

        debug!("Validating document: {}", uri);
        let bridge = self.state.bridge();
        let session = self.state.session(uri);

        match bridge.scan_in(&session, text, &path).await {
            Outcome::Current(report) => match report.failure {
                Some(message) => {
                    self.client
                        .log_message(MessageType::WARNING, format!("{}: {}", uri, message))
                        .await;
                }
                None => {
                    let diagnostics = report
                        .errors
                        .iter()
                        .map(|d| to_lsp_diagnostic(d, text))
                        .collect();
                    self.client
                        .publish_diagnostics(uri.clone(), diagnostics, version)
                        .await;
                }
            },
            Outcome::Superseded => debug!("Dropping superseded lint of {}", uri),
            Outcome::Skipped(reason) => debug!("Lint of {} skipped: {:?}", uri, reason),
        }
    }
}

/// Whether a document should be linted, by language id or file extension.
fn is_lintable(language_id: Option<&str>, path: &Path) -> bool {
    if let Some(id) = language_id
        && !id.is_empty()
    {
        return LINTABLE_LANGUAGES.contains(&id);
    }
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            LINTABLE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

#[tower_lsp::async_trait]
impl LanguageServer for Backend {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        handler::handle_initialize(&self.state, params).await
    }

    async fn initialized(&self, _: InitializedParams) {
        handler::handle_initialized(&self.client).await;
    }

    async fn shutdown(&self) -> Result<()> {
        handler::handle_shutdown().await
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let (uri, text, version) = handler::handle_did_open(&self.state, params).await;
        self.validate_document(&uri, &text, version).await;
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let Some((uri, text, version)) = handler::handle_did_change(&self.state, params).await
        else {
            return;
        };

        let backend = self.clone();
        debounce::spawn_debounced_validation(
            self.state.clone(),
            uri,
            text,
            version,
            move |uri, text, version| async move {
                backend.validate_document(&uri, &text, version).await;
            },
        );
    }

    async fn will_save_wait_until(
        &self,
        params: WillSaveTextDocumentParams,
    ) -> Result<Option<Vec<TextEdit>>> {
        handler::handle_will_save_wait_until(&self.state, &self.client, params).await
    }

    async fn did_save(&self, params: DidSaveTextDocumentParams) {
        if let Some((uri, text)) = handler::handle_did_save(&self.state, params).await {
            self.validate_document(&uri, &text, None).await;
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = handler::handle_did_close(&self.state, params).await;
        self.client.publish_diagnostics(uri, vec![], None).await;
    }

    async fn formatting(&self, params: DocumentFormattingParams) -> Result<Option<Vec<TextEdit>>> {
        handler::handle_formatting(&self.state, &self.client, params).await
    }

    async fn execute_command(&self, params: ExecuteCommandParams) -> Result<Option<Value>> {
        handler::handle_execute_command(&self.state, &self.client, params).await
    }
}

/// Starts the LSP server.
///
/// This function does not return unless an error occurs or the server shuts down.
pub async fn run() {
    info!("LintBridge LSP server starting...");

    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) = LspService::new(Backend::new);
    Server::new(stdin, stdout, socket).serve(service).await;
}
