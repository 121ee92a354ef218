//! LSP Backend state management.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};

use tower_lsp::lsp_types::Url;
use tracing::error;

use lintbridge_core::{BridgeSettings, LintBridge, RequestSession};

/// Document content and version cache.
#[derive(Debug)]
pub(crate) struct DocumentData {
    pub text: String,
    pub version: i32,
    pub language_id: String,
    /// Lint and fix freshness for this document only.
    pub session: Arc<RequestSession>,
}

impl DocumentData {
    pub fn new(text: String, version: i32, language_id: String) -> Self {
        Self {
            text,
            version,
            language_id,
            session: Arc::default(),
        }
    }
}

/// Shared backend state.
pub(crate) struct BackendState {
    /// Document contents cache.
    pub documents: RwLock<HashMap<Url, DocumentData>>,
    /// Bridge instance, replaced when the client sends settings.
    pub bridge: RwLock<Arc<LintBridge>>,
}

impl fmt::Debug for BackendState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendState")
            .field("documents", &"<HashMap<Url, DocumentData>>")
            .field("bridge", &self.bridge)
            .finish()
    }
}

impl BackendState {
    /// Creates a new empty state with default tool settings.
    pub fn new() -> Self {
        Self {
            documents: RwLock::new(HashMap::new()),
            bridge: RwLock::new(Arc::new(LintBridge::new(None, BridgeSettings::default()))),
        }
    }

    /// Returns the current bridge.
    pub fn bridge(&self) -> Arc<LintBridge> {
        match self.bridge.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => {
                error!("Bridge lock poisoned: {}", poisoned);
                poisoned.into_inner().clone()
            }
        }
    }

    /// Replaces the bridge.
    pub fn set_bridge(&self, bridge: LintBridge) {
        match self.bridge.write() {
            Ok(mut guard) => *guard = Arc::new(bridge),
            Err(e) => error!("Bridge lock poisoned: {}", e),
        }
    }

    /// Returns a copy of the stored text and version of a document.
    pub fn document(&self, uri: &Url) -> Option<(String, i32)> {
        let docs = match self.documents.read() {
            Ok(g) => g,
            Err(e) => {
                error!("Documents lock poisoned: {}", e);
                return None;
            }
        };
        docs.get(uri).map(|d| (d.text.clone(), d.version))
    }

    /// Returns the request session of an open document.
    ///
    /// Documents that are not open get a fresh session, as nothing else can
    /// race with them.
    pub fn session(&self, uri: &Url) -> Arc<RequestSession> {
        self.documents
            .read()
            .ok()
            .and_then(|docs| docs.get(uri).map(|d| d.session.clone()))
            .unwrap_or_default()
    }

    /// Returns the language id recorded when the document was opened.
    pub fn language_id(&self, uri: &Url) -> Option<String> {
        let docs = self.documents.read().ok()?;
        docs.get(uri).map(|d| d.language_id.clone())
    }
}

impl Default for BackendState {
    fn default() -> Self {
        Self::new()
    }
}

/// Type alias for shared state.
pub type SharedState = Arc<BackendState>;
