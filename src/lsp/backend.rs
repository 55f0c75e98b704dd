use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use tokio::sync::Mutex;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer};

use crate::core::{Language, Workspace};
use crate::lsp::handlers::HandleBuild;
use crate::lsp::protocol::{BuildParams, BuildResult};
use crate::Config;

/// The main LSP backend that holds state and implements the Language Server Protocol
pub struct Backend {
    pub client: Client,
    pub workspace: Arc<Mutex<Workspace>>,
    pub config: Config,
    build_locks: Mutex<HashMap<Url, Arc<Mutex<()>>>>,
}

impl Backend {
    pub fn new(client: Client, config: Config) -> Self {
        Self {
            client,
            workspace: Arc::new(Mutex::new(Workspace::new())),
            config,
            build_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Entry point for the custom `textDocument/build` request.
    pub async fn build_request(
        &self,
        params: BuildParams,
    ) -> tower_lsp::jsonrpc::Result<BuildResult> {
        self.handle_build(params).await
    }

    /// Builds of the same root are serialized; distinct roots stay
    /// independent.
    pub(crate) async fn build_lock(&self, root: &Url) -> Arc<Mutex<()>> {
        let mut locks = self.build_locks.lock().await;
        locks.entry(root.clone()).or_default().clone()
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for Backend {
    async fn initialize(
        &self,
        params: InitializeParams,
    ) -> tower_lsp::jsonrpc::Result<InitializeResult> {
        #[allow(deprecated)]
        let root_uri = params.root_uri;

        if let Some(root) = root_uri {
            if let Ok(path) = root.to_file_path() {
                // The scan holds the workspace lock for the whole walk.
                let mut workspace = self.workspace.lock().await;
                workspace.load_directory(&path);
                log::info!(
                    "workspace scan finished: {} documents",
                    workspace.documents().len()
                );
            }
        }

        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Options(
                    TextDocumentSyncOptions {
                        open_close: Some(true),
                        change: Some(TextDocumentSyncKind::FULL),
                        ..Default::default()
                    },
                )),
                ..Default::default()
            },
            ..Default::default()
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        self.client
            .log_message(MessageType::INFO, "latex-language-server initialized")
            .await;
    }

    async fn shutdown(&self) -> tower_lsp::jsonrpc::Result<()> {
        Ok(())
    }

    // Track opened documents; files with unknown extensions are never loaded
    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let uri = params.text_document.uri;
        let Some(language) = Language::by_path(Path::new(uri.path())) else {
            log::debug!("ignoring document with unknown extension: {}", uri);
            return;
        };

        let mut workspace = self.workspace.lock().await;
        workspace.open(uri, language, params.text_document.text);
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri;
        if let Some(change) = params.content_changes.into_iter().last() {
            let mut workspace = self.workspace.lock().await;
            if !workspace.update(&uri, change.text) {
                log::warn!("change for untracked document: {}", uri);
            }
        }
    }
}
