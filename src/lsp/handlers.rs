use tower_lsp::jsonrpc::{Error as LspError, Result as LspResult};
use tower_lsp::lsp_types::*;

use crate::build::{self, BuildConfig, BuildError};
use crate::lsp::backend::Backend;
use crate::lsp::diagnostics::group_by_uri;
use crate::lsp::protocol::{BuildParams, BuildResult};

/// Trait for handling build requests
#[tower_lsp::async_trait]
pub trait HandleBuild {
    async fn handle_build(&self, params: BuildParams) -> LspResult<BuildResult>;
    async fn pull_build_config(&self, root: &Url) -> BuildConfig;
    async fn publish_build_diagnostics(&self, errors: Vec<BuildError>);
}

#[tower_lsp::async_trait]
impl HandleBuild for Backend {
    async fn handle_build(&self, params: BuildParams) -> LspResult<BuildResult> {
        let uri = params.text_document.uri;

        // Resolve the root under the lock, then release it for the compile.
        let root = {
            let workspace = self.workspace.lock().await;
            match workspace.resolve_root(&uri) {
                Some(document) => document.uri.clone(),
                None => {
                    return Err(LspError::invalid_params(format!(
                        "unknown document: {uri}"
                    )));
                }
            }
        };

        let lock = self.build_lock(&root).await;
        let _guard = lock.lock().await;

        // Configuration follows the root, not the document named in the
        // request.
        let config = self.pull_build_config(&root).await;
        log::info!("building {} with {}", root, config.executable);
        let outcome = build::build(&root, &config).await;

        self.publish_build_diagnostics(outcome.errors).await;

        Ok(BuildResult {
            status: outcome.status,
        })
    }

    /// Ask the client for `latex.build` scoped to the root; fall back to the
    /// server-side defaults when it cannot or will not answer.
    async fn pull_build_config(&self, root: &Url) -> BuildConfig {
        let items = vec![ConfigurationItem {
            scope_uri: Some(root.clone()),
            section: Some("latex.build".to_string()),
        }];

        match self.client.configuration(items).await {
            Ok(values) => values
                .into_iter()
                .next()
                .and_then(|value| serde_json::from_value(value).ok())
                .unwrap_or_else(|| self.config.build.clone()),
            Err(err) => {
                log::debug!("configuration request failed: {}", err);
                self.config.build.clone()
            }
        }
    }

    /// Clear every tracked document, then publish the fresh groups.
    ///
    /// The clear pass is unconditional so a document whose errors were fixed
    /// since the last cycle does not keep stale diagnostics.
    async fn publish_build_diagnostics(&self, errors: Vec<BuildError>) {
        let tracked: Vec<Url> = {
            let workspace = self.workspace.lock().await;
            workspace
                .documents()
                .iter()
                .map(|document| document.uri.clone())
                .collect()
        };

        for uri in tracked {
            self.client.publish_diagnostics(uri, Vec::new(), None).await;
        }

        for (uri, diagnostics) in group_by_uri(errors) {
            self.client.publish_diagnostics(uri, diagnostics, None).await;
        }
    }
}
