use crate::conversions::{to_document_uri, to_lsp_diagnostic, to_lsp_uri, to_message_type};
use crate::process::TokioCommandRunner;
use crate::provider::CredoProvider;
use crate::sink::{DiagnosticSink, MessageLevel};
use crate::LogFilter;
use credo_config::CredoConfig;
use credo_parser::Diagnostic;
use credo_types::{Document, DocumentUri};
use dashmap::DashMap;
use lsp_types::{
    DidChangeConfigurationParams, DidChangeTextDocumentParams, DidChangeWorkspaceFoldersParams,
    DidCloseTextDocumentParams, DidOpenTextDocumentParams, DidSaveTextDocumentParams,
    InitializeParams, InitializeResult, InitializedParams, MessageType, OneOf, SaveOptions,
    ServerCapabilities, ServerInfo, TextDocumentSyncCapability, TextDocumentSyncKind,
    TextDocumentSyncOptions, TextDocumentSyncSaveOptions, WorkspaceFolder,
    WorkspaceFoldersServerCapabilities, WorkspaceServerCapabilities,
};
use std::path::PathBuf;
use std::sync::Arc;
use tower_lsp_server::jsonrpc::Result;
use tower_lsp_server::{Client, LanguageServer, UriExt};

/// Publishes diagnostics and messages through the LSP client.
pub struct LspSink {
    client: Client,
}

impl LspSink {
    pub const fn new(client: Client) -> Self {
        Self { client }
    }
}

impl DiagnosticSink for LspSink {
    async fn publish(&self, uri: DocumentUri, diagnostics: Vec<Diagnostic>) {
        let Some(lsp_uri) = to_lsp_uri(&uri) else {
            tracing::warn!(%uri, "Cannot publish diagnostics for invalid URI");
            return;
        };
        let diagnostics = diagnostics.into_iter().map(to_lsp_diagnostic).collect();
        self.client
            .publish_diagnostics(lsp_uri, diagnostics, None)
            .await;
    }

    async fn clear(&self, uri: DocumentUri) {
        self.publish(uri, Vec::new()).await;
    }

    async fn notify(&self, level: MessageLevel, message: String) {
        let message_type = to_message_type(level);
        self.client.log_message(message_type, &message).await;
        if level != MessageLevel::Info {
            self.client.show_message(message_type, message).await;
        }
    }
}

pub struct CredoLanguageServer {
    client: Client,
    provider: CredoProvider<TokioCommandRunner, LspSink>,
    /// Open documents, kept current by full-text sync
    documents: DashMap<DocumentUri, Document>,
    workspace_folders: DashMap<String, PathBuf>,
    log_filter: Option<LogFilter>,
}

impl CredoLanguageServer {
    pub fn new(client: Client, log_filter: Option<LogFilter>) -> Self {
        let sink = Arc::new(LspSink::new(client.clone()));
        Self {
            provider: CredoProvider::new(Arc::new(TokioCommandRunner), sink, CredoConfig::default()),
            client,
            documents: DashMap::new(),
            workspace_folders: DashMap::new(),
            log_filter,
        }
    }

    fn add_workspace_folders(&self, folders: &[WorkspaceFolder]) {
        for folder in folders {
            if let Some(path) = folder.uri.to_file_path() {
                self.workspace_folders
                    .insert(folder.uri.as_str().to_string(), path.into_owned());
            }
        }
    }

    fn sync_workspace_folders(&self) {
        let folders = self
            .workspace_folders
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        self.provider.set_workspace_folders(folders);
    }

    /// Parse settings and apply them, reporting invalid ones to the user.
    async fn apply_settings(&self, settings: &serde_json::Value) -> bool {
        match CredoConfig::from_settings(settings) {
            Ok(config) => {
                if let Some(filter) = &self.log_filter {
                    filter.apply(&config);
                }
                self.provider.on_config_changed(config);
                true
            }
            Err(error) => {
                tracing::error!(%error, "Invalid Credo settings");
                let message = format!("Invalid Credo settings: {error}");
                self.client.log_message(MessageType::ERROR, &message).await;
                self.client.show_message(MessageType::ERROR, message).await;
                false
            }
        }
    }

    /// Queue a lint run for `document`.
    ///
    /// `execute` builds a fresh task per call and handlers run on the server's
    /// runtime, so neither queue error can occur here. A notification handler
    /// has no caller to return to, so an error ends the handler after it is
    /// logged and shown in the client's output.
    async fn lint(&self, document: Document) {
        if let Err(error) = self.provider.execute(document) {
            tracing::error!(%error, "Failed to queue lint run");
            self.client
                .log_message(MessageType::ERROR, error.to_string())
                .await;
        }
    }
}

impl LanguageServer for CredoLanguageServer {
    #[tracing::instrument(skip(self, params))]
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        tracing::info!("Initializing Credo Language Server");

        if let Some(folders) = &params.workspace_folders {
            tracing::info!(count = folders.len(), "Workspace folders");
            self.add_workspace_folders(folders);
        }
        self.sync_workspace_folders();

        if let Some(options) = &params.initialization_options {
            self.apply_settings(options).await;
        }

        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Options(
                    TextDocumentSyncOptions {
                        open_close: Some(true),
                        change: Some(TextDocumentSyncKind::FULL),
                        save: Some(TextDocumentSyncSaveOptions::SaveOptions(SaveOptions {
                            include_text: Some(true),
                        })),
                        ..Default::default()
                    },
                )),
                workspace: Some(WorkspaceServerCapabilities {
                    workspace_folders: Some(WorkspaceFoldersServerCapabilities {
                        supported: Some(true),
                        change_notifications: Some(OneOf::Left(true)),
                    }),
                    file_operations: None,
                }),
                ..Default::default()
            },
            server_info: Some(ServerInfo {
                name: "Credo Language Server".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _params: InitializedParams) {
        let version = env!("CARGO_PKG_VERSION");
        tracing::info!(version, "Credo Language Server initialized");
        self.client
            .log_message(
                MessageType::INFO,
                format!("Credo language server initialized (v{version})"),
            )
            .await;
    }

    async fn shutdown(&self) -> Result<()> {
        tracing::info!("Shutting down Credo Language Server");
        self.provider.shutdown();
        Ok(())
    }

    #[tracing::instrument(skip(self, params), fields(uri = %params.text_document.uri.as_str()))]
    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        tracing::debug!("Document opened");
        let item = params.text_document;
        let document = Document::new(to_document_uri(&item.uri), item.language_id, item.text);
        self.documents
            .insert(document.uri.clone(), document.clone());
        self.lint(document).await;
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = to_document_uri(&params.text_document.uri);
        let Some(change) = params.content_changes.into_iter().last() else {
            return;
        };
        if let Some(mut document) = self.documents.get_mut(&uri) {
            document.text = change.text.into();
        }
    }

    #[tracing::instrument(skip(self, params), fields(uri = %params.text_document.uri.as_str()))]
    async fn did_save(&self, params: DidSaveTextDocumentParams) {
        tracing::debug!("Document saved");
        let uri = to_document_uri(&params.text_document.uri);
        let document = {
            let Some(mut entry) = self.documents.get_mut(&uri) else {
                tracing::debug!("Saved document is not open");
                return;
            };
            if let Some(text) = params.text {
                entry.text = text.into();
            }
            entry.clone()
        };
        self.lint(document).await;
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = to_document_uri(&params.text_document.uri);
        tracing::debug!(%uri, "Document closed");
        self.documents.remove(&uri);
        self.provider.clear(&uri).await;
    }

    #[tracing::instrument(skip_all)]
    async fn did_change_configuration(&self, params: DidChangeConfigurationParams) {
        if !self.apply_settings(&params.settings).await {
            return;
        }

        let open: Vec<Document> = self
            .documents
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        tracing::info!(count = open.len(), "Re-linting open documents");
        for document in open {
            self.lint(document).await;
        }
    }

    async fn did_change_workspace_folders(&self, params: DidChangeWorkspaceFoldersParams) {
        for folder in &params.event.removed {
            self.workspace_folders.remove(folder.uri.as_str());
        }
        self.add_workspace_folders(&params.event.added);
        self.sync_workspace_folders();
    }
}
