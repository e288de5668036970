//! Outline language server and structured-text outline index.

use std::sync::{Arc, OnceLock};

use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer, LspService};
use tracing::{debug, info};

mod document;
mod lsp;
mod outline;
pub(crate) mod settings;

pub use document::{DocumentSnapshot, DocumentState, DocumentStore, LineIndex};
pub use lsp::{
    display_name, document_highlight, document_symbols, select_params, symbol_kind,
    CaretMovedParams, PreviewParams, SelectRegion, SelectRegionParams, CARET_MOVED_METHOD,
    PREVIEW_METHOD,
};
pub use outline::{
    locate, preview, region_at, OutlineError, OutlineIndex, OutlineView, PartitionMode,
    Partitioner, Region, RegionKind, SelectionEvent, TreeHost, DEFAULT_DELIMITERS,
    DEFAULT_FENCE_PATTERN, DEFAULT_HEADING_PATTERN,
};
pub use settings::{
    build_partitioner, discover_settings, load_settings, read_settings, OutlineMode,
    OutlineSettings, Settings, SettingsError, SETTINGS_FILE,
};

pub struct Backend {
    client: Client,
    documents: DocumentStore,
    partitioner: OnceLock<Arc<Partitioner>>,
}

impl Backend {
    pub(crate) fn new(client: Client) -> Self {
        Self {
            client,
            documents: DocumentStore::new(),
            partitioner: OnceLock::new(),
        }
    }

    /// The partitioner configured at initialization, or the default one.
    fn partitioner(&self) -> Arc<Partitioner> {
        Arc::clone(self.partitioner.get_or_init(Arc::default))
    }

    /// Handle `outline/caretMoved`: select the region under the caret.
    async fn caret_moved(&self, params: CaretMovedParams) {
        let uri = params.text_document.uri;
        let select = self
            .documents
            .with_document(&uri, |state| {
                let offset = state.line_index.position_to_offset(params.position)?;
                let event = state.outline.on_caret_moved(offset)?;
                Some(select_params(&uri, &event, &state.line_index))
            })
            .flatten();

        match select {
            Some(select) => {
                self.client
                    .send_notification::<SelectRegion>(select)
                    .await
            }
            None => debug!(%uri, position = ?params.position, "caret outside all regions"),
        }
    }

    /// Handle `outline/preview`: numbered listing of the document's regions.
    async fn preview(&self, params: PreviewParams) -> Result<Vec<String>> {
        let lines = self
            .documents
            .with_document(&params.text_document.uri, |state| {
                preview(state.outline.regions(), state.line_index.text())
            })
            .unwrap_or_default();
        Ok(lines)
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for Backend {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        let workspace_root = params
            .workspace_folders
            .as_ref()
            .and_then(|folders| folders.first())
            .and_then(|f| f.uri.to_file_path().ok())
            .or_else(|| {
                #[allow(deprecated)]
                params.root_uri.as_ref()?.to_file_path().ok()
            });

        let partitioner = match workspace_root {
            Some(root) => {
                let (settings, settings_dir) = settings::discover_settings(&root);
                debug!(
                    root = %root.display(),
                    settings_dir = %settings_dir.display(),
                    "workspace settings"
                );
                settings::build_partitioner(&settings)
            }
            None => Partitioner::default(),
        };
        let _ = self.partitioner.set(Arc::new(partitioner));

        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Kind(
                    TextDocumentSyncKind::FULL,
                )),
                document_symbol_provider: Some(OneOf::Left(true)),
                document_highlight_provider: Some(OneOf::Left(true)),
                ..Default::default()
            },
            server_info: Some(ServerInfo {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        info!("outline language server initialized");
        self.client
            .log_message(MessageType::INFO, "Outline language server initialized")
            .await;
    }

    async fn shutdown(&self) -> Result<()> {
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        self.documents.open(
            params.text_document.uri,
            params.text_document.text,
            params.text_document.version,
            self.partitioner(),
        );
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        // We use FULL sync, so there's exactly one change with the full text
        if let Some(change) = params.content_changes.into_iter().next() {
            self.documents.change(
                &params.text_document.uri,
                change.text,
                params.text_document.version,
            );
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        self.documents.close(&params.text_document.uri);
    }

    async fn document_symbol(
        &self,
        params: DocumentSymbolParams,
    ) -> Result<Option<DocumentSymbolResponse>> {
        let symbols = self.documents.with_document(&params.text_document.uri, |state| {
            document_symbols(state.outline.regions(), &state.line_index)
        });
        Ok(symbols.map(DocumentSymbolResponse::Nested))
    }

    async fn document_highlight(
        &self,
        params: DocumentHighlightParams,
    ) -> Result<Option<Vec<DocumentHighlight>>> {
        let uri = &params.text_document_position_params.text_document.uri;
        let position = params.text_document_position_params.position;

        let highlights = self.documents.with_document(uri, |state| {
            document_highlight(state.outline.regions(), &state.line_index, position)
        });
        Ok(highlights.flatten())
    }
}

pub fn create_service() -> (LspService<Backend>, tower_lsp::ClientSocket) {
    LspService::build(Backend::new)
        .custom_method(CARET_MOVED_METHOD, Backend::caret_moved)
        .custom_method(PREVIEW_METHOD, Backend::preview)
        .finish()
}
