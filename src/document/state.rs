//! Per-document outline state for the language server.

use std::sync::Arc;

use dashmap::DashMap;
use tower_lsp::lsp_types::Url;
use tracing::{debug, warn};

use crate::outline::{OutlineIndex, Partitioner};

use super::snapshot::DocumentSnapshot;
use super::text::LineIndex;

/// State for a single open document.
#[derive(Debug, Clone)]
pub struct DocumentState {
    /// Outline of the latest snapshot.
    pub outline: OutlineIndex,
    /// Line table for the same snapshot, for position conversion.
    pub line_index: LineIndex,
}

impl DocumentState {
    /// Attach a fresh outline index to `snapshot`.
    pub fn new(snapshot: DocumentSnapshot, partitioner: Arc<Partitioner>) -> Self {
        let line_index = LineIndex::new(&snapshot);
        Self {
            outline: OutlineIndex::attached(partitioner, snapshot),
            line_index,
        }
    }

    /// Rebuild from a newer snapshot. Returns `false` if the snapshot was stale.
    pub fn update(&mut self, snapshot: DocumentSnapshot) -> bool {
        let line_index = LineIndex::new(&snapshot);
        if !self.outline.on_document_changed(snapshot) {
            return false;
        }
        self.line_index = line_index;
        true
    }

    /// Version of the indexed snapshot.
    pub fn version(&self) -> Option<u64> {
        self.outline.snapshot().map(DocumentSnapshot::version)
    }
}

/// Thread-safe storage for open documents, one outline per URI.
#[derive(Debug, Default)]
pub struct DocumentStore {
    documents: DashMap<Url, DocumentState>,
}

impl DocumentStore {
    /// Create a new empty document store.
    pub fn new() -> Self {
        Self {
            documents: DashMap::new(),
        }
    }

    /// Attach a document. A document already open under the same URI is
    /// detached first.
    pub fn open(&self, uri: Url, text: String, version: i32, partitioner: Arc<Partitioner>) {
        let state = DocumentState::new(DocumentSnapshot::from_lsp(text, version), partitioner);
        if let Some(mut previous) = self.documents.insert(uri.clone(), state) {
            previous.outline.detach();
            debug!(%uri, "replaced previously attached document");
        }
    }

    /// Apply a full-text change. Returns `false` if the document is not open
    /// or the version is stale.
    pub fn change(&self, uri: &Url, text: String, version: i32) -> bool {
        let Some(mut state) = self.documents.get_mut(uri) else {
            warn!(%uri, "change for a document that is not open");
            return false;
        };
        state.update(DocumentSnapshot::from_lsp(text, version))
    }

    /// Detach and drop a document. Returns whether it was open.
    pub fn close(&self, uri: &Url) -> bool {
        match self.documents.remove(uri) {
            Some((_, mut state)) => {
                state.outline.detach();
                true
            }
            None => false,
        }
    }

    /// Run `f` against a document's state.
    ///
    /// The entry is locked for the duration of `f`, so `f` must not block.
    pub fn with_document<R>(&self, uri: &Url, f: impl FnOnce(&DocumentState) -> R) -> Option<R> {
        self.documents.get(uri).map(|state| f(&state))
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}
