//! Immutable, versioned captures of document text.

use std::sync::Arc;

/// Document text at one point in time.
///
/// Cloning is cheap: the text is shared. A new snapshot is produced for every
/// edit, with a strictly larger version than the one it replaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSnapshot {
    text: Arc<str>,
    version: u64,
}

impl DocumentSnapshot {
    pub fn new(text: impl Into<Arc<str>>, version: u64) -> Self {
        Self {
            text: text.into(),
            version,
        }
    }

    /// Snapshot for an LSP document version. Negative versions clamp to zero.
    pub fn from_lsp(text: String, version: i32) -> Self {
        Self::new(text, u64::try_from(version).unwrap_or(0))
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Shared handle to the text.
    pub fn shared_text(&self) -> Arc<str> {
        Arc::clone(&self.text)
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Length of the text in bytes.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// The snapshot following this one with the given text.
    pub fn next(&self, text: impl Into<Arc<str>>) -> Self {
        Self::new(text, self.version + 1)
    }
}
