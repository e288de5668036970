//! The outline index for one attached document.

use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use super::partition::Partitioner;
use super::region::{locate, Region};
use crate::document::DocumentSnapshot;

/// Lifecycle misuse of an [`OutlineIndex`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OutlineError {
    #[error("a document at version {version} is already attached; detach it first")]
    AlreadyAttached { version: u64 },
}

/// Emitted when the caret lands inside a region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionEvent {
    /// Version of the snapshot the region was computed from.
    pub version: u64,
    /// Child indices from the top level down to `region`, so a tree host can
    /// expand every ancestor.
    pub path: Vec<usize>,
    pub region: Region,
}

#[derive(Debug, Clone)]
enum IndexState {
    Empty,
    Indexed {
        snapshot: DocumentSnapshot,
        regions: Vec<Region>,
    },
}

/// Region hierarchy for a single document, rebuilt wholesale on every change.
///
/// Starts out empty. [`attach`](Self::attach) indexes a first snapshot,
/// [`on_document_changed`](Self::on_document_changed) replaces it, and
/// [`detach`](Self::detach) drops it again.
#[derive(Debug, Clone)]
pub struct OutlineIndex {
    partitioner: Arc<Partitioner>,
    state: IndexState,
}

impl OutlineIndex {
    /// Create an index with no document attached.
    pub fn new(partitioner: Arc<Partitioner>) -> Self {
        Self {
            partitioner,
            state: IndexState::Empty,
        }
    }

    /// Create an index with `snapshot` already attached.
    pub fn attached(partitioner: Arc<Partitioner>, snapshot: DocumentSnapshot) -> Self {
        let state = Self::build(&partitioner, snapshot);
        Self { partitioner, state }
    }

    fn build(partitioner: &Partitioner, snapshot: DocumentSnapshot) -> IndexState {
        let regions = partitioner.partition(&snapshot);
        debug!(
            version = snapshot.version(),
            len = snapshot.len(),
            regions = regions.len(),
            "outline rebuilt"
        );
        IndexState::Indexed { snapshot, regions }
    }

    pub fn partitioner(&self) -> &Partitioner {
        &self.partitioner
    }

    pub fn is_attached(&self) -> bool {
        matches!(self.state, IndexState::Indexed { .. })
    }

    /// The snapshot the current regions were computed from.
    pub fn snapshot(&self) -> Option<&DocumentSnapshot> {
        match &self.state {
            IndexState::Empty => None,
            IndexState::Indexed { snapshot, .. } => Some(snapshot),
        }
    }

    /// Top-level regions of the current partition. Empty when nothing is attached.
    pub fn regions(&self) -> &[Region] {
        match &self.state {
            IndexState::Empty => &[],
            IndexState::Indexed { regions, .. } => regions,
        }
    }

    /// Attach a document and build its first partition.
    pub fn attach(&mut self, snapshot: DocumentSnapshot) -> Result<(), OutlineError> {
        if let Some(current) = self.snapshot() {
            return Err(OutlineError::AlreadyAttached {
                version: current.version(),
            });
        }
        self.state = Self::build(&self.partitioner, snapshot);
        Ok(())
    }

    /// Detach the current document, returning its last snapshot.
    pub fn detach(&mut self) -> Option<DocumentSnapshot> {
        match std::mem::replace(&mut self.state, IndexState::Empty) {
            IndexState::Empty => None,
            IndexState::Indexed { snapshot, .. } => Some(snapshot),
        }
    }

    /// Replace the snapshot and rebuild the partition from scratch.
    ///
    /// Returns `false` without touching the index when nothing is attached or
    /// when `snapshot` is not newer than the current one.
    pub fn on_document_changed(&mut self, snapshot: DocumentSnapshot) -> bool {
        let Some(current) = self.snapshot() else {
            debug!(version = snapshot.version(), "change ignored: no document attached");
            return false;
        };
        if snapshot.version() <= current.version() {
            debug!(
                current = current.version(),
                received = snapshot.version(),
                "stale snapshot ignored"
            );
            return false;
        }
        self.state = Self::build(&self.partitioner, snapshot);
        true
    }

    /// The deepest region containing `offset`, or `None` when the offset is
    /// outside the document or falls between regions.
    pub fn region_at(&self, offset: usize) -> Option<&Region> {
        self.locate(offset).map(|(_, region)| region)
    }

    fn locate(&self, offset: usize) -> Option<(Vec<usize>, &Region)> {
        let IndexState::Indexed { snapshot, regions } = &self.state else {
            return None;
        };
        if offset >= snapshot.len() {
            return None;
        }
        locate(regions, offset)
    }

    /// Selection event for a caret at `offset`, if it lands inside a region.
    pub fn on_caret_moved(&self, offset: usize) -> Option<SelectionEvent> {
        let version = self.snapshot()?.version();
        let (path, region) = self.locate(offset)?;
        Some(SelectionEvent {
            version,
            path,
            region: region.clone(),
        })
    }
}
