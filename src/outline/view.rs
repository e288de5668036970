//! Keeps a tree-display host in sync with an [`OutlineIndex`].

use super::index::{OutlineError, OutlineIndex, SelectionEvent};
use super::region::Region;
use crate::document::DocumentSnapshot;

/// The receiving side of an outline: something that displays the region tree.
pub trait TreeHost {
    /// Replace the displayed hierarchy.
    fn set_hierarchy(&mut self, regions: &[Region]);

    /// Highlight a region, expanding its ancestors so it is visible.
    fn select(&mut self, event: &SelectionEvent);
}

/// An outline index wired to the host that displays it.
///
/// The methods here are the callbacks a text host drives: attach when a
/// document opens, `document_changed` on every edit, `caret_moved` when the
/// cursor moves and `detach` when the document closes.
#[derive(Debug)]
pub struct OutlineView<H> {
    index: OutlineIndex,
    host: H,
}

impl<H: TreeHost> OutlineView<H> {
    pub fn new(index: OutlineIndex, host: H) -> Self {
        Self { index, host }
    }

    pub fn index(&self) -> &OutlineIndex {
        &self.index
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn attach(&mut self, snapshot: DocumentSnapshot) -> Result<(), OutlineError> {
        self.index.attach(snapshot)?;
        self.host.set_hierarchy(self.index.regions());
        Ok(())
    }

    /// Rebuild from `snapshot` and push the new hierarchy. Returns whether a
    /// rebuild happened.
    pub fn document_changed(&mut self, snapshot: DocumentSnapshot) -> bool {
        let rebuilt = self.index.on_document_changed(snapshot);
        if rebuilt {
            self.host.set_hierarchy(self.index.regions());
        }
        rebuilt
    }

    /// Select the region under the caret. Returns whether the host was told
    /// to select anything; otherwise its selection is left unchanged.
    pub fn caret_moved(&mut self, offset: usize) -> bool {
        match self.index.on_caret_moved(offset) {
            Some(event) => {
                self.host.select(&event);
                true
            }
            None => false,
        }
    }

    pub fn detach(&mut self) -> Option<DocumentSnapshot> {
        let snapshot = self.index.detach()?;
        self.host.set_hierarchy(&[]);
        Some(snapshot)
    }

    pub fn into_parts(self) -> (OutlineIndex, H) {
        (self.index, self.host)
    }
}
