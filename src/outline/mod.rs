//! Structured-text outline index.
//!
//! This module provides:
//! - `Partitioner` for splitting text into a hierarchy of typed `Region`s
//! - `OutlineIndex` for answering containment queries against the latest snapshot
//! - `OutlineView` and `TreeHost` for driving a tree display from caret and edit events
//! - `preview` for a flat numbered listing of the hierarchy

mod index;
mod partition;
mod preview;
mod region;
mod view;

pub use index::{OutlineError, OutlineIndex, SelectionEvent};
pub use partition::{
    PartitionMode, Partitioner, DEFAULT_DELIMITERS, DEFAULT_FENCE_PATTERN,
    DEFAULT_HEADING_PATTERN,
};
pub(crate) use partition::{DEFAULT_FENCE, DEFAULT_HEADING};
pub use preview::preview;
pub use region::{locate, region_at, Region, RegionKind};
pub use view::{OutlineView, TreeHost};
