//! Document state management and text utilities.
//!
//! This module provides:
//! - `DocumentSnapshot` for immutable, versioned document text
//! - `LineIndex` for byte offset <-> LSP position conversion
//! - `DocumentState` and `DocumentStore` for per-document outline lifecycle

mod snapshot;
mod state;
mod text;

pub use snapshot::DocumentSnapshot;
pub use state::{DocumentState, DocumentStore};
pub use text::LineIndex;
