//! Custom protocol extensions for caret-driven outline selection.
//!
//! - `outline/caretMoved` (client → server notification): the caret moved
//! - `outline/select` (server → client notification): highlight and reveal a region
//! - `outline/preview` (client → server request): numbered region listing

use serde::{Deserialize, Serialize};
use tower_lsp::lsp_types::notification::Notification;
use tower_lsp::lsp_types::{Position, Range, TextDocumentIdentifier, Url};

use crate::document::LineIndex;
use crate::outline::SelectionEvent;

use super::symbols::display_name;

pub const CARET_MOVED_METHOD: &str = "outline/caretMoved";
pub const PREVIEW_METHOD: &str = "outline/preview";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaretMovedParams {
    pub text_document: TextDocumentIdentifier,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewParams {
    pub text_document: TextDocumentIdentifier,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectRegionParams {
    pub uri: Url,
    /// Document version the region belongs to.
    pub version: u64,
    pub kind: String,
    pub label: String,
    pub range: Range,
    /// Child indices from the outline root; the client expands each ancestor.
    pub path: Vec<usize>,
}

/// `outline/select`, sent when the caret lands inside a region.
#[derive(Debug)]
pub enum SelectRegion {}

impl Notification for SelectRegion {
    type Params = SelectRegionParams;
    const METHOD: &'static str = "outline/select";
}

/// Build the `outline/select` payload for a selection event.
pub fn select_params(
    uri: &Url,
    event: &SelectionEvent,
    line_index: &LineIndex,
) -> SelectRegionParams {
    SelectRegionParams {
        uri: uri.clone(),
        version: event.version,
        kind: event.region.kind.name().to_string(),
        label: display_name(&event.region, line_index.text()),
        range: line_index.span_to_range(event.region.span()),
        path: event.path.clone(),
    }
}
