//! LSP protocol feature implementations.
//!
//! This module provides:
//! - Document symbols built from the outline hierarchy
//! - Document highlights for the region under the caret
//! - The `outline/*` protocol extensions for caret-driven selection and previews

mod select;
mod symbols;

pub use select::{
    select_params, CaretMovedParams, PreviewParams, SelectRegion, SelectRegionParams,
    CARET_MOVED_METHOD, PREVIEW_METHOD,
};
pub use symbols::{display_name, document_highlight, document_symbols, symbol_kind};
