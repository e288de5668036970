//! Outline regions as LSP document symbols and highlights.

use tower_lsp::lsp_types::{
    DocumentHighlight, DocumentHighlightKind, DocumentSymbol, Position, SymbolKind,
};

use crate::document::LineIndex;
use crate::outline::{region_at, Region, RegionKind};

/// Symbol kind shown by the client for each region kind.
pub fn symbol_kind(kind: RegionKind) -> SymbolKind {
    match kind {
        RegionKind::Heading { .. } => SymbolKind::NAMESPACE,
        RegionKind::Paragraph => SymbolKind::STRING,
        RegionKind::CodeBlock => SymbolKind::OBJECT,
        RegionKind::Token => SymbolKind::CONSTANT,
    }
}

/// Label for a region, never empty (clients reject empty symbol names).
pub fn display_name(region: &Region, source: &str) -> String {
    let label = region.label(source);
    if label.is_empty() {
        region.kind.name().to_string()
    } else {
        label
    }
}

/// Byte span of the region's first line, used as the symbol's selection range.
fn first_line_span(region: &Region, source: &str) -> std::ops::Range<usize> {
    let text = region.text(source);
    let line = text.split('\n').next().unwrap_or("");
    let line = line.strip_suffix('\r').unwrap_or(line);
    region.offset..region.offset + line.len()
}

/// Convert a region hierarchy into nested document symbols.
pub fn document_symbols(regions: &[Region], line_index: &LineIndex) -> Vec<DocumentSymbol> {
    regions
        .iter()
        .map(|region| to_symbol(region, line_index))
        .collect()
}

#[allow(deprecated)]
fn to_symbol(region: &Region, line_index: &LineIndex) -> DocumentSymbol {
    let source = line_index.text();
    let detail = match region.kind {
        RegionKind::Heading { level } => Some(format!("h{level}")),
        _ => None,
    };

    DocumentSymbol {
        name: display_name(region, source),
        detail,
        kind: symbol_kind(region.kind),
        tags: None,
        deprecated: None,
        range: line_index.span_to_range(region.span()),
        selection_range: line_index.span_to_range(first_line_span(region, source)),
        children: Some(document_symbols(&region.children, line_index)),
    }
}

/// Highlight the region under `position`, if any.
pub fn document_highlight(
    regions: &[Region],
    line_index: &LineIndex,
    position: Position,
) -> Option<Vec<DocumentHighlight>> {
    let offset = line_index.position_to_offset(position)?;
    if offset >= line_index.text().len() {
        return None;
    }
    let region = region_at(regions, offset)?;
    Some(vec![DocumentHighlight {
        range: line_index.span_to_range(region.span()),
        kind: Some(DocumentHighlightKind::TEXT),
    }])
}
