//! Offset <-> LSP position conversion for a snapshot.
//!
//! LSP columns are counted in UTF-16 code units while regions use UTF-8 byte
//! offsets, so both directions walk the chars of a single line.

use std::ops::Range;
use std::sync::Arc;

use tower_lsp::lsp_types::{Position, Range as LspRange};

use super::snapshot::DocumentSnapshot;

/// Line start table for one snapshot's text.
#[derive(Debug, Clone)]
pub struct LineIndex {
    /// Byte offset where each line starts.
    line_starts: Vec<usize>,
    text: Arc<str>,
}

impl LineIndex {
    pub fn new(snapshot: &DocumentSnapshot) -> Self {
        let text = snapshot.shared_text();
        let line_starts = std::iter::once(0)
            .chain(text.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self { line_starts, text }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Byte range of `line`, excluding its `\n`.
    fn line_span(&self, line: usize) -> Range<usize> {
        let start = self.line_starts[line];
        let end = self
            .line_starts
            .get(line + 1)
            .map_or(self.text.len(), |next| next - 1);
        start..end
    }

    /// Position of a byte offset. Offsets past the end clamp to the end.
    pub fn offset_to_position(&self, offset: usize) -> Position {
        let offset = offset.min(self.text.len());
        let line = self
            .line_starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1);
        let span = self.line_span(line);

        let character = self.text[span.start..span.end]
            .char_indices()
            .take_while(|(i, _)| span.start + i < offset)
            .map(|(_, c)| c.len_utf16() as u32)
            .sum();

        Position::new(line as u32, character)
    }

    /// Byte offset of a position, or `None` when the line does not exist.
    /// Columns past the end of a line resolve to the line end.
    pub fn position_to_offset(&self, position: Position) -> Option<usize> {
        let line = position.line as usize;
        if line >= self.line_starts.len() {
            return None;
        }
        let span = self.line_span(line);

        let mut column = 0u32;
        for (i, c) in self.text[span.start..span.end].char_indices() {
            if column >= position.character {
                return Some(span.start + i);
            }
            column += c.len_utf16() as u32;
        }
        Some(span.end)
    }

    pub fn span_to_range(&self, span: Range<usize>) -> LspRange {
        LspRange::new(
            self.offset_to_position(span.start),
            self.offset_to_position(span.end),
        )
    }
}
