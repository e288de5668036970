//! Outline regions and containment lookup over a region hierarchy.

use std::ops::Range;

/// Labels longer than this are truncated with a trailing `...`.
const MAX_LABEL_CHARS: usize = 80;

/// The semantic kind of a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegionKind {
    /// An ATX-style heading. Owns the blocks that follow it up to the next
    /// heading of the same or a shallower level.
    Heading { level: u8 },
    /// A run of non-blank lines, or the whole text when no structure is recognized.
    Paragraph,
    /// A fenced code block, fences included.
    CodeBlock,
    /// A delimiter-bounded token.
    Token,
}

impl RegionKind {
    /// Short lowercase name used in previews and protocol payloads.
    pub fn name(&self) -> &'static str {
        match self {
            RegionKind::Heading { .. } => "heading",
            RegionKind::Paragraph => "paragraph",
            RegionKind::CodeBlock => "code-block",
            RegionKind::Token => "token",
        }
    }
}

/// A contiguous span of document text tagged with a kind.
///
/// Offsets are UTF-8 byte offsets into the snapshot the region was computed
/// from. Siblings are sorted by offset and never overlap, and every child lies
/// within its parent's span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub kind: RegionKind,
    pub offset: usize,
    pub length: usize,
    /// Byte length of the heading marker that opens the region's first line,
    /// stripped from the label. Zero when no marker was recorded.
    pub marker: usize,
    pub children: Vec<Region>,
}

impl Region {
    /// Create a leaf region.
    pub fn new(kind: RegionKind, offset: usize, length: usize) -> Self {
        Self {
            kind,
            offset,
            length,
            marker: 0,
            children: Vec::new(),
        }
    }

    /// Record the length of the heading marker on the first line.
    pub fn with_marker(mut self, marker: usize) -> Self {
        self.marker = marker;
        self
    }

    /// Attach nested regions to this one.
    pub fn with_children(mut self, children: Vec<Region>) -> Self {
        self.children = children;
        self
    }

    /// Exclusive end offset.
    pub fn end(&self) -> usize {
        self.offset.saturating_add(self.length)
    }

    pub fn span(&self) -> Range<usize> {
        self.offset..self.end()
    }

    /// Whether `offset` falls inside `[offset, offset + length)`.
    pub fn contains(&self, offset: usize) -> bool {
        offset >= self.offset && offset - self.offset < self.length
    }

    /// The slice of `source` this region covers, or `""` if the span does not
    /// fit the source.
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        source.get(self.span()).unwrap_or("")
    }

    /// Display label: the first line of the region's text with heading
    /// markers stripped, truncated to a readable width.
    ///
    /// Tokens are listed verbatim. A heading without a recorded marker has a
    /// leading `#` run stripped instead.
    pub fn label(&self, source: &str) -> String {
        let first_line = self.text(source).lines().next().unwrap_or("");
        let label = match self.kind {
            RegionKind::Token => first_line,
            RegionKind::Heading { .. } if self.marker > 0 => {
                first_line.get(self.marker..).unwrap_or("").trim()
            }
            RegionKind::Heading { .. } => first_line.trim().trim_start_matches('#').trim(),
            _ => first_line.trim(),
        };
        truncate_label(label)
    }
}

fn truncate_label(label: &str) -> String {
    if label.chars().count() <= MAX_LABEL_CHARS {
        return label.to_string();
    }
    let kept: String = label.chars().take(MAX_LABEL_CHARS - 3).collect();
    format!("{kept}...")
}

/// Find the deepest region containing `offset`, along with the index path
/// from the top level down to it.
///
/// At each level the first sibling in document order whose span contains the
/// offset is taken, so a malformed hierarchy with overlapping siblings still
/// resolves deterministically.
pub fn locate(regions: &[Region], offset: usize) -> Option<(Vec<usize>, &Region)> {
    let mut level = regions;
    let mut path = Vec::new();
    let mut found = None;

    while let Some((index, region)) = level
        .iter()
        .enumerate()
        .find(|(_, region)| region.contains(offset))
    {
        path.push(index);
        found = Some(region);
        level = &region.children;
    }

    found.map(|region| (path, region))
}

/// Find the deepest region containing `offset`.
pub fn region_at(regions: &[Region], offset: usize) -> Option<&Region> {
    locate(regions, offset).map(|(_, region)| region)
}
