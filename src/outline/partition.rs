//! Partitioning document text into outline regions.
//!
//! Two partition modes are supported:
//! - `Tokens`: every maximal run of non-delimiter characters is one region
//! - `Markdown`: a line scan for headings, fenced code blocks and paragraphs,
//!   with headings owning the blocks that follow them
//!
//! Partitioning never fails. Text the markdown scanner finds no structure in
//! becomes a single paragraph covering the whole text.

use std::sync::LazyLock;

use regex::Regex;

use super::region::{Region, RegionKind};
use crate::document::DocumentSnapshot;

/// Tab, newline, carriage return and form feed.
pub const DEFAULT_DELIMITERS: &str = "\t\n\r\u{c}";

/// ATX heading marker. Capture group 1 holds the `#` run.
pub const DEFAULT_HEADING_PATTERN: &str = r"^ {0,3}(#{1,6})(?:[ \t]+|$)";

/// Opening code fence. Capture group 1 holds the fence run.
pub const DEFAULT_FENCE_PATTERN: &str = r"^ {0,3}(`{3,}|~{3,})";

pub(crate) static DEFAULT_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(DEFAULT_HEADING_PATTERN).unwrap());

pub(crate) static DEFAULT_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(DEFAULT_FENCE_PATTERN).unwrap());

/// How document text is split into regions.
#[derive(Debug, Clone)]
pub enum PartitionMode {
    /// Split on any of the delimiter characters.
    Tokens { delimiters: Vec<char> },
    /// Line-based structural scan driven by heading and fence markers.
    Markdown { heading: Regex, fence: Regex },
}

/// Pure function from document text to a region hierarchy.
#[derive(Debug, Clone)]
pub struct Partitioner {
    mode: PartitionMode,
}

impl Default for Partitioner {
    fn default() -> Self {
        Self::markdown()
    }
}

impl Partitioner {
    pub fn new(mode: PartitionMode) -> Self {
        Self { mode }
    }

    /// Tokenizer splitting on the given delimiter characters.
    pub fn tokens(delimiters: impl IntoIterator<Item = char>) -> Self {
        Self::new(PartitionMode::Tokens {
            delimiters: delimiters.into_iter().collect(),
        })
    }

    /// Markdown scanner with the default heading and fence markers.
    pub fn markdown() -> Self {
        Self::markdown_with(DEFAULT_HEADING.clone(), DEFAULT_FENCE.clone())
    }

    /// Markdown scanner with custom markers.
    ///
    /// If `heading` has a first capture group, its length in characters is the
    /// heading level. The whole match is stripped from the heading's label.
    /// If `fence` has a first capture group, it determines which closing line
    /// ends the block; otherwise the next line matching `fence` closes it.
    pub fn markdown_with(heading: Regex, fence: Regex) -> Self {
        Self::new(PartitionMode::Markdown { heading, fence })
    }

    pub fn mode(&self) -> &PartitionMode {
        &self.mode
    }

    /// Partition a snapshot into top-level regions.
    pub fn partition(&self, snapshot: &DocumentSnapshot) -> Vec<Region> {
        self.partition_text(snapshot.text())
    }

    /// Partition raw text into top-level regions.
    pub fn partition_text(&self, text: &str) -> Vec<Region> {
        match &self.mode {
            PartitionMode::Tokens { delimiters } => tokenize(text, delimiters),
            PartitionMode::Markdown { heading, fence } => {
                MarkdownScanner { heading, fence }.scan(text)
            }
        }
    }
}

fn tokenize(text: &str, delimiters: &[char]) -> Vec<Region> {
    let mut regions = Vec::new();
    let mut token_start = None;

    for (i, c) in text.char_indices() {
        if delimiters.contains(&c) {
            if let Some(start) = token_start.take() {
                regions.push(Region::new(RegionKind::Token, start, i - start));
            }
        } else if token_start.is_none() {
            token_start = Some(i);
        }
    }

    if let Some(start) = token_start {
        regions.push(Region::new(RegionKind::Token, start, text.len() - start));
    }

    regions
}

/// One line of text. `end` excludes the line terminator (`\n` or `\r\n`).
#[derive(Debug, Clone, Copy)]
struct Line<'a> {
    start: usize,
    end: usize,
    text: &'a str,
}

impl Line<'_> {
    fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

fn split_lines(text: &str) -> Vec<Line<'_>> {
    let mut lines = Vec::new();
    let mut start = 0;

    while start < text.len() {
        let newline = text[start..].find('\n').map_or(text.len(), |i| start + i);
        let content = text[start..newline]
            .strip_suffix('\r')
            .unwrap_or(&text[start..newline]);
        lines.push(Line {
            start,
            end: start + content.len(),
            text: content,
        });
        start = newline + 1;
    }

    lines
}

/// A top-level block before headings are nested.
#[derive(Debug, Clone, Copy)]
struct Block {
    kind: RegionKind,
    start: usize,
    end: usize,
    marker: usize,
}

struct MarkdownScanner<'r> {
    heading: &'r Regex,
    fence: &'r Regex,
}

impl MarkdownScanner<'_> {
    fn scan(&self, text: &str) -> Vec<Region> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        let blocks = self.blocks(&split_lines(text));
        let structured = blocks
            .iter()
            .any(|b| !matches!(b.kind, RegionKind::Paragraph));

        if !structured {
            return vec![Region::new(RegionKind::Paragraph, 0, text.len())];
        }

        nest(&blocks)
    }

    /// Heading level and marker length of a heading line.
    fn heading(&self, line: &str) -> Option<(u8, usize)> {
        let caps = self.heading.captures(line)?;
        let level = caps
            .get(1)
            .map_or(1, |m| m.as_str().chars().count().clamp(1, 6));
        let marker = caps.get(0).map_or(0, |m| m.end());
        Some((level as u8, marker))
    }

    fn is_break(&self, line: &Line<'_>) -> bool {
        line.is_blank() || self.fence.is_match(line.text) || self.heading.is_match(line.text)
    }

    fn blocks(&self, lines: &[Line<'_>]) -> Vec<Block> {
        let mut blocks = Vec::new();
        let mut i = 0;

        while i < lines.len() {
            let line = lines[i];

            if let Some(caps) = self.fence.captures(line.text) {
                let opening = caps.get(1).map(|m| m.as_str());
                let mut end = line.end;
                i += 1;
                while i < lines.len() {
                    let candidate = lines[i];
                    end = candidate.end;
                    i += 1;
                    if self.closes_fence(candidate.text, opening) {
                        break;
                    }
                }
                blocks.push(Block {
                    kind: RegionKind::CodeBlock,
                    start: line.start,
                    end,
                    marker: 0,
                });
                continue;
            }

            if let Some((level, marker)) = self.heading(line.text) {
                blocks.push(Block {
                    kind: RegionKind::Heading { level },
                    start: line.start,
                    end: line.end,
                    marker,
                });
                i += 1;
                continue;
            }

            if line.is_blank() {
                i += 1;
                continue;
            }

            let mut end = line.end;
            i += 1;
            while i < lines.len() && !self.is_break(&lines[i]) {
                end = lines[i].end;
                i += 1;
            }
            blocks.push(Block {
                kind: RegionKind::Paragraph,
                start: line.start,
                end,
                marker: 0,
            });
        }

        blocks
    }

    /// A closing fence uses the opening fence character at least as many
    /// times, indented by at most three spaces, with nothing else after it.
    fn closes_fence(&self, line: &str, opening: Option<&str>) -> bool {
        let Some(opening) = opening else {
            return self.fence.is_match(line);
        };
        let Some(marker) = opening.chars().next() else {
            return self.fence.is_match(line);
        };

        let trimmed = line.trim_start_matches(' ');
        if line.len() - trimmed.len() > 3 {
            return false;
        }
        let run = trimmed.chars().take_while(|&c| c == marker).count();
        run >= opening.chars().count() && trimmed[run * marker.len_utf8()..].trim().is_empty()
    }
}

/// Nest blocks under headings: a heading owns every following block up to the
/// next heading of the same or a shallower level.
fn nest(blocks: &[Block]) -> Vec<Region> {
    let mut regions = Vec::new();
    let mut i = 0;

    while i < blocks.len() {
        let block = blocks[i];
        match block.kind {
            RegionKind::Heading { level } => {
                let section_end = blocks[i + 1..]
                    .iter()
                    .position(|b| matches!(b.kind, RegionKind::Heading { level: l } if l <= level))
                    .map_or(blocks.len(), |p| i + 1 + p);
                let children = nest(&blocks[i + 1..section_end]);
                let end = children
                    .last()
                    .map_or(block.end, |last| last.end().max(block.end));
                regions.push(
                    Region::new(block.kind, block.start, end - block.start)
                        .with_marker(block.marker)
                        .with_children(children),
                );
                i = section_end;
            }
            _ => {
                regions.push(Region::new(block.kind, block.start, block.end - block.start));
                i += 1;
            }
        }
    }

    regions
}
