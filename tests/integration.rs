use std::path::PathBuf;
use std::sync::Arc;

use expect_test::expect;
use outline_lsp::{
    build_partitioner, document_symbols, load_settings, preview, DocumentSnapshot, LineIndex,
    OutlineIndex, OutlineView, Partitioner, Region, RegionKind, SelectionEvent, TreeHost,
};
use tower_lsp::lsp_types::DocumentSymbol;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Render a region hierarchy as one indented line per region:
///   <kind> <start>..<end> "<label>"
fn render(regions: &[Region], text: &str) -> String {
    let mut out = String::new();
    render_into(regions, text, 0, &mut out);
    out
}

fn render_into(regions: &[Region], text: &str, depth: usize, out: &mut String) {
    for region in regions {
        let kind = match region.kind {
            RegionKind::Heading { level } => format!("heading{level}"),
            other => other.name().to_string(),
        };
        out.push_str(&format!(
            "{}{} {}..{} {:?}\n",
            "  ".repeat(depth),
            kind,
            region.offset,
            region.end(),
            region.label(text)
        ));
        render_into(&region.children, text, depth + 1, out);
    }
}

/// Render document symbols as `<name> <start line>:<col>-<end line>:<col>`.
fn render_symbols(symbols: &[DocumentSymbol], depth: usize, out: &mut String) {
    for symbol in symbols {
        out.push_str(&format!(
            "{}{} {}:{}-{}:{}\n",
            "  ".repeat(depth),
            symbol.name,
            symbol.range.start.line,
            symbol.range.start.character,
            symbol.range.end.line,
            symbol.range.end.character,
        ));
        if let Some(children) = &symbol.children {
            render_symbols(children, depth + 1, out);
        }
    }
}

/// Build a partitioner from a fixture directory's outline.toml.
fn fixture_partitioner(fixture_dir: &str) -> Partitioner {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(fixture_dir)
        .join("outline.toml");
    build_partitioner(&load_settings(&path))
}

fn assert_partition_invariants(regions: &[Region], bounds: std::ops::Range<usize>) {
    for pair in regions.windows(2) {
        assert!(
            pair[0].offset + pair[0].length <= pair[1].offset,
            "siblings overlap or are out of order: {:?} / {:?}",
            pair[0].span(),
            pair[1].span()
        );
    }
    let total: usize = regions.iter().map(|r| r.length).sum();
    assert!(total <= bounds.len());
    for region in regions {
        assert!(region.offset >= bounds.start && region.end() <= bounds.end);
        assert_partition_invariants(&region.children, region.span());
    }
}

const GUIDE: &str = "# Guide\n\nIntro paragraph\nspans two lines.\n\n## Install\n\n```sh\ncargo install outline-lsp\n```\n\n### From source\nClone it.\n\n## Usage\nRun it.\n\n# Appendix\n";

#[derive(Debug, Default)]
struct RecordingHost {
    hierarchy: Vec<Region>,
    selections: Vec<SelectionEvent>,
}

impl TreeHost for RecordingHost {
    fn set_hierarchy(&mut self, regions: &[Region]) {
        self.hierarchy = regions.to_vec();
    }

    fn select(&mut self, event: &SelectionEvent) {
        self.selections.push(event.clone());
    }
}

// ---------------------------------------------------------------------------
// Partitioning
// ---------------------------------------------------------------------------

#[test]
fn markdown_outline_of_guide() {
    let regions = Partitioner::markdown().partition_text(GUIDE);
    assert_partition_invariants(&regions, 0..GUIDE.len());

    expect![[r#"
        heading1 0..135 "Guide"
          paragraph 9..41 "Intro paragraph"
          heading2 43..117 "Install"
            code-block 55..90 "```sh"
            heading3 92..117 "From source"
              paragraph 108..117 "Clone it."
          heading2 119..135 "Usage"
            paragraph 128..135 "Run it."
        heading1 137..147 "Appendix"
    "#]]
    .assert_eq(&render(&regions, GUIDE));
}

#[test]
fn token_outline_from_fixture_settings() {
    let text = "alpha\tbeta\n\ngamma delta\r\n\u{c}epsilon";
    let regions = fixture_partitioner("tokens").partition_text(text);
    assert_partition_invariants(&regions, 0..text.len());

    expect![[r#"
        token 0..5 "alpha"
        token 6..10 "beta"
        token 12..23 "gamma delta"
        token 26..33 "epsilon"
    "#]]
    .assert_eq(&render(&regions, text));
}

#[test]
fn custom_markers_from_fixture_settings() {
    let text = "= Top\nsome text\n== Sub\n----\n= inside\n----\n= Next\n";
    let regions = fixture_partitioner("asciidoc").partition_text(text);
    assert_partition_invariants(&regions, 0..text.len());

    expect![[r#"
        heading1 0..41 "Top"
          paragraph 6..15 "some text"
          heading2 16..41 "Sub"
            code-block 23..41 "----"
        heading1 42..48 "Next"
    "#]]
    .assert_eq(&render(&regions, text));
}

#[test]
fn broken_settings_fall_back_to_markdown() {
    let regions = fixture_partitioner("broken").partition_text("# Title\nbody\n");
    assert_eq!(regions[0].kind, RegionKind::Heading { level: 1 });
}

#[test]
fn tab_newline_tokens() {
    let text = "a\tb\nc";
    let regions = Partitioner::tokens(['\t', '\n']).partition_text(text);
    let spans: Vec<_> = regions.iter().map(|r| (r.span(), r.text(text))).collect();
    assert_eq!(spans, vec![(0..1, "a"), (2..3, "b"), (4..5, "c")]);
}

#[test]
fn unstructured_text_is_one_paragraph() {
    let text = "Nothing but prose here.\n\nStill nothing.";
    let regions = Partitioner::markdown().partition_text(text);
    assert_eq!(regions, vec![Region::new(RegionKind::Paragraph, 0, text.len())]);
}

#[test]
fn partition_invariants_hold_for_assorted_documents() {
    let documents = [
        "",
        "\n\n\n",
        "#",
        "# a\n# b\n# c",
        "### deep first\n# shallow\n## mid\n#### deeper\n## mid again",
        "```\nunterminated",
        "text\n```\ncode\n```\ntext",
        "~~~\n```\n~~~\n# after",
        "para one\r\n\r\npara two\r\n# H\r\n",
        "ünïcödé # not heading\n# héading\nbödy",
    ];

    for text in documents {
        for partitioner in [Partitioner::markdown(), Partitioner::tokens(['\t', '\n', '\r'])] {
            let regions = partitioner.partition_text(text);
            assert_partition_invariants(&regions, 0..text.len());
            for region in &regions {
                assert!(text.is_char_boundary(region.offset));
                assert!(text.is_char_boundary(region.end()));
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Index lookups
// ---------------------------------------------------------------------------

#[test]
fn empty_document() {
    let index = OutlineIndex::attached(
        Arc::new(Partitioner::markdown()),
        DocumentSnapshot::new("", 1),
    );
    assert!(index.regions().is_empty());
    assert_eq!(index.region_at(0), None);
    assert_eq!(index.on_caret_moved(0), None);
}

#[test]
fn region_at_every_offset_of_guide() {
    let index = OutlineIndex::attached(
        Arc::new(Partitioner::markdown()),
        DocumentSnapshot::new(GUIDE, 1),
    );

    let labels: Vec<String> = [0, 8, 10, 50, 60, 100, 110, 118, 130, 136, 140, 147, 500]
        .into_iter()
        .map(|offset| match index.region_at(offset) {
            Some(region) => format!("{offset}: {} {:?}", region.kind.name(), region.label(GUIDE)),
            None => format!("{offset}: none"),
        })
        .collect();

    expect![[r#"
        0: heading "Guide"
        8: heading "Guide"
        10: paragraph "Intro paragraph"
        50: heading "Install"
        60: code-block "```sh"
        100: heading "From source"
        110: paragraph "Clone it."
        118: heading "Guide"
        130: paragraph "Run it."
        136: none
        140: heading "Appendix"
        147: none
        500: none
    "#]]
    .assert_eq(&(labels.join("\n") + "\n"));
}

#[test]
fn lookups_are_idempotent_between_edits() {
    let index = OutlineIndex::attached(
        Arc::new(Partitioner::markdown()),
        DocumentSnapshot::new(GUIDE, 1),
    );
    for offset in 0..GUIDE.len() {
        assert_eq!(index.region_at(offset), index.region_at(offset));
        assert_eq!(index.on_caret_moved(offset), index.on_caret_moved(offset));
    }
}

#[test]
fn edits_never_return_stale_regions() {
    let partitioner = Arc::new(Partitioner::markdown());
    let first = DocumentSnapshot::new("# One\nalpha beta gamma\n", 1);
    let mut index = OutlineIndex::attached(partitioner, first.clone());
    assert_eq!(index.region_at(10).map(|r| r.kind), Some(RegionKind::Paragraph));

    let second = first.next("# One\n\n\n\n\nshort\n");
    assert!(index.on_document_changed(second.clone()));
    assert_eq!(
        index.region_at(7).map(|r| r.kind),
        Some(RegionKind::Heading { level: 1 })
    );
    assert_eq!(index.region_at(12).map(|r| r.span()), Some(10..15));

    let third = second.next("x");
    assert!(index.on_document_changed(third));
    assert_eq!(index.region_at(10), None);
    assert_eq!(index.region_at(0).map(|r| r.span()), Some(0..1));
}

// ---------------------------------------------------------------------------
// Host wiring
// ---------------------------------------------------------------------------

#[test]
fn view_drives_tree_host_through_a_session() {
    let index = OutlineIndex::new(Arc::new(Partitioner::markdown()));
    let mut view = OutlineView::new(index, RecordingHost::default());

    let snapshot = DocumentSnapshot::new("# A\none\n# B\ntwo\n", 1);
    view.attach(snapshot.clone()).unwrap();
    assert_eq!(view.host().hierarchy.len(), 2);
    assert!(view.attach(snapshot.clone()).is_err());

    assert!(view.caret_moved(5));
    assert!(!view.caret_moved(7));
    assert!(view.caret_moved(5));
    let selections = &view.host().selections;
    assert_eq!(selections.len(), 2);
    assert_eq!(selections[0], selections[1]);
    assert_eq!(selections[0].path, vec![0, 0]);

    view.document_changed(snapshot.next("# Only\n"));
    assert_eq!(view.host().hierarchy.len(), 1);
    assert!(!view.caret_moved(12));

    view.detach();
    assert!(view.host().hierarchy.is_empty());
    assert!(!view.caret_moved(0));
}

#[test]
fn preview_lists_guide() {
    let regions = Partitioner::markdown().partition_text(GUIDE);
    expect![[r#"
        0: Guide
        1: Intro paragraph
        2: Install
        3: ```sh
        4: From source
        5: Clone it.
        6: Usage
        7: Run it.
        8: Appendix
    "#]]
    .assert_eq(&(preview(&regions, GUIDE).join("\n") + "\n"));
}

#[test]
fn document_symbols_for_guide() {
    let snapshot = DocumentSnapshot::new(GUIDE, 1);
    let regions = Partitioner::markdown().partition(&snapshot);
    let symbols = document_symbols(&regions, &LineIndex::new(&snapshot));

    let mut out = String::new();
    render_symbols(&symbols, 0, &mut out);
    expect![[r#"
        Guide 0:0-15:7
          Intro paragraph 2:0-3:16
          Install 5:0-12:9
            ```sh 7:0-9:3
            From source 11:0-12:9
              Clone it. 12:0-12:9
          Usage 14:0-15:7
            Run it. 15:0-15:7
        Appendix 17:0-17:10
    "#]]
    .assert_eq(&out);
}
