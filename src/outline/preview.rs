//! Flat, numbered listing of a region hierarchy.

use super::region::Region;

/// One `"{n}: {label}"` line per region, depth-first in document order.
pub fn preview(regions: &[Region], source: &str) -> Vec<String> {
    let mut lines = Vec::new();
    push_lines(regions, source, &mut lines);
    lines
}

fn push_lines(regions: &[Region], source: &str, lines: &mut Vec<String>) {
    for region in regions {
        lines.push(format!("{}: {}", lines.len(), region.label(source)));
        push_lines(&region.children, source, lines);
    }
}
