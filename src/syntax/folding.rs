//! Folding ranges for block constructs
//!
//! Any marker-highlighted construct or comment that spans more than one
//! line can be folded. Lines are 1-indexed, matching [`Location`].
//!
//! [`Location`]: super::location::Location

use serde::Serialize;

use super::kinds::ElementKind;
use super::styles::StyleTable;
use super::tree::{Element, Node};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FoldingKind {
    Region,
    Comment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FoldingRange {
    pub start: u32,
    pub end: u32,
    pub kind: FoldingKind,
}

/// Collect folding ranges in pre-order
pub fn folding_ranges(root: &Node, styles: &StyleTable) -> Vec<FoldingRange> {
    let mut ranges = Vec::new();
    collect(root, styles, &mut ranges);
    ranges
}

fn collect(node: &Node, styles: &StyleTable, ranges: &mut Vec<FoldingRange>) {
    match node {
        Node::Seq(items) => {
            for item in items {
                collect(item, styles, ranges);
            }
        }
        Node::Element(element) => {
            if let Some(range) = fold_for(element, styles) {
                ranges.push(range);
            }
            collect(&element.payload, styles, ranges);
        }
        Node::Object(object) => {
            for (_, value) in &object.fields {
                collect(value, styles, ranges);
            }
        }
        Node::Expr(_) | Node::Scalar(_) => {}
    }
}

fn fold_for(element: &Element, styles: &StyleTable) -> Option<FoldingRange> {
    let location = element.location()?;
    if location.line_count() < 2 {
        return None;
    }

    let kind = match element.kind {
        ElementKind::Comment => FoldingKind::Comment,
        _ if styles.markers(&element.kind).is_some() => FoldingKind::Region,
        _ => return None,
    };

    Some(FoldingRange {
        start: location.start_line,
        end: location.end_line,
        kind,
    })
}
