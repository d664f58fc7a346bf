//! HTML serialization.

use std::fmt::Write;

use crate::node::{NodeData, NodeId};
use crate::tree::Tree;

/// Elements that never have an end tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Elements whose text content is written without escaping.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// Escape text content.
#[must_use]
pub fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape a double-quoted attribute value.
#[must_use]
pub fn escape_attr(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(c),
        }
    }
    out
}

enum Step {
    Open(NodeId),
    Close(NodeId),
}

/// Serialize `id` and its subtree as HTML.
#[must_use]
pub fn to_html(tree: &Tree, id: NodeId) -> String {
    let mut out = String::with_capacity(4096);
    let mut stack = vec![Step::Open(id)];

    while let Some(step) = stack.pop() {
        match step {
            Step::Open(node) => match tree.data(node) {
                NodeData::Text(text) => {
                    let raw = tree
                        .parent(node)
                        .and_then(|p| tree.element(p))
                        .is_some_and(|el| RAW_TEXT_ELEMENTS.contains(&el.name.as_str()));
                    if raw {
                        out.push_str(text);
                    } else {
                        out.push_str(&escape_text(text));
                    }
                }
                NodeData::Element(el) => {
                    out.push('<');
                    out.push_str(&el.name);
                    for attr in &el.attrs {
                        let _ = write!(out, r#" {}="{}""#, attr.name, escape_attr(&attr.value));
                    }
                    out.push('>');
                    if VOID_ELEMENTS.contains(&el.name.as_str()) {
                        continue;
                    }
                    stack.push(Step::Close(node));
                    for child in tree.children(node).iter().rev() {
                        stack.push(Step::Open(*child));
                    }
                }
            },
            Step::Close(node) => {
                if let Some(el) = tree.element(node) {
                    let _ = write!(out, "</{}>", el.name);
                }
            }
        }
    }

    out
}

/// Serialize `id` as a complete document with a leading doctype.
#[must_use]
pub fn to_document(tree: &Tree, id: NodeId) -> String {
    format!("<!DOCTYPE html>{}", to_html(tree, id))
}
