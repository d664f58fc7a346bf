//! Table of contents.

use m2h_dom::{NodeId, Tree, heading_level};

use crate::rules::TransformedTree;

/// Heading tags included in the table of contents.
const TOC_HEADINGS: &[&str] = &["h2", "h3", "h4", "h5", "h6"];

/// A single table of contents entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TocEntry {
    /// Heading level (2-6).
    pub level: u8,
    /// Anchor id of the heading. Empty when the heading has none.
    pub id: String,
    /// Text content of the heading.
    pub title: String,
}

impl TocEntry {
    /// Heading tag name, e.g. `h3`.
    #[must_use]
    pub fn tag(&self) -> String {
        format!("h{}", self.level)
    }
}

/// Collect `h2`-`h6` headings in document order.
#[must_use]
pub fn build_toc(doc: &TransformedTree) -> Vec<TocEntry> {
    let tree = doc.tree();
    tree.find_elements(doc.root(), TOC_HEADINGS)
        .into_iter()
        .filter_map(|heading| {
            let level = heading_level(&tree.element(heading)?.name)?;
            Some(TocEntry {
                level,
                id: tree.attr(heading, "id").unwrap_or_default().to_owned(),
                title: tree.text_content(heading),
            })
        })
        .collect()
}

/// Build the `div.toc` navigation fragment in `tree`.
///
/// The fragment is always returned; it holds no list when `entries` is empty.
pub fn toc_fragment(tree: &mut Tree, entries: &[TocEntry]) -> NodeId {
    let toc = tree.create_element_with("div", &[("class", "toc")]);
    if entries.is_empty() {
        return toc;
    }

    let list = tree.create_element("ul");
    for entry in entries {
        let class = format!("toc-{}", entry.tag());
        let href = format!("#{}", entry.id);
        let item = tree.create_element_with("li", &[("class", class.as_str())]);
        let link = tree.create_element_with("a", &[("href", href.as_str())]);
        let text = tree.create_text(entry.title.as_str());
        tree.append_child(link, text);
        tree.append_child(item, link);
        tree.append_child(list, item);
    }
    tree.append_child(toc, list);
    toc
}
