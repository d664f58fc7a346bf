//! Document assembly.
//!
//! Wraps the rewritten content in a full HTML page:
//!
//! ```text
//! html
//! ├── head      meta, favicon, title, stylesheets
//! └── body
//!     └── div.container
//!         ├── div.timestamp
//!         ├── div.toc
//!         └── div.main   (rewritten content)
//! ```

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use m2h_dom::{NodeId, Tree};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::rules::TransformedTree;
use crate::toc::{TocEntry, toc_fragment};

const VIEWPORT: &str =
    "width=device-width, initial-scale=1.0, maximum-scale=1.0, minimum-scale=1.0";

const FAVICON_SVG: &str = concat!(
    r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 100">"#,
    r#"<text x="50%" y="50%" style="dominant-baseline:central;text-anchor:middle;font-size:90px;">"#,
    "&#x1f4dd;</text></svg>",
);

/// Characters left as-is when embedding the favicon in a data URL.
const DATA_URL: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'$')
    .remove(b'&')
    .remove(b'+')
    .remove(b':')
    .remove(b'=')
    .remove(b'@');

/// A stylesheet to reference from the document head.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Stylesheet {
    /// Remote stylesheet, emitted as `<link rel="stylesheet">`.
    Url(String),
    /// Local file, inlined into a `<style>` element.
    File(PathBuf),
}

impl Stylesheet {
    /// Classify a stylesheet reference. Relative paths are joined onto `base`.
    #[must_use]
    pub fn resolve(reference: &str, base: &Path) -> Self {
        if reference.starts_with("http://") || reference.starts_with("https://") {
            Self::Url(reference.to_owned())
        } else {
            Self::File(base.join(reference))
        }
    }

    /// Local file path, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Url(_) => None,
            Self::File(path) => Some(path),
        }
    }
}

/// Everything needed to assemble a page.
#[derive(Debug)]
pub struct Document {
    pub title: String,
    pub lang: String,
    pub stylesheets: Vec<Stylesheet>,
    /// Formatted modification date of the source, possibly empty.
    pub timestamp: String,
    pub toc: Vec<TocEntry>,
    pub body: TransformedTree,
}

impl Document {
    /// Build the final page tree. The returned tree is rooted at `<html>`.
    ///
    /// Local stylesheets that cannot be read are skipped with a warning.
    #[must_use]
    pub fn assemble(self) -> Tree {
        let mut tree = self.body.into_tree();
        let main = tree.root();
        tree.add_class(main, "main");

        let html = tree.create_element_with("html", &[("lang", self.lang.as_str())]);
        let head = build_head(&mut tree, &self.title, &self.stylesheets);
        let body = tree.create_element("body");
        let container = tree.create_element_with("div", &[("class", "container")]);

        let timestamp = tree.create_element_with("div", &[("class", "timestamp")]);
        let label = tree.create_text(format!("update: {}", self.timestamp));
        tree.append_child(timestamp, label);
        let toc = toc_fragment(&mut tree, &self.toc);

        tree.append_child(container, timestamp);
        tree.append_child(container, toc);
        tree.append_child(container, main);
        tree.append_child(body, container);
        tree.append_child(html, head);
        tree.append_child(html, body);
        tree.set_root(html);
        tree
    }
}

fn build_head(tree: &mut Tree, title: &str, stylesheets: &[Stylesheet]) -> NodeId {
    let head = tree.create_element("head");

    let charset = tree.create_element_with("meta", &[("charset", "utf-8")]);
    let viewport = tree.create_element_with("meta", &[("name", "viewport"), ("content", VIEWPORT)]);
    let icon_href = format!(
        "data:image/svg+xml,{}",
        utf8_percent_encode(FAVICON_SVG, DATA_URL)
    );
    let icon = tree.create_element_with("link", &[("rel", "icon"), ("href", icon_href.as_str())]);
    let title_el = tree.create_element("title");
    let title_text = tree.create_text(title);
    tree.append_child(title_el, title_text);

    for node in [charset, viewport, icon, title_el] {
        tree.append_child(head, node);
    }

    for sheet in stylesheets {
        if let Some(node) = stylesheet_node(tree, sheet) {
            tree.append_child(head, node);
        }
    }

    head
}

fn stylesheet_node(tree: &mut Tree, sheet: &Stylesheet) -> Option<NodeId> {
    match sheet {
        Stylesheet::Url(url) => Some(tree.create_element_with(
            "link",
            &[("rel", "stylesheet"), ("href", url.as_str())],
        )),
        Stylesheet::File(path) => match std::fs::read_to_string(path) {
            Ok(css) => {
                let style = tree.create_element("style");
                let text = tree.create_text(css.trim());
                tree.append_child(style, text);
                Some(style)
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Skipping unreadable stylesheet");
                None
            }
        },
    }
}

/// Local modification date of `path` as `YYYY-MM-DD`, or empty if unavailable.
pub fn last_modified_date(path: &Path) -> String {
    match std::fs::metadata(path).and_then(|meta| meta.modified()) {
        Ok(modified) => DateTime::<Local>::from(modified)
            .format("%Y-%m-%d")
            .to_string(),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Failed to read modification time");
            String::new()
        }
    }
}
