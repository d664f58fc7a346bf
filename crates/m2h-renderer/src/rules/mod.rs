//! Rewrite passes over the element tree.
//!
//! Each pass is a small, independent tree rewrite. [`RuleEngine`] runs its
//! passes in a fixed order over a freshly parsed tree and hands back a
//! [`TransformedTree`], the only input the TOC builder and document assembler
//! accept.
//!
//! Every pass is idempotent: running the standard engine twice over the same
//! tree yields the same markup as running it once.

mod blocks;
mod image;
mod links;
mod lists;
mod table;

use m2h_dom::{NodeId, Tree};

pub use blocks::{CodeBlockLabel, HeadingSpacing, PageBreak};
pub use image::ImageWrap;
pub use links::{LinkTarget, PdfLink};
pub use lists::{ArrowList, BlankList};
pub use table::CheckboxCell;

/// A single tree rewrite.
pub trait Pass: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Rewrite the subtree under `root` in place.
    fn apply(&self, tree: &mut Tree, root: NodeId);
}

/// What [`walk`] does after visiting a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Walk {
    /// Visit the node's current children next.
    Descend,
    /// Do not visit the node's children.
    Skip,
}

/// Pre-order traversal that tolerates structural edits.
///
/// Children are read after `visit` returns, so a visitor may replace or
/// rebuild the visited node's children. A visitor that detaches the visited
/// node should return [`Walk::Skip`]. Siblings already queued are visited even
/// if they moved.
pub fn walk<F>(tree: &mut Tree, root: NodeId, mut visit: F)
where
    F: FnMut(&mut Tree, NodeId) -> Walk,
{
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if visit(tree, node) == Walk::Descend {
            stack.extend(tree.children(node).iter().rev());
        }
    }
}

/// Element tree after every rewrite pass has run.
#[derive(Clone, Debug)]
pub struct TransformedTree {
    tree: Tree,
}

impl TransformedTree {
    /// The rewritten tree.
    #[must_use]
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Root of the rewritten content.
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.tree.root()
    }

    /// Take ownership of the tree for assembly.
    #[must_use]
    pub fn into_tree(self) -> Tree {
        self.tree
    }
}

/// Ordered list of rewrite passes.
pub struct RuleEngine {
    passes: Vec<Box<dyn Pass>>,
}

impl RuleEngine {
    /// Engine with a custom pass list.
    #[must_use]
    pub fn new(passes: Vec<Box<dyn Pass>>) -> Self {
        Self { passes }
    }

    /// Engine with the standard passes in their standard order.
    #[must_use]
    pub fn standard() -> Self {
        Self::new(vec![
            Box::new(ArrowList),
            Box::new(BlankList),
            Box::new(CheckboxCell),
            Box::new(PageBreak),
            Box::new(PdfLink),
            Box::new(CodeBlockLabel),
            Box::new(HeadingSpacing),
            Box::new(LinkTarget),
            Box::new(ImageWrap),
        ])
    }

    /// Names of the configured passes, in execution order.
    pub fn pass_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.passes.iter().map(|pass| pass.name())
    }

    /// Run every pass over `tree`.
    #[must_use]
    pub fn apply(&self, mut tree: Tree) -> TransformedTree {
        let root = tree.root();
        for pass in &self.passes {
            tracing::trace!(pass = pass.name(), "Applying rewrite pass");
            pass.apply(&mut tree, root);
        }
        TransformedTree { tree }
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::standard()
    }
}

impl std::fmt::Debug for RuleEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.pass_names()).finish()
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::tree_from;
    use super::*;
    use m2h_dom::to_html;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_standard_pass_order() {
        let names: Vec<_> = RuleEngine::standard().pass_names().collect();

        assert_eq!(
            names,
            vec![
                "arrow-list",
                "blank-list",
                "checkbox-cell",
                "page-break",
                "pdf-link",
                "code-block-label",
                "heading-spacing",
                "link-target",
                "image-wrap",
            ]
        );
    }

    #[test]
    fn test_walk_skip_prunes_subtree() {
        let mut tree = tree_from("<ul><li>a</li></ul><p><em>b</em></p>");
        let root = tree.root();
        let mut seen = Vec::new();

        walk(&mut tree, root, |tree, node| {
            if let Some(el) = tree.element(node) {
                seen.push(el.name.clone());
                if el.name == "ul" {
                    return Walk::Skip;
                }
            }
            Walk::Descend
        });

        assert_eq!(seen, vec!["div", "ul", "p", "em"]);
    }

    #[test]
    fn test_walk_visits_rebuilt_children() {
        let mut tree = tree_from("<p>old</p>");
        let root = tree.root();
        let mut texts = Vec::new();

        walk(&mut tree, root, |tree, node| {
            if tree.is_element(node, "p") {
                tree.clear_children(node);
                let text = tree.create_text("new");
                tree.append_child(node, text);
            } else if let Some(text) = tree.text(node) {
                texts.push(text.to_owned());
            }
            Walk::Descend
        });

        assert_eq!(texts, vec!["new"]);
    }

    #[test]
    fn test_engine_is_idempotent() {
        let html = concat!(
            "<h2 id=\"ab\">ab</h2>",
            "<ul><li>=&gt; sub</li><li>=&gt;=&gt;x</li><li></li></ul>",
            "<table><tbody><tr><td>[x]</td><td>[ ]</td></tr></tbody></table>",
            "<p>===</p>",
            "<p>==<br>==</p>",
            "<p><a href=\"doc.pdf\">doc</a> <a href=\"#top\">top</a></p>",
            "<pre><code class=\"language-rust\">fn main() {}</code></pre>",
            "<p><img src=\"a.png\" alt=\"left\"></p>",
        );
        let engine = RuleEngine::standard();

        let once = engine.apply(tree_from(html));
        let once_html = to_html(once.tree(), once.root());
        let twice = engine.apply(once.into_tree());

        assert_eq!(to_html(twice.tree(), twice.root()), once_html);
    }

    #[test]
    fn test_empty_engine_leaves_tree_untouched() {
        let engine = RuleEngine::new(Vec::new());
        let result = engine.apply(tree_from("<p>===</p>"));

        assert_eq!(to_html(result.tree(), result.root()), "<div><p>===</p></div>");
    }
}
