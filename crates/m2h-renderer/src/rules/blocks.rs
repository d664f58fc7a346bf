use m2h_dom::{Element, NodeId, Tree};

use super::{Pass, Walk, walk};

/// Turns top-level paragraphs consisting only of `=` into page separators.
///
/// The paragraph's text content decides, so markup between the `=` runs
/// (such as a `<br>` from a wrapped line) does not matter. The paragraph is
/// emptied and gets class `page-separator`. Paragraphs without text are left
/// alone.
#[derive(Clone, Copy, Debug, Default)]
pub struct PageBreak;

impl PageBreak {
    fn is_separator(tree: &Tree, paragraph: NodeId) -> bool {
        let text = tree.text_content(paragraph);
        !text.is_empty() && text.chars().all(|c| c == '=')
    }
}

impl Pass for PageBreak {
    fn name(&self) -> &'static str {
        "page-break"
    }

    fn apply(&self, tree: &mut Tree, root: NodeId) {
        let paragraphs: Vec<NodeId> = tree
            .children(root)
            .iter()
            .copied()
            .filter(|child| tree.is_element(*child, "p"))
            .collect();

        for paragraph in paragraphs {
            if Self::is_separator(tree, paragraph) {
                tree.clear_children(paragraph);
                tree.add_class(paragraph, "page-separator");
            }
        }
    }
}

/// Labels fenced code blocks with their language.
///
/// A `pre` wrapping a `code` whose class starts with `language-X` gets class
/// `codeblock-header` and `data-label="X"`.
#[derive(Clone, Copy, Debug, Default)]
pub struct CodeBlockLabel;

impl Pass for CodeBlockLabel {
    fn name(&self) -> &'static str {
        "code-block-label"
    }

    fn apply(&self, tree: &mut Tree, root: NodeId) {
        for code in tree.find_elements(root, &["code"]) {
            let Some(pre) = tree.parent(code).filter(|p| tree.is_element(*p, "pre")) else {
                continue;
            };
            let Some(label) = tree.element(code).and_then(|el| {
                el.attr("class")?
                    .strip_prefix("language-")?
                    .split_whitespace()
                    .next()
                    .map(str::to_owned)
            }) else {
                continue;
            };

            tree.add_class(pre, "codeblock-header");
            tree.set_attr(pre, "data-label", &label);
        }
    }
}

/// Adds `spacing-N` to headings whose text is 2 to 4 characters long.
#[derive(Clone, Copy, Debug, Default)]
pub struct HeadingSpacing;

impl Pass for HeadingSpacing {
    fn name(&self) -> &'static str {
        "heading-spacing"
    }

    fn apply(&self, tree: &mut Tree, root: NodeId) {
        walk(tree, root, |tree, node| {
            let is_heading = tree.element(node).is_some_and(Element::is_heading);
            if !is_heading || tree.children(node).is_empty() {
                return Walk::Descend;
            }

            let count = tree.text_content(node).trim().chars().count();
            if (2..=4).contains(&count) {
                tree.add_class(node, &format!("spacing-{count}"));
            }
            Walk::Skip
        });
    }
}
