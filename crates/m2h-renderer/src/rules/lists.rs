use m2h_dom::{NodeId, Tree};

use super::{Pass, Walk, walk};

const ARROW_MARKER: &str = "=>";

/// Marks list items that start with `=>` as sub items.
///
/// The marker is removed from the leading text and the item gets class `sub`.
/// Items already marked `sub` are left alone.
#[derive(Clone, Copy, Debug, Default)]
pub struct ArrowList;

impl Pass for ArrowList {
    fn name(&self) -> &'static str {
        "arrow-list"
    }

    fn apply(&self, tree: &mut Tree, root: NodeId) {
        walk(tree, root, |tree, node| {
            if !tree.is_element(node, "li") || tree.has_class(node, "sub") {
                return Walk::Descend;
            }
            let Some(first) = tree.first_child(node) else {
                return Walk::Descend;
            };
            let Some(text) = tree.text_mut(first) else {
                return Walk::Descend;
            };
            if let Some(rest) = text.strip_prefix(ARROW_MARKER) {
                *text = rest.to_owned();
                tree.add_class(node, "sub");
            }
            Walk::Descend
        });
    }
}

/// Marks list items without visible text with class `empty`.
#[derive(Clone, Copy, Debug, Default)]
pub struct BlankList;

impl Pass for BlankList {
    fn name(&self) -> &'static str {
        "blank-list"
    }

    fn apply(&self, tree: &mut Tree, root: NodeId) {
        walk(tree, root, |tree, node| {
            if tree.is_element(node, "li") && tree.text_content(node).trim().is_empty() {
                tree.add_class(node, "empty");
            }
            Walk::Descend
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_support::run;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_arrow_item_marked() {
        assert_eq!(
            run(&ArrowList, "<ul><li>=&gt; child</li><li>plain</li></ul>"),
            r#"<ul><li class="sub"> child</li><li>plain</li></ul>"#
        );
    }

    #[test]
    fn test_arrow_only_checked_on_leading_text() {
        assert_eq!(
            run(&ArrowList, "<ul><li><b>=&gt;</b> x</li><li>a =&gt; b</li></ul>"),
            "<ul><li><b>=&gt;</b> x</li><li>a =&gt; b</li></ul>"
        );
    }

    #[test]
    fn test_arrow_in_nested_list() {
        assert_eq!(
            run(&ArrowList, "<ol><li>top<ul><li>=&gt;deep</li></ul></li></ol>"),
            r#"<ol><li>top<ul><li class="sub">deep</li></ul></li></ol>"#
        );
    }

    #[test]
    fn test_arrow_keeps_existing_class() {
        assert_eq!(
            run(&ArrowList, r#"<ul><li class="x">=&gt;a</li></ul>"#),
            r#"<ul><li class="x sub">a</li></ul>"#
        );
    }

    #[test]
    fn test_arrow_stripped_once() {
        let html = run(&ArrowList, "<ul><li>=&gt;=&gt;x</li></ul>");
        assert_eq!(html, r#"<ul><li class="sub">=&gt;x</li></ul>"#);

        assert_eq!(
            run(&ArrowList, &html),
            r#"<ul><li class="sub">=&gt;x</li></ul>"#
        );
    }

    #[test]
    fn test_blank_items_marked() {
        assert_eq!(
            run(&BlankList, "<ul><li></li><li>  </li><li>text</li></ul>"),
            r#"<ul><li class="empty"></li><li class="empty">  </li><li>text</li></ul>"#
        );
    }

    #[test]
    fn test_blank_item_with_only_markup() {
        assert_eq!(
            run(&BlankList, "<ul><li><span> </span></li></ul>"),
            r#"<ul><li class="empty"><span> </span></li></ul>"#
        );
    }
}
