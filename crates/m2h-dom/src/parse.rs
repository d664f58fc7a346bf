//! HTML fragment loading.
//!
//! Parsing is delegated to `scraper` (html5ever); this module only copies the
//! resulting nodes into a [`Tree`].

use scraper::{Html, Node};

use crate::node::NodeId;
use crate::tree::Tree;

/// Parse an HTML fragment and append its nodes as children of `parent`.
///
/// Elements and text are kept, attributes in source order. Comments, doctypes and processing
/// instructions are dropped. Malformed markup is recovered the way a browser
/// would, so this never fails.
pub fn parse_fragment(tree: &mut Tree, parent: NodeId, html: &str) {
    let document = Html::parse_fragment(html);

    let mut stack = Vec::new();
    for child in document.root_element().children().rev() {
        stack.push((child, parent));
    }

    while let Some((node, parent)) = stack.pop() {
        match node.value() {
            Node::Text(text) => {
                let id = tree.create_text(&**text);
                tree.append_child(parent, id);
            }
            Node::Element(element) => {
                let attrs: Vec<(&str, &str)> = element.attrs().collect();
                let id = tree.create_element_with(element.name(), &attrs);
                tree.append_child(parent, id);
                for child in node.children().rev() {
                    stack.push((child, id));
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Attribute;
    use crate::serialize::to_html;
    use pretty_assertions::assert_eq;

    fn parse(html: &str) -> Tree {
        let mut tree = Tree::new("div");
        let root = tree.root();
        parse_fragment(&mut tree, root, html);
        tree
    }

    #[test]
    fn test_parse_nested_elements() {
        let tree = parse("<ul><li>one</li><li>two <b>bold</b></li></ul>");
        let root = tree.root();

        assert_eq!(
            to_html(&tree, root),
            "<div><ul><li>one</li><li>two <b>bold</b></li></ul></div>"
        );
        let ul = tree.first_child(root).unwrap();
        assert_eq!(tree.children(ul).len(), 2);
        assert_eq!(tree.parent(ul), Some(root));
    }

    #[test]
    fn test_parse_keeps_attributes() {
        let tree = parse(r#"<a href="doc.pdf" title="Doc">x</a>"#);
        let a = tree.first_child(tree.root()).unwrap();

        assert_eq!(tree.attr(a, "href"), Some("doc.pdf"));
        assert_eq!(tree.attr(a, "title"), Some("Doc"));
    }

    #[test]
    fn test_parse_keeps_attribute_order() {
        let tree = parse(r#"<img src="a.png" alt="b" title="t">"#);
        let img = tree.first_child(tree.root()).unwrap();

        assert_eq!(
            tree.element(img).unwrap().attrs,
            vec![
                Attribute::new("src", "a.png"),
                Attribute::new("alt", "b"),
                Attribute::new("title", "t"),
            ]
        );
        assert_eq!(
            to_html(&tree, tree.root()),
            r#"<div><img src="a.png" alt="b" title="t"></div>"#
        );
    }

    #[test]
    fn test_parse_drops_comments() {
        let tree = parse("<p>a<!-- hidden -->b</p>");

        assert_eq!(to_html(&tree, tree.root()), "<div><p>ab</p></div>");
    }

    #[test]
    fn test_parse_decodes_entities() {
        let tree = parse("<p>Tom &amp; Jerry</p>");
        let p = tree.first_child(tree.root()).unwrap();

        assert_eq!(tree.text_content(p), "Tom & Jerry");
    }

    #[test]
    fn test_parse_empty_fragment() {
        let tree = parse("");

        assert!(tree.children(tree.root()).is_empty());
    }
}
