use m2h_dom::{NodeId, Tree};

use super::Pass;

/// Tags links to PDF files with `filetype="pdf"`.
#[derive(Clone, Copy, Debug, Default)]
pub struct PdfLink;

impl Pass for PdfLink {
    fn name(&self) -> &'static str {
        "pdf-link"
    }

    fn apply(&self, tree: &mut Tree, root: NodeId) {
        for anchor in tree.find_elements(root, &["a"]) {
            if tree.attr(anchor, "href").is_some_and(|href| href.ends_with(".pdf")) {
                tree.set_attr(anchor, "filetype", "pdf");
            }
        }
    }
}

/// Opens non-fragment links in a new tab.
#[derive(Clone, Copy, Debug, Default)]
pub struct LinkTarget;

impl Pass for LinkTarget {
    fn name(&self) -> &'static str {
        "link-target"
    }

    fn apply(&self, tree: &mut Tree, root: NodeId) {
        for anchor in tree.find_elements(root, &["a"]) {
            if tree.attr(anchor, "href").is_some_and(|href| !href.starts_with('#')) {
                tree.set_attr(anchor, "target", "_blank");
                tree.set_attr(anchor, "rel", "noopener noreferrer");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_support::run;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_pdf_link_tagged() {
        assert_eq!(
            run(&PdfLink, r#"<p><a href="docs/manual.pdf">manual</a><a href="a.html">a</a></p>"#),
            r#"<p><a href="docs/manual.pdf" filetype="pdf">manual</a><a href="a.html">a</a></p>"#
        );
    }

    #[test]
    fn test_pdf_suffix_is_case_sensitive() {
        let html = r#"<p><a href="A.PDF">a</a></p>"#;

        assert_eq!(run(&PdfLink, html), html);
    }

    #[test]
    fn test_external_link_targets_new_tab() {
        assert_eq!(
            run(&LinkTarget, r#"<p><a href="https://example.com">x</a></p>"#),
            r#"<p><a href="https://example.com" target="_blank" rel="noopener noreferrer">x</a></p>"#
        );
    }

    #[test]
    fn test_fragment_and_bare_anchors_untouched() {
        let html = r##"<p><a href="#intro">intro</a><a name="top">top</a></p>"##;

        assert_eq!(run(&LinkTarget, html), html);
    }

    #[test]
    fn test_existing_target_overridden() {
        assert_eq!(
            run(&LinkTarget, r#"<p><a href="a.html" target="_self">a</a></p>"#),
            r#"<p><a href="a.html" target="_blank" rel="noopener noreferrer">a</a></p>"#
        );
    }
}
