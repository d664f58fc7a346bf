use m2h_dom::{NodeId, Tree};

use super::{Pass, Walk, walk};

/// Replaces single-image paragraphs with an image container.
///
/// `<p><img alt="A"></p>` becomes
/// `<div class="img-container"><div class="img-wrapper"><img alt="A"></div></div>`.
/// An alt text of `left` or `right` is also copied to a `pos` attribute on the
/// container. Any other content of the paragraph is dropped.
#[derive(Clone, Copy, Debug, Default)]
pub struct ImageWrap;

impl ImageWrap {
    fn single_image(tree: &Tree, paragraph: NodeId) -> Option<NodeId> {
        let mut images = tree
            .children(paragraph)
            .iter()
            .copied()
            .filter(|child| tree.is_element(*child, "img"));
        let image = images.next()?;
        images.next().is_none().then_some(image)
    }
}

impl Pass for ImageWrap {
    fn name(&self) -> &'static str {
        "image-wrap"
    }

    fn apply(&self, tree: &mut Tree, root: NodeId) {
        walk(tree, root, |tree, node| {
            if !tree.is_element(node, "p") || tree.parent(node).is_none() {
                return Walk::Descend;
            }
            let Some(image) = Self::single_image(tree, node) else {
                return Walk::Descend;
            };

            let container = tree.create_element_with("div", &[("class", "img-container")]);
            if let Some(pos) = tree
                .attr(image, "alt")
                .filter(|alt| matches!(*alt, "left" | "right"))
                .map(str::to_owned)
            {
                tree.set_attr(container, "pos", &pos);
            }
            let wrapper = tree.create_element_with("div", &[("class", "img-wrapper")]);
            tree.append_child(wrapper, image);
            tree.append_child(container, wrapper);
            tree.replace(node, container);
            Walk::Skip
        });
    }
}
