use m2h_dom::{NodeId, Tree};

use super::{Pass, Walk, walk};

/// Turns table cells holding exactly `[ ]` or `[x]` into disabled checkboxes.
#[derive(Clone, Copy, Debug, Default)]
pub struct CheckboxCell;

impl Pass for CheckboxCell {
    fn name(&self) -> &'static str {
        "checkbox-cell"
    }

    fn apply(&self, tree: &mut Tree, root: NodeId) {
        walk(tree, root, |tree, node| {
            if !tree.is_element(node, "td") {
                return Walk::Descend;
            }
            let checked = match tree.text_content(node).trim() {
                "[ ]" => false,
                "[x]" => true,
                _ => return Walk::Descend,
            };

            tree.clear_children(node);
            let input = tree.create_element_with("input", &[("type", "checkbox"), ("disabled", "")]);
            if checked {
                tree.set_attr(input, "checked", "");
            }
            tree.append_child(node, input);
            Walk::Skip
        });
    }
}
