//! Arena-backed element tree.
//!
//! Nodes live in a single `Vec` owned by [`Tree`]; links between them are
//! [`NodeId`] indices. A node's parent link never implies ownership, so
//! detaching a node only unlinks it and the id remains usable (for example to
//! re-attach it elsewhere).

use crate::node::{Attribute, Element, NodeData, NodeId};

#[derive(Clone, Debug)]
struct Slot {
    data: NodeData,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Mutable element tree with a single root element.
///
/// Every structural edit keeps two invariants: the tree is acyclic and each
/// node has at most one parent. Attaching a node that already has a parent
/// moves it.
#[derive(Clone, Debug)]
pub struct Tree {
    slots: Vec<Slot>,
    root: NodeId,
}

impl Tree {
    /// Create a tree whose root is an empty element named `root_name`.
    pub fn new(root_name: &str) -> Self {
        let mut tree = Self {
            slots: Vec::with_capacity(64),
            root: NodeId(0),
        };
        tree.root = tree.create_element(root_name);
        tree
    }

    /// The root element.
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Make `id` the new root. The node is detached from its parent first.
    pub fn set_root(&mut self, id: NodeId) {
        self.detach(id);
        self.root = id;
    }

    fn push(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.slots.len());
        self.slots.push(Slot {
            data,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    /// Create a detached element.
    pub fn create_element(&mut self, name: &str) -> NodeId {
        self.push(NodeData::Element(Element::new(name)))
    }

    /// Create a detached element with the given attributes.
    pub fn create_element_with(&mut self, name: &str, attrs: &[(&str, &str)]) -> NodeId {
        let mut element = Element::new(name);
        element.attrs = attrs
            .iter()
            .map(|(name, value)| Attribute::new(*name, *value))
            .collect();
        self.push(NodeData::Element(element))
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.push(NodeData::Text(text.into()))
    }

    /// Payload of a node.
    #[must_use]
    pub fn data(&self, id: NodeId) -> &NodeData {
        &self.slots[id.0].data
    }

    /// Element payload, `None` for text nodes.
    #[must_use]
    pub fn element(&self, id: NodeId) -> Option<&Element> {
        self.data(id).as_element()
    }

    /// Mutable element payload, `None` for text nodes.
    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        match &mut self.slots[id.0].data {
            NodeData::Element(el) => Some(el),
            NodeData::Text(_) => None,
        }
    }

    /// Text payload, `None` for elements.
    #[must_use]
    pub fn text(&self, id: NodeId) -> Option<&str> {
        self.data(id).as_text()
    }

    /// Mutable text payload, `None` for elements.
    pub fn text_mut(&mut self, id: NodeId) -> Option<&mut String> {
        match &mut self.slots[id.0].data {
            NodeData::Text(text) => Some(text),
            NodeData::Element(_) => None,
        }
    }

    /// Whether `id` is an element named `name`.
    #[must_use]
    pub fn is_element(&self, id: NodeId, name: &str) -> bool {
        self.data(id).is_element_named(name)
    }

    /// Parent of a node, `None` for the root and detached nodes.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.slots[id.0].parent
    }

    /// Children in document order.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.slots[id.0].children
    }

    /// First child, if any.
    #[must_use]
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).first().copied()
    }

    fn is_ancestor_or_self(&self, candidate: NodeId, of: NodeId) -> bool {
        let mut current = Some(of);
        while let Some(id) = current {
            if id == candidate {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    fn assert_attachable(&self, parent: NodeId, child: NodeId) {
        assert!(
            !self.is_ancestor_or_self(child, parent),
            "attaching {child:?} under {parent:?} would create a cycle"
        );
    }

    /// Append `child` as the last child of `parent`, moving it if attached elsewhere.
    ///
    /// # Panics
    ///
    /// Panics if `child` is `parent` or one of its ancestors.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.assert_attachable(parent, child);
        self.detach(child);
        self.slots[child.0].parent = Some(parent);
        self.slots[parent.0].children.push(child);
    }

    /// Insert `new` immediately before `reference` in `reference`'s parent.
    ///
    /// Does nothing if `reference` has no parent.
    ///
    /// # Panics
    ///
    /// Panics if `new` is an ancestor of `reference`.
    pub fn insert_before(&mut self, reference: NodeId, new: NodeId) {
        let Some(parent) = self.parent(reference) else {
            return;
        };
        self.assert_attachable(parent, new);
        self.detach(new);
        let index = self.index_in_parent(reference).unwrap_or(0);
        self.slots[new.0].parent = Some(parent);
        self.slots[parent.0].children.insert(index, new);
    }

    fn index_in_parent(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|c| *c == id)
    }

    /// Unlink a node from its parent. The node and its subtree stay valid.
    pub fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.slots[id.0].parent.take() {
            self.slots[parent.0].children.retain(|c| *c != id);
        }
    }

    /// Put `new` at the position `old` occupies in its parent and detach `old`.
    pub fn replace(&mut self, old: NodeId, new: NodeId) {
        self.insert_before(old, new);
        self.detach(old);
    }

    /// Detach every child of `id`.
    pub fn clear_children(&mut self, id: NodeId) {
        let children = std::mem::take(&mut self.slots[id.0].children);
        for child in children {
            self.slots[child.0].parent = None;
        }
    }

    /// Value of the last attribute named `name`.
    #[must_use]
    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)?.attr(name)
    }

    /// Set an attribute, replacing the last one with the same name or appending.
    ///
    /// Does nothing on text nodes.
    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) {
        let Some(el) = self.element_mut(id) else {
            return;
        };
        if let Some(attr) = el.attrs.iter_mut().rev().find(|a| a.name == name) {
            value.clone_into(&mut attr.value);
        } else {
            el.attrs.push(Attribute::new(name, value));
        }
    }

    /// Add a token to the `class` attribute unless it is already present.
    pub fn add_class(&mut self, id: NodeId, class: &str) {
        let Some(el) = self.element_mut(id) else {
            return;
        };
        if el.has_class(class) {
            return;
        }
        if let Some(attr) = el.attrs.iter_mut().rev().find(|a| a.name == "class") {
            if !attr.value.trim().is_empty() {
                attr.value.push(' ');
            }
            attr.value.push_str(class);
        } else {
            el.attrs.push(Attribute::new("class", class));
        }
    }

    /// Whether the element carries the class token.
    #[must_use]
    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.element(id).is_some_and(|el| el.has_class(class))
    }

    /// Concatenated text of every descendant text node, ignoring markup.
    #[must_use]
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        for node in self.descendants(id) {
            if let Some(text) = self.text(node) {
                out.push_str(text);
            }
        }
        out
    }

    /// `id` and all of its descendants in pre-order.
    #[must_use]
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(self.children(node).iter().rev());
        }
        out
    }

    /// Elements below (and including) `id` whose tag is one of `names`, in document order.
    #[must_use]
    pub fn find_elements(&self, id: NodeId, names: &[&str]) -> Vec<NodeId> {
        self.descendants(id)
            .into_iter()
            .filter(|n| {
                self.element(*n)
                    .is_some_and(|el| names.contains(&el.name.as_str()))
            })
            .collect()
    }
}
