//! Node payload types.

/// Handle to a node stored in a [`Tree`](crate::Tree).
///
/// Handles stay valid for the lifetime of the tree, including after the node
/// has been detached from its parent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

/// A single `name="value"` pair on an element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attribute {
    /// Attribute name (lowercase).
    pub name: String,
    /// Attribute value (unescaped).
    pub value: String,
}

impl Attribute {
    /// Create a new attribute.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Element payload: tag name plus ordered attributes.
///
/// Duplicate attribute names are allowed; lookups return the last one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Element {
    /// Tag name (lowercase).
    pub name: String,
    /// Attributes in document order.
    pub attrs: Vec<Attribute>,
}

impl Element {
    /// Create an element without attributes.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: Vec::new(),
        }
    }

    /// Value of the last attribute named `name`.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .rev()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Whether the `class` attribute contains `class` as a whitespace-separated token.
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .is_some_and(|v| v.split_ascii_whitespace().any(|c| c == class))
    }

    /// Whether this is a heading element (`h1`..`h6`).
    #[must_use]
    pub fn is_heading(&self) -> bool {
        heading_level(&self.name).is_some()
    }
}

/// Heading level (1-6) for a tag name, `None` for anything else.
#[must_use]
pub fn heading_level(name: &str) -> Option<u8> {
    match name {
        "h1" => Some(1),
        "h2" => Some(2),
        "h3" => Some(3),
        "h4" => Some(4),
        "h5" => Some(5),
        "h6" => Some(6),
        _ => None,
    }
}

/// Payload stored in every tree node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeData {
    /// An element with tag name and attributes.
    Element(Element),
    /// A run of character data.
    Text(String),
}

impl NodeData {
    /// Element payload, if this is an element.
    #[must_use]
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(el) => Some(el),
            Self::Text(_) => None,
        }
    }

    /// Text payload, if this is a text node.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Element(_) => None,
        }
    }

    /// Whether this is an element with the given tag name.
    #[must_use]
    pub fn is_element_named(&self, name: &str) -> bool {
        self.as_element().is_some_and(|el| el.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attr_last_wins() {
        let mut el = Element::new("a");
        el.attrs.push(Attribute::new("href", "first"));
        el.attrs.push(Attribute::new("href", "second"));

        assert_eq!(el.attr("href"), Some("second"));
        assert_eq!(el.attr("title"), None);
    }

    #[test]
    fn test_has_class_matches_tokens() {
        let mut el = Element::new("li");
        el.attrs.push(Attribute::new("class", "sub  empty"));

        assert!(el.has_class("sub"));
        assert!(el.has_class("empty"));
        assert!(!el.has_class("su"));
    }

    #[test]
    fn test_heading_level() {
        assert_eq!(heading_level("h1"), Some(1));
        assert_eq!(heading_level("h6"), Some(6));
        assert_eq!(heading_level("h7"), None);
        assert_eq!(heading_level("header"), None);
    }
}
