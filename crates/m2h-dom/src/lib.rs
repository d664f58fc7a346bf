//! Element tree for m2h.
//!
//! A parsed HTML fragment is loaded into an arena-backed [`Tree`] that the
//! rendering pipeline mutates in place and finally serializes back to HTML.
//!
//! # Example
//!
//! ```
//! use m2h_dom::{Tree, parse_fragment, to_html};
//!
//! let mut tree = Tree::new("div");
//! let root = tree.root();
//! parse_fragment(&mut tree, root, "<p>Hello <em>world</em></p>");
//! tree.add_class(root, "main");
//!
//! assert_eq!(
//!     to_html(&tree, root),
//!     r#"<div class="main"><p>Hello <em>world</em></p></div>"#
//! );
//! ```

mod node;
mod parse;
mod serialize;
mod tree;

pub use node::{Attribute, Element, NodeData, NodeId, heading_level};
pub use parse::parse_fragment;
pub use serialize::{escape_attr, escape_text, to_document, to_html};
pub use tree::Tree;
