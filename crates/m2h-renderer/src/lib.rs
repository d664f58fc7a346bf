//! Markdown to HTML document rendering for m2h.
//!
//! The [`Pipeline`] turns a markdown file into a standalone HTML page:
//!
//! 1. markdown is converted with `pulldown-cmark` (GFM, heading ids, YAML
//!    front matter)
//! 2. the HTML is loaded into an [`m2h_dom::Tree`]
//! 3. the [`RuleEngine`] rewrites the tree in place
//! 4. a table of contents is collected from the rewritten tree
//! 5. the [`Document`] assembler adds head, timestamp and TOC
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use m2h_renderer::{Pipeline, RenderOptions};
//!
//! let pipeline = Pipeline::new(RenderOptions::default());
//! let output = pipeline.export(Path::new("notes.md"))?;
//! println!("wrote {}", output.display());
//! # Ok::<(), m2h_renderer::RenderError>(())
//! ```

mod document;
mod error;
mod front_matter;
mod markdown;
mod pipeline;
pub mod rules;
mod toc;

pub use document::{Document, Stylesheet, last_modified_date};
pub use error::RenderError;
pub use front_matter::FrontMatter;
pub use pipeline::{
    DEFAULT_LANG, DEFAULT_STYLESHEET, Pipeline, RenderOptions, RenderedPage, output_path,
};
pub use rules::{Pass, RuleEngine, TransformedTree, Walk, walk};
pub use toc::{TocEntry, build_toc, toc_fragment};
