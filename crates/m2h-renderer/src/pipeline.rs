//! Render pipeline.
//!
//! One configurable pipeline serves both the exporter and the preview server:
//! read source → markdown → element tree → rewrite passes → TOC → assembly →
//! serialization.

use std::path::{Path, PathBuf};

use m2h_dom::{Tree, parse_fragment, to_document};

use crate::document::{Document, Stylesheet, last_modified_date};
use crate::error::RenderError;
use crate::front_matter::FrontMatter;
use crate::markdown::parse_markdown;
use crate::rules::RuleEngine;
use crate::toc::{TocEntry, build_toc};

/// Stylesheet used when none is configured.
pub const DEFAULT_STYLESHEET: &str = "https://cdn.jsdelivr.net/gh/Awtnb/md-less/style.less";

/// Default `<html lang>` value.
pub const DEFAULT_LANG: &str = "ja";

/// Render configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderOptions {
    /// Title override. Takes precedence over front matter.
    pub title: Option<String>,
    /// Base stylesheet: an `http(s)` URL or a local path.
    pub stylesheet: Option<String>,
    /// Omit the base stylesheet. Front matter `load` sheets are still included.
    pub plain: bool,
    /// Appended to the file stem of exported documents.
    pub suffix: String,
    /// Document language.
    pub lang: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            title: None,
            stylesheet: Some(DEFAULT_STYLESHEET.to_owned()),
            plain: false,
            suffix: String::new(),
            lang: DEFAULT_LANG.to_owned(),
        }
    }
}

/// Result of rendering one document.
#[derive(Clone, Debug)]
pub struct RenderedPage {
    /// Complete HTML document.
    pub html: String,
    /// Resolved document title.
    pub title: String,
    /// Table of contents entries.
    pub toc: Vec<TocEntry>,
}

/// Markdown to HTML document pipeline.
#[derive(Debug, Default)]
pub struct Pipeline {
    options: RenderOptions,
    engine: RuleEngine,
}

impl Pipeline {
    /// Pipeline with the standard rewrite passes.
    #[must_use]
    pub fn new(options: RenderOptions) -> Self {
        Self::with_engine(options, RuleEngine::standard())
    }

    /// Pipeline with a custom rule engine.
    #[must_use]
    pub fn with_engine(options: RenderOptions, engine: RuleEngine) -> Self {
        Self { options, engine }
    }

    #[must_use]
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Render `source` to a complete HTML document.
    pub fn render(&self, source: &Path) -> Result<RenderedPage, RenderError> {
        let markdown = std::fs::read_to_string(source).map_err(|e| RenderError::io(source, e))?;
        let parsed = parse_markdown(&markdown);
        let front_matter = read_front_matter(source, parsed.front_matter.as_deref())?;

        let title = self.title(source, &front_matter);
        let stylesheets = self.stylesheets(source, &front_matter);

        let mut tree = Tree::new("div");
        let root = tree.root();
        parse_fragment(&mut tree, root, &parsed.html);
        let body = self.engine.apply(tree);
        let toc = build_toc(&body);

        let page = Document {
            title: title.clone(),
            lang: self.options.lang.clone(),
            stylesheets,
            timestamp: last_modified_date(source),
            toc: toc.clone(),
            body,
        }
        .assemble();

        Ok(RenderedPage {
            html: to_document(&page, page.root()),
            title,
            toc,
        })
    }

    /// Render `source` and return only the HTML.
    pub fn render_html(&self, source: &Path) -> Result<String, RenderError> {
        Ok(self.render(source)?.html)
    }

    /// Render `source` and write the result next to it.
    ///
    /// Returns the path of the written file.
    pub fn export(&self, source: &Path) -> Result<PathBuf, RenderError> {
        let page = self.render(source)?;
        let output = output_path(source, &self.options.suffix);
        std::fs::write(&output, page.html).map_err(|e| RenderError::Io {
            path: output.clone(),
            source: e,
        })?;
        tracing::info!(source = %source.display(), output = %output.display(), "Exported document");
        Ok(output)
    }

    /// Local stylesheet files the rendered document depends on.
    pub fn local_stylesheets(&self, source: &Path) -> Result<Vec<PathBuf>, RenderError> {
        let markdown = std::fs::read_to_string(source).map_err(|e| RenderError::io(source, e))?;
        let parsed = parse_markdown(&markdown);
        let front_matter = read_front_matter(source, parsed.front_matter.as_deref())?;

        Ok(self
            .stylesheets(source, &front_matter)
            .iter()
            .filter_map(|sheet| sheet.path().map(Path::to_path_buf))
            .collect())
    }

    fn title(&self, source: &Path, front_matter: &FrontMatter) -> String {
        self.options
            .title
            .iter()
            .chain(front_matter.title.iter())
            .find(|title| !title.is_empty())
            .cloned()
            .unwrap_or_else(|| file_stem(source))
    }

    fn stylesheets(&self, source: &Path, front_matter: &FrontMatter) -> Vec<Stylesheet> {
        let source_dir = source.parent().unwrap_or_else(|| Path::new(""));
        let base = self
            .options
            .stylesheet
            .as_deref()
            .filter(|css| !self.options.plain && !css.is_empty())
            .map(|css| Stylesheet::resolve(css, Path::new("")));

        base.into_iter()
            .chain(
                front_matter
                    .load
                    .iter()
                    .map(|path| Stylesheet::resolve(path, source_dir)),
            )
            .collect()
    }
}

fn read_front_matter(source: &Path, yaml: Option<&str>) -> Result<FrontMatter, RenderError> {
    yaml.map_or_else(
        || Ok(FrontMatter::default()),
        |yaml| {
            FrontMatter::parse(yaml).map_err(|e| RenderError::FrontMatter {
                path: source.to_path_buf(),
                source: e,
            })
        },
    )
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Output path for an exported document: `<stem><suffix>.html` beside `source`.
#[must_use]
pub fn output_path(source: &Path, suffix: &str) -> PathBuf {
    source.with_file_name(format!("{}{suffix}.html", file_stem(source)))
}
