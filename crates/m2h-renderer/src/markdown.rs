//! Markdown to HTML conversion.
//!
//! Thin adapter over `pulldown-cmark`. On top of the stock HTML output it:
//! - splits off the YAML front matter block
//! - turns soft line breaks into `<br>`
//! - assigns an `id` to every heading that lacks one
//!
//! GitHub alert callouts (`> [!NOTE]`) come out as blockquotes with a
//! `markdown-alert-<kind>` class.

use std::collections::HashMap;

use pulldown_cmark::{CowStr, Event, MetadataBlockKind, Options, Parser, Tag, TagEnd};

/// Markdown converted to an HTML fragment.
#[derive(Clone, Debug, Default)]
pub(crate) struct ParsedMarkdown {
    /// HTML fragment for the document body.
    pub html: String,
    /// Raw YAML front matter (without the `---` fences), if present.
    pub front_matter: Option<String>,
}

fn parser_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_GFM
        | Options::ENABLE_HEADING_ATTRIBUTES
        | Options::ENABLE_YAML_STYLE_METADATA_BLOCKS
}

/// Convert markdown source to an HTML fragment.
pub(crate) fn parse_markdown(source: &str) -> ParsedMarkdown {
    let mut front_matter: Option<String> = None;
    let mut in_metadata = false;
    let mut events: Vec<Event<'_>> = Vec::new();

    for event in Parser::new_ext(source, parser_options()) {
        match event {
            Event::Start(Tag::MetadataBlock(MetadataBlockKind::YamlStyle)) => {
                in_metadata = true;
                front_matter.get_or_insert_with(String::new);
            }
            Event::End(TagEnd::MetadataBlock(MetadataBlockKind::YamlStyle)) => in_metadata = false,
            Event::Text(text) if in_metadata => {
                if let Some(yaml) = front_matter.as_mut() {
                    yaml.push_str(&text);
                }
            }
            Event::SoftBreak => events.push(Event::HardBreak),
            other => events.push(other),
        }
    }

    assign_heading_ids(&mut events);

    let mut html = String::with_capacity(source.len() * 3 / 2);
    pulldown_cmark::html::push_html(&mut html, events.into_iter());

    ParsedMarkdown { html, front_matter }
}

/// Give every heading without an explicit id a unique slug.
fn assign_heading_ids(events: &mut [Event<'_>]) {
    let mut seen: HashMap<String, usize> = HashMap::new();

    for i in 0..events.len() {
        let explicit = match &events[i] {
            Event::Start(Tag::Heading { id, .. }) => id.as_ref().map(ToString::to_string),
            _ => continue,
        };

        if let Some(id) = explicit {
            seen.entry(id).or_insert(0);
            continue;
        }

        let slug = unique_slug(&mut seen, slugify(&heading_text(&events[i + 1..])));
        if let Event::Start(Tag::Heading { id, .. }) = &mut events[i] {
            *id = Some(CowStr::from(slug));
        }
    }
}

/// Plain text of a heading, given the events that follow its start tag.
fn heading_text(events: &[Event<'_>]) -> String {
    let mut text = String::new();
    for event in events {
        match event {
            Event::End(TagEnd::Heading(_)) => break,
            Event::Text(t) | Event::Code(t) => text.push_str(t),
            _ => {}
        }
    }
    text
}

/// Heading slug: lowercase letters and digits, `-`/`_` kept, whitespace to `-`.
pub(crate) fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for c in text.trim().chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
        } else if c == '-' || c == '_' {
            slug.push(c);
        } else if c.is_whitespace() {
            slug.push('-');
        }
    }
    if slug.is_empty() {
        slug.push_str("heading");
    }
    slug
}

fn unique_slug(seen: &mut HashMap<String, usize>, slug: String) -> String {
    let Some(mut count) = seen.get(&slug).copied() else {
        seen.insert(slug.clone(), 0);
        return slug;
    };

    loop {
        count += 1;
        let candidate = format!("{slug}-{count}");
        if !seen.contains_key(&candidate) {
            seen.insert(candidate.clone(), 0);
            seen.insert(slug, count);
            return candidate;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_basic_rendering() {
        let parsed = parse_markdown("# Hello\n\nWorld");

        assert!(parsed.html.contains(r#"<h1 id="hello">Hello</h1>"#));
        assert!(parsed.html.contains("<p>World</p>"));
        assert!(parsed.front_matter.is_none());
    }

    #[test]
    fn test_front_matter_split_off() {
        let parsed = parse_markdown("---\ntitle: Notes\nload:\n  - a.css\n---\n\nBody");

        let yaml = parsed.front_matter.unwrap();
        assert!(yaml.contains("title: Notes"));
        assert!(yaml.contains("- a.css"));
        assert!(!parsed.html.contains("title"));
        assert!(parsed.html.contains("<p>Body</p>"));
    }

    #[test]
    fn test_soft_break_becomes_hard_break() {
        let parsed = parse_markdown("line one\nline two");

        assert!(parsed.html.contains("line one<br />"));
    }

    #[test]
    fn test_duplicate_heading_ids() {
        let parsed = parse_markdown("## Intro\n\n## Intro\n\n## Intro");

        assert!(parsed.html.contains(r#"id="intro""#));
        assert!(parsed.html.contains(r#"id="intro-1""#));
        assert!(parsed.html.contains(r#"id="intro-2""#));
    }

    #[test]
    fn test_explicit_heading_id_kept() {
        let parsed = parse_markdown("## Setup {#install}\n\n## Install");

        assert!(parsed.html.contains(r#"id="install""#));
        assert!(parsed.html.contains(r#"id="install-1""#));
    }

    #[test]
    fn test_fenced_code_language_class() {
        let parsed = parse_markdown("```rust\nfn main() {}\n```");

        assert!(parsed.html.contains(r#"<pre><code class="language-rust">"#));
    }

    #[test]
    fn test_alert_callout() {
        let parsed = parse_markdown("> [!NOTE]\n> x\n\n> [!WARNING]\n> y\n");

        assert!(parsed.html.contains(r#"<blockquote class="markdown-alert-note">"#));
        assert!(parsed.html.contains(r#"<blockquote class="markdown-alert-warning">"#));
        assert!(!parsed.html.contains("[!NOTE]"));
    }

    #[test]
    fn test_raw_html_passes_through() {
        let parsed = parse_markdown("<div class=\"note\">raw</div>");

        assert!(parsed.html.contains(r#"<div class="note">raw</div>"#));
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("What's new?"), "whats-new");
        assert_eq!(slugify("snake_case-name"), "snake_case-name");
        assert_eq!(slugify("日本語 見出し"), "日本語-見出し");
        assert_eq!(slugify("!!!"), "heading");
    }
}
