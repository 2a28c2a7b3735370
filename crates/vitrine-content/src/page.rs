//! Page source parser.

use std::collections::HashSet;

use pulldown_cmark::{html, CowStr, Event, Options, Parser, Tag, TagEnd};

use crate::frontmatter::{extract_frontmatter, Frontmatter, FrontmatterError};

/// A parsed page source.
#[derive(Debug, Clone)]
pub struct ParsedPage {
    /// Parsed frontmatter (if present)
    pub frontmatter: Option<Frontmatter>,

    /// Markdown content (without frontmatter)
    pub content: String,

    /// Rendered HTML body, headings carry anchor ids
    pub html: String,

    /// Table of contents entries
    pub toc: Vec<TocEntry>,
}

impl ParsedPage {
    /// Title from frontmatter, falling back to the first heading.
    pub fn title(&self) -> Option<&str> {
        self.frontmatter
            .as_ref()
            .map(|f| f.title.as_str())
            .filter(|t| !t.is_empty())
            .or_else(|| self.toc.first().map(|e| e.title.as_str()))
    }
}

/// A table of contents entry.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct TocEntry {
    /// Heading text
    pub title: String,
    /// Anchor ID
    pub id: String,
    /// Heading level (1-6)
    pub level: u8,
}

/// Errors that can occur when parsing a page.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Frontmatter error: {0}")]
    Frontmatter(#[from] FrontmatterError),
}

/// Parse a page source.
///
/// Extracts frontmatter, renders the markdown body and builds a table of contents.
pub fn parse_page(source: &str) -> Result<ParsedPage, ParseError> {
    let (frontmatter, content) = extract_frontmatter(source)?;

    let options = Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_HEADING_ATTRIBUTES;

    let mut events: Vec<Event> = Vec::new();
    // (index of the Start event, level, text)
    let mut headings: Vec<(usize, u8, String)> = Vec::new();
    let mut current_heading: Option<(usize, u8, String)> = None;

    for event in Parser::new_ext(content, options) {
        match &event {
            Event::Start(Tag::Heading { level, .. }) => {
                current_heading = Some((events.len(), *level as u8, String::new()));
            }

            Event::Text(text) | Event::Code(text) => {
                if let Some((_, _, ref mut heading_text)) = current_heading {
                    heading_text.push_str(text);
                }
            }

            Event::End(TagEnd::Heading(_)) => {
                headings.extend(current_heading.take());
            }

            _ => {}
        }

        events.push(event);
    }

    // Authored ids win over generated ones, wherever they appear in the page
    let mut anchors = Anchors::default();
    for (start, _, _) in &headings {
        if let Some(id) = explicit_id(&events[*start]) {
            anchors.reserved.insert(id.to_string());
        }
    }

    let mut toc = Vec::with_capacity(headings.len());
    for (start, level, title) in headings {
        let id = anchors.assign(&mut events[start], &title);
        toc.push(TocEntry { title, id, level });
    }

    let mut html_output = String::new();
    html::push_html(&mut html_output, events.into_iter());

    Ok(ParsedPage {
        frontmatter,
        content: content.to_string(),
        html: html_output,
        toc,
    })
}

/// Slug used for headings without any alphanumeric text.
const FALLBACK_ANCHOR: &str = "section";

fn explicit_id<'a>(start: &'a Event) -> Option<&'a str> {
    match start {
        Event::Start(Tag::Heading { id: Some(id), .. }) => Some(&**id),
        _ => None,
    }
}

/// Anchor ids handed out so far within one page.
#[derive(Default)]
struct Anchors {
    /// Explicit `{#id}` attributes present anywhere in the page
    reserved: HashSet<String>,
    taken: HashSet<String>,
}

impl Anchors {
    /// Give a heading start event its unique id.
    ///
    /// An explicit `{#id}` is kept unless an earlier heading already uses it.
    /// Generated ids never take an explicit id or one already handed out; a
    /// clash is resolved with the first free `-N` suffix.
    fn assign(&mut self, start: &mut Event, title: &str) -> String {
        let explicit = explicit_id(start).map(str::to_string);
        let base = match &explicit {
            Some(id) => id.clone(),
            None => slugify(title),
        };
        let base = if base.is_empty() {
            FALLBACK_ANCHOR.to_string()
        } else {
            base
        };

        let mut candidate = base.clone();
        let mut n = 0;
        while self.taken.contains(&candidate)
            || (self.reserved.contains(&candidate)
                && explicit.as_deref() != Some(candidate.as_str()))
        {
            n += 1;
            candidate = format!("{}-{}", base, n);
        }
        self.taken.insert(candidate.clone());

        if let Event::Start(Tag::Heading { id, .. }) = start {
            *id = Some(CowStr::from(candidate.clone()));
        }
        candidate
    }
}

/// Convert a heading to a URL-safe slug.
fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for c in text.chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() {
            slug.push(c);
        } else if matches!(c, '-' | '_') || c.is_whitespace() {
            if !slug.is_empty() && !slug.ends_with('-') {
                slug.push('-');
            }
        }
    }
    slug.trim_end_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_complete_page() {
        let source = r#"---
title: Mentions légales
description: Informations légales
---

# Mentions légales

Éditeur du site.

## Hébergement

Serveurs en Europe.
"#;

        let page = parse_page(source).unwrap();

        let fm = page.frontmatter.as_ref().unwrap();
        assert_eq!(fm.title, "Mentions légales");

        assert_eq!(page.toc.len(), 2);
        assert_eq!(page.toc[0].id, "mentions-légales");
        assert_eq!(page.toc[0].level, 1);
        assert_eq!(page.toc[1].title, "Hébergement");
        assert_eq!(page.toc[1].level, 2);

        assert!(page.html.contains(r#"<h2 id="hébergement">Hébergement</h2>"#));
        assert!(page.html.contains("<p>Serveurs en Europe.</p>"));
    }

    #[test]
    fn parses_without_frontmatter() {
        let source = "# Mentions légales\n\nÉditeur du site.";

        let page = parse_page(source).unwrap();

        assert!(page.frontmatter.is_none());
        assert_eq!(page.title(), Some("Mentions légales"));
        assert_eq!(page.toc.len(), 1);
    }

    #[test]
    fn deduplicates_heading_anchors() {
        let source = "## Tarifs\n\n## Tarifs\n\n## Tarifs";

        let page = parse_page(source).unwrap();

        let ids: Vec<_> = page.toc.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["tarifs", "tarifs-1", "tarifs-2"]);
    }

    #[test]
    fn suffixes_skip_ids_already_taken() {
        let source = "## Tarifs\n\n## Tarifs\n\n## Tarifs 1";

        let page = parse_page(source).unwrap();

        let ids: Vec<_> = page.toc.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["tarifs", "tarifs-1", "tarifs-1-1"]);
    }

    #[test]
    fn generated_ids_avoid_explicit_ones() {
        let page = parse_page("## Contact {#tarifs}\n\n## Tarifs").unwrap();
        let ids: Vec<_> = page.toc.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["tarifs", "tarifs-1"]);

        let page = parse_page("## Tarifs\n\n## Contact {#tarifs}").unwrap();
        let ids: Vec<_> = page.toc.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["tarifs-1", "tarifs"]);
        assert!(page.html.contains(r#"<h2 id="tarifs-1">Tarifs</h2>"#));
    }

    #[test]
    fn repeated_explicit_ids_are_suffixed() {
        let page = parse_page("## A {#faq}\n\n## B {#faq}").unwrap();

        let ids: Vec<_> = page.toc.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["faq", "faq-1"]);
    }

    #[test]
    fn symbol_only_headings_get_fallback_anchor() {
        let page = parse_page("# !!!\n\n## ???").unwrap();

        let ids: Vec<_> = page.toc.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["section", "section-1"]);
        assert!(!page.html.contains(r#"id="""#));
    }

    #[test]
    fn keeps_explicit_heading_ids() {
        let source = "## Contact {#contact-form}";

        let page = parse_page(source).unwrap();

        assert_eq!(page.toc[0].id, "contact-form");
        assert!(page.html.contains(r#"id="contact-form""#));
    }

    #[test]
    fn includes_inline_code_in_heading_title() {
        let page = parse_page("# The `run` step").unwrap();

        assert_eq!(page.toc[0].title, "The run step");
        assert_eq!(page.toc[0].id, "the-run-step");
    }

    #[test]
    fn slugify_works() {
        assert_eq!(slugify("Mentions légales"), "mentions-légales");
        assert_eq!(slugify("Démo Restaurant"), "démo-restaurant");
        assert_eq!(slugify("Cookies (tiers)"), "cookies-tiers");
        assert_eq!(slugify("  Données   personnelles  "), "données-personnelles");
        assert_eq!(slugify("Tarifs -- 2024"), "tarifs-2024");
    }
}
