//! Template engine for page bodies and head metadata.

use minijinja::{context, Environment};
use serde::Serialize;

use vitrine_content::TocEntry;

use crate::seo::HeadMetadata;

/// Context for rendering a page body.
#[derive(Debug, Clone, Serialize)]
pub struct PageContext {
    /// Page title
    pub title: String,
    /// Site title
    pub site_title: String,
    /// Route being rendered
    pub route: String,
    /// Language code
    pub lang: String,
    /// Text direction (`ltr` or `rtl`)
    pub dir: String,
    /// Rendered markdown HTML
    pub content: String,
    /// Table of contents
    pub toc: Vec<TocEntry>,
}

/// Template engine using minijinja.
pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    /// Create a new template engine with the built-in templates.
    pub fn new() -> Self {
        let mut env = Environment::new();

        // Template names carry no `.html` suffix so auto-escaping stays off;
        // values go through the `text` filter, which leaves `/` untouched in URLs.
        env.add_filter("text", escape_text);

        env.add_template_owned("page".to_string(), PAGE_TEMPLATE.to_string())
            .expect("Failed to add page template");

        env.add_template_owned("head".to_string(), HEAD_TEMPLATE.to_string())
            .expect("Failed to add head template");

        Self { env }
    }

    /// Render the body fragment for a page.
    pub fn render_page(&self, page: &PageContext) -> Result<String, minijinja::Error> {
        let tmpl = self.env.get_template("page")?;

        tmpl.render(context! {
            title => &page.title,
            site_title => &page.site_title,
            route => &page.route,
            lang => &page.lang,
            dir => &page.dir,
            content => &page.content,
            toc => &page.toc,
        })
    }

    /// Render the head markup for a page.
    pub fn render_head(&self, head: &HeadMetadata) -> Result<String, minijinja::Error> {
        self.env.get_template("head")?.render(head)
    }
}

/// Escape text for HTML element content and quoted attribute values.
pub fn escape_text(value: String) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

const PAGE_TEMPLATE: &str = r##"<main class="page" lang="{{ lang | text }}" dir="{{ dir | text }}" data-route="{{ route | text }}">
  <article class="content">
    {{ content }}
  </article>
{% if toc | length > 1 %}
  <aside class="toc">
    <ul>
    {% for entry in toc %}{% if entry.level > 1 %}
      <li class="toc-level-{{ entry.level }}"><a href="#{{ entry.id | text }}">{{ entry.title | text }}</a></li>
    {% endif %}{% endfor %}
    </ul>
  </aside>
{% endif %}
</main>"##;

const HEAD_TEMPLATE: &str = r##"<title>{% if title and title != site_title %}{{ title | text }} | {% endif %}{{ site_title | text }}</title>
{% if description %}<meta name="description" content="{{ description | text }}" />
{% endif %}{% if keywords %}<meta name="keywords" content="{{ keywords | join(", ") | text }}" />
{% endif %}{% if noindex %}<meta name="robots" content="noindex, nofollow" />
{% endif %}<link rel="canonical" href="{{ canonical | text }}" />
{% for alt in alternates %}<link rel="alternate" hreflang="{{ alt.hreflang | text }}" href="{{ alt.href | text }}" />
{% endfor %}<meta property="og:type" content="website" />
<meta property="og:site_name" content="{{ site_title | text }}" />
<meta property="og:title" content="{{ (title or site_title) | text }}" />
<meta property="og:url" content="{{ canonical | text }}" />
<meta property="og:locale" content="{{ og_locale | text }}" />
{% if description %}<meta property="og:description" content="{{ description | text }}" />
{% endif %}{% if image %}<meta property="og:image" content="{{ image | text }}" />
<meta name="twitter:card" content="summary_large_image" />
{% endif %}"##;
