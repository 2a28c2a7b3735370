//! Head metadata injected into each prerendered document.

use serde::Serialize;

use vitrine_content::{Language, ParsedPage};

use crate::routes::Route;

/// An alternate-language link.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alternate {
    pub hreflang: String,
    pub href: String,
}

/// Metadata rendered into the `<!--app-head-->` slot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeadMetadata {
    pub title: String,
    pub site_title: String,
    pub description: Option<String>,
    pub keywords: Vec<String>,
    pub image: Option<String>,
    pub canonical: String,
    pub noindex: bool,
    pub og_locale: String,
    pub alternates: Vec<Alternate>,
}

impl HeadMetadata {
    /// Build head metadata for a route.
    ///
    /// The title is the page's own (frontmatter, else first heading), so the
    /// head always agrees with the body. Every published language gets an
    /// `hreflang` alternate pointing at the language-switched URL, plus an
    /// `x-default` entry for the canonical URL.
    pub fn for_route(route: &Route, page: &ParsedPage, site: &SiteMeta, language: Language) -> Self {
        let frontmatter = page.frontmatter.as_ref();
        let canonical = route.url(&site.base_url);

        let mut alternates: Vec<Alternate> = site
            .languages
            .iter()
            .map(|lang| Alternate {
                hreflang: lang.code().to_string(),
                href: format!("{}?lang={}", canonical, lang.code()),
            })
            .collect();
        if !alternates.is_empty() {
            alternates.push(Alternate {
                hreflang: "x-default".to_string(),
                href: canonical.clone(),
            });
        }

        let image = frontmatter
            .and_then(|f| f.image.clone())
            .or_else(|| site.default_image.clone())
            .map(|img| absolute_url(&site.base_url, &img));

        Self {
            title: page.title().unwrap_or_default().to_string(),
            site_title: site.title.clone(),
            description: frontmatter
                .and_then(|f| f.description.clone())
                .or_else(|| site.description.clone()),
            keywords: frontmatter.map(|f| f.keywords.clone()).unwrap_or_default(),
            image,
            canonical,
            noindex: frontmatter.is_some_and(|f| f.noindex),
            og_locale: language.og_locale().to_string(),
            alternates,
        }
    }
}

/// Site-wide metadata shared by every page.
#[derive(Debug, Clone)]
pub struct SiteMeta {
    /// Site title, appended to page titles
    pub title: String,
    /// Fallback meta description
    pub description: Option<String>,
    /// Fallback Open Graph image
    pub default_image: Option<String>,
    /// Public base URL, e.g. `https://example.com/`
    pub base_url: String,
    /// Default page language
    pub language: Language,
    /// Languages the site is published in
    pub languages: Vec<Language>,
}

impl Default for SiteMeta {
    fn default() -> Self {
        Self {
            title: "Vitrine".to_string(),
            description: None,
            default_image: None,
            base_url: "/".to_string(),
            language: Language::default(),
            languages: Language::ALL.to_vec(),
        }
    }
}

/// Resolve a possibly root-relative URL against the base URL.
fn absolute_url(base_url: &str, url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!(
            "{}/{}",
            base_url.trim_end_matches('/'),
            url.trim_start_matches('/')
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::TemplateEngine;
    use vitrine_content::parse_page;

    fn site() -> SiteMeta {
        SiteMeta {
            title: "Agence".to_string(),
            description: Some("Sites et automatisations".to_string()),
            default_image: Some("/og/default.png".to_string()),
            base_url: "https://agence.example/".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn builds_alternates_for_every_language() {
        let route = Route::parse("/demo/fashion").unwrap();

        let page = parse_page("# Mode").unwrap();

        let head = HeadMetadata::for_route(&route, &page, &site(), Language::Fr);

        assert_eq!(head.canonical, "https://agence.example/demo/fashion");
        let langs: Vec<_> = head.alternates.iter().map(|a| a.hreflang.as_str()).collect();
        assert_eq!(langs, vec!["fr", "en", "he", "x-default"]);
        assert_eq!(
            head.alternates[2].href,
            "https://agence.example/demo/fashion?lang=he"
        );
    }

    #[test]
    fn title_falls_back_to_first_heading() {
        let route = Route::parse("/legal-notice").unwrap();
        let page = parse_page("# Mentions légales\n\nÉditeur du site.").unwrap();

        let head = HeadMetadata::for_route(&route, &page, &site(), Language::Fr);
        let html = TemplateEngine::new().render_head(&head).unwrap();

        assert_eq!(head.title, "Mentions légales");
        assert!(html.contains("<title>Mentions légales | Agence</title>"));
        assert!(html.contains(r#"content="Mentions légales""#));
    }

    #[test]
    fn frontmatter_overrides_site_defaults() {
        let route = Route::parse("/privacy-policy").unwrap();
        let page = parse_page(
            "---\ntitle: Privacy\ndescription: How we handle data\nimage: https://cdn.example/privacy.png\nnoindex: true\n---\n# Privacy policy\n",
        )
        .unwrap();

        let head = HeadMetadata::for_route(&route, &page, &site(), Language::En);

        assert_eq!(head.title, "Privacy");
        assert_eq!(head.description.as_deref(), Some("How we handle data"));
        assert_eq!(head.image.as_deref(), Some("https://cdn.example/privacy.png"));
        assert!(head.noindex);
        assert_eq!(head.og_locale, "en_US");
    }

    #[test]
    fn falls_back_to_site_image_as_absolute_url() {
        let route = Route::parse("/").unwrap();

        let page = parse_page("Bienvenue.").unwrap();

        let head = HeadMetadata::for_route(&route, &page, &site(), Language::He);

        assert_eq!(head.title, "");
        assert_eq!(
            head.image.as_deref(),
            Some("https://agence.example/og/default.png")
        );
        assert_eq!(head.og_locale, "he_IL");
    }

    #[test]
    fn renders_escaped_head_markup() {
        let route = Route::parse("/").unwrap();
        let page = parse_page("---\ntitle: Design & Code\nkeywords: [web, n8n]\n---\n").unwrap();
        let head = HeadMetadata::for_route(&route, &page, &site(), Language::Fr);

        let html = TemplateEngine::new().render_head(&head).unwrap();

        assert!(html.contains("<title>Design &amp; Code | Agence</title>"));
        assert!(html.contains(r#"<link rel="canonical" href="https://agence.example/" />"#));
        assert!(html.contains(r#"<meta name="keywords" content="web, n8n" />"#));
        assert!(html.contains(r#"hreflang="x-default""#));
        assert!(!html.contains("noindex"));
    }
}
