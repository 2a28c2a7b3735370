//! Sitemap and robots.txt generation.

use crate::routes::Route;

/// Build `sitemap.xml` for the given routes.
pub fn sitemap_xml<'a>(routes: impl IntoIterator<Item = &'a Route>, base_url: &str) -> String {
    let urls: Vec<String> = routes
        .into_iter()
        .map(|route| {
            format!(
                "  <url>\n    <loc>{}</loc>\n  </url>",
                escape_xml(&route.url(base_url))
            )
        })
        .collect();

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
{}
</urlset>
"#,
        urls.join("\n")
    )
}

/// Build `robots.txt` pointing crawlers at the sitemap.
pub fn robots_txt(base_url: &str) -> String {
    format!(
        "User-agent: *\nAllow: /\nSitemap: {}/sitemap.xml\n",
        base_url.trim_end_matches('/')
    )
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
