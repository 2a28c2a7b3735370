//! Scaffold a site: config, HTML shell, one page source per route.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use vitrine_static::{HtmlShell, Route, RouteTable};

use crate::config::config_root;

/// Run the init command.
pub async fn run(config_path: &Path, yes: bool) -> Result<()> {
    tracing::info!("Initializing vitrine...");

    let root = config_root(config_path);
    let content_dir = root.join("content");

    if content_dir.exists() && !yes {
        tracing::warn!(
            "{} already exists. Use --yes to overwrite.",
            content_dir.display()
        );
        return Ok(());
    }

    write_file(config_path, DEFAULT_CONFIG, yes)?;
    write_file(&root.join("index.html"), HtmlShell::default_template(), yes)?;
    write_file(
        &root.join("public").join("assets").join("main.css"),
        DEFAULT_CSS,
        yes,
    )?;

    for route in &RouteTable::site_default() {
        let source = content_dir.join(route.output_path().with_extension("md"));
        write_file(&source, &page_source(route), yes)?;
    }

    tracing::info!("Initialization complete!");
    tracing::info!("Run 'vitrine build' to prerender the site.");

    Ok(())
}

/// Write `contents` unless the file exists and `overwrite` is off.
fn write_file(path: &Path, contents: &str, overwrite: bool) -> Result<()> {
    if path.exists() && !overwrite {
        tracing::debug!("Keeping existing {}", path.display());
        return Ok(());
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!("Created {}", path.display());
    Ok(())
}

/// Starter markdown for a route.
fn page_source(route: &Route) -> String {
    if route.is_root() {
        return DEFAULT_HOME.to_string();
    }

    let title = route
        .segments()
        .map(title_case)
        .collect::<Vec<_>>()
        .join(" - ");

    format!(
        "---\ntitle: {title}\ndescription: {title}\n---\n\n# {title}\n\nÀ compléter.\n"
    )
}

fn title_case(segment: &str) -> String {
    segment
        .split('-')
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(c) => c.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

const DEFAULT_CONFIG: &str = r#"# Vitrine configuration

[site]
title = "Vitrine"
# Public URL used for canonical links, hreflang alternates and the sitemap
base_url = "https://example.com/"
description = "Sites web, démos et automatisations sur mesure."
language = "fr"
languages = ["fr", "en", "he"]
routes = [
  "/",
  "/privacy-policy",
  "/terms-of-service",
  "/legal-notice",
  "/demo/fashion",
  "/demo/restaurant",
  "/demo/real-estate",
  "/demo/fitness",
]

[build]
content = "content"
output = "dist"
shell = "index.html"
public = "public"
minify = true
sitemap = true
# "abort" stops at the first failing route, "continue" builds the rest
failure_policy = "abort"
"#;

const DEFAULT_HOME: &str = r#"---
title: Vitrine
description: Sites web, démos et automatisations sur mesure.
---

# Bienvenue

Nous concevons des sites rapides, multilingues et bien référencés.

## Démos

- [Mode](/demo/fashion)
- [Restaurant](/demo/restaurant)
- [Immobilier](/demo/real-estate)
- [Fitness](/demo/fitness)

## Contact

Écrivez-nous depuis le formulaire de contact.
"#;

const DEFAULT_CSS: &str = r#"/* Vitrine base styles */
:root {
  --background: #ffffff;
  --foreground: #111827;
  --accent: #4f46e5;
}

body {
  margin: 0;
  font-family: system-ui, -apple-system, sans-serif;
  background: var(--background);
  color: var(--foreground);
  line-height: 1.6;
}

.page {
  display: grid;
  grid-template-columns: minmax(0, 1fr) 220px;
  gap: 2rem;
  max-width: 1100px;
  margin: 0 auto;
  padding: 2rem;
}

.page[dir="rtl"] {
  direction: rtl;
}

.toc ul {
  list-style: none;
  padding: 0;
}

.toc a {
  color: var(--accent);
  text-decoration: none;
}
"#;
