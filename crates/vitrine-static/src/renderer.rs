//! Renderers turn a route into the markup of its page.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;

use vitrine_content::parse_page;

use crate::routes::Route;
use crate::seo::{HeadMetadata, SiteMeta};
use crate::templates::{PageContext, TemplateEngine};

/// Output of rendering a single route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    /// Body fragment for the `<!--app-html-->` slot
    pub html: String,

    /// Head markup for the `<!--app-head-->` slot
    pub head: String,

    /// Whether the page may be listed in the sitemap
    pub indexable: bool,
}

impl RenderedPage {
    /// A page with a body and no head metadata.
    pub fn new(html: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            head: String::new(),
            indexable: true,
        }
    }

    pub fn with_head(mut self, head: impl Into<String>) -> Self {
        self.head = head.into();
        self
    }
}

/// Errors a renderer can report.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    #[error("No page registered for route {0}")]
    NotFound(Route),

    #[error("Failed to render {route}: {message}")]
    Failed { route: Route, message: String },
}

impl RenderError {
    pub fn failed(route: &Route, message: impl ToString) -> Self {
        Self::Failed {
            route: route.clone(),
            message: message.to_string(),
        }
    }
}

/// Produces the page for a route.
///
/// Rendering the same route twice against unchanged inputs must return the
/// same page; renderers have no side effects beyond the returned value.
pub trait Renderer {
    fn render(&self, route: &Route) -> Result<RenderedPage, RenderError>;
}

impl<F> Renderer for F
where
    F: Fn(&Route) -> Result<RenderedPage, RenderError>,
{
    fn render(&self, route: &Route) -> Result<RenderedPage, RenderError> {
        self(route)
    }
}

/// Renderer backed by a fixed route-to-fragment map.
#[derive(Debug, Clone, Default)]
pub struct StaticRenderer {
    pages: HashMap<Route, RenderedPage>,
}

impl StaticRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the page for a route, replacing any previous one.
    pub fn page(mut self, route: Route, page: RenderedPage) -> Self {
        self.pages.insert(route, page);
        self
    }
}

impl Renderer for StaticRenderer {
    fn render(&self, route: &Route) -> Result<RenderedPage, RenderError> {
        self.pages
            .get(route)
            .cloned()
            .ok_or_else(|| RenderError::NotFound(route.clone()))
    }
}

/// Renderer reading one markdown source per route from a content directory.
///
/// `/` reads `index.md`, `/a/b` reads `a/b.md`.
pub struct ContentRenderer {
    content_dir: PathBuf,
    site: SiteMeta,
    templates: TemplateEngine,
}

impl ContentRenderer {
    pub fn new(content_dir: impl Into<PathBuf>, site: SiteMeta) -> Self {
        Self {
            content_dir: content_dir.into(),
            site,
            templates: TemplateEngine::new(),
        }
    }

    /// Source file for a route.
    pub fn source_path(&self, route: &Route) -> PathBuf {
        self.content_dir
            .join(route.output_path().with_extension("md"))
    }
}

impl Renderer for ContentRenderer {
    fn render(&self, route: &Route) -> Result<RenderedPage, RenderError> {
        let source_path = self.source_path(route);

        let source = match fs::read_to_string(&source_path) {
            Ok(source) => source,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(RenderError::NotFound(route.clone()));
            }
            Err(e) => {
                return Err(RenderError::failed(
                    route,
                    format!("{}: {}", source_path.display(), e),
                ))
            }
        };

        let page = parse_page(&source)
            .map_err(|e| RenderError::failed(route, format!("{}: {}", source_path.display(), e)))?;

        let language = page
            .frontmatter
            .as_ref()
            .and_then(|f| f.lang)
            .unwrap_or(self.site.language);

        let context = PageContext {
            title: page.title().unwrap_or_default().to_string(),
            site_title: self.site.title.clone(),
            route: route.to_string(),
            lang: language.code().to_string(),
            dir: language.dir().to_string(),
            content: page.html.clone(),
            toc: page.toc.clone(),
        };

        let html = self
            .templates
            .render_page(&context)
            .map_err(|e| RenderError::failed(route, e))?;

        let metadata = HeadMetadata::for_route(route, &page, &self.site, language);
        let head = self
            .templates
            .render_head(&metadata)
            .map_err(|e| RenderError::failed(route, e))?;

        tracing::debug!("Rendered {} from {}", route, source_path.display());

        Ok(RenderedPage {
            html,
            head,
            indexable: !metadata.noindex,
        })
    }
}
