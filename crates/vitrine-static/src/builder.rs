//! Site prerenderer: loads the shell, runs the pipeline and writes site-level files.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use vitrine_content::Language;

use crate::assembler::FsWriter;
use crate::assets::{AssetError, AssetPipeline};
use crate::pipeline::{self, FailurePolicy, PipelineError, Report};
use crate::renderer::ContentRenderer;
use crate::routes::RouteTable;
use crate::seo::SiteMeta;
use crate::shell::{HtmlShell, ShellError};
use crate::sitemap::{robots_txt, sitemap_xml};

/// Configuration for prerendering a site.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Markdown page sources, one per route
    pub content_dir: PathBuf,

    /// Output directory
    pub output_dir: PathBuf,

    /// HTML shell holding the `<!--app-html-->` placeholder
    pub shell_path: PathBuf,

    /// Static files copied verbatim into the output directory
    pub public_dir: Option<PathBuf>,

    /// Routes to prerender, in order
    pub routes: RouteTable,

    /// Public base URL of the site
    pub base_url: String,

    /// Site title
    pub title: String,

    /// Fallback meta description
    pub description: Option<String>,

    /// Fallback Open Graph image
    pub image: Option<String>,

    /// Default page language
    pub language: Language,

    /// Languages advertised through hreflang alternates
    pub languages: Vec<Language>,

    /// Minify copied CSS
    pub minify: bool,

    /// Generate sitemap.xml and robots.txt
    pub sitemap: bool,

    /// Whether a failing route stops the build
    pub failure_policy: FailurePolicy,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            content_dir: PathBuf::from("content"),
            output_dir: PathBuf::from("dist"),
            shell_path: PathBuf::from("index.html"),
            public_dir: Some(PathBuf::from("public")),
            routes: RouteTable::site_default(),
            base_url: "/".to_string(),
            title: "Vitrine".to_string(),
            description: None,
            image: None,
            language: Language::default(),
            languages: Language::ALL.to_vec(),
            minify: true,
            sitemap: true,
            failure_policy: FailurePolicy::default(),
        }
    }
}

impl BuildConfig {
    fn site_meta(&self) -> SiteMeta {
        SiteMeta {
            title: self.title.clone(),
            description: self.description.clone(),
            default_image: self.image.clone(),
            base_url: self.base_url.clone(),
            language: self.language,
            languages: self.languages.clone(),
        }
    }
}

/// Result of a build operation.
#[derive(Debug)]
pub struct BuildResult {
    /// Number of pages written
    pub pages: usize,

    /// Number of routes that failed under [`FailurePolicy::Continue`]
    pub failed: usize,

    /// Number of public files copied
    pub assets: usize,

    /// Total build time in milliseconds
    pub duration_ms: u64,

    /// Output directory
    pub output_dir: PathBuf,

    /// Per-route outcome
    pub report: Report,
}

/// Errors that can occur during build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    Shell(#[from] ShellError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error(transparent)]
    Assets(#[from] AssetError),

    #[error("Failed to write output: {0}")]
    WriteError(String),
}

/// Site prerenderer.
pub struct Prerenderer {
    config: BuildConfig,
}

impl Prerenderer {
    /// Create a new prerenderer.
    pub fn new(config: BuildConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Prerender the site.
    pub async fn build(&self) -> Result<BuildResult, BuildError> {
        let start = Instant::now();

        fs::create_dir_all(&self.config.output_dir)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        // Loaded once, shared read-only by every route
        let shell = HtmlShell::load(&self.config.shell_path)?;

        // Public files land first so prerendered pages take precedence over them
        let assets = self.copy_assets()?;

        let renderer = ContentRenderer::new(&self.config.content_dir, self.config.site_meta());
        let writer = FsWriter::new(&self.config.output_dir);

        tracing::info!(
            "Prerendering {} routes from {}",
            self.config.routes.len(),
            self.config.content_dir.display()
        );

        let report = pipeline::run(
            &self.config.routes,
            &shell,
            &renderer,
            &writer,
            self.config.failure_policy,
        )?;

        if self.config.sitemap {
            self.write_sitemap(&report)?;
        }

        Ok(BuildResult {
            pages: report.written.len(),
            failed: report.failures.len(),
            assets,
            duration_ms: start.elapsed().as_millis() as u64,
            output_dir: self.config.output_dir.clone(),
            report,
        })
    }

    /// Copy the public directory, warning about files a page will replace.
    fn copy_assets(&self) -> Result<usize, BuildError> {
        let Some(public_dir) = &self.config.public_dir else {
            return Ok(0);
        };

        if !public_dir.exists() {
            tracing::debug!("No public directory at {}", public_dir.display());
            return Ok(0);
        }

        for route in &self.config.routes {
            let shadow = public_dir.join(route.output_path());
            if shadow.exists() {
                tracing::warn!(
                    "{} is overwritten by the prerendered page for {}",
                    shadow.display(),
                    route
                );
            }
        }

        let copied =
            AssetPipeline::copy_public(public_dir, &self.config.output_dir, self.config.minify)?;
        tracing::info!("Copied {} public files from {}", copied, public_dir.display());
        Ok(copied)
    }

    /// Write sitemap.xml and robots.txt for the indexable pages.
    fn write_sitemap(&self, report: &Report) -> Result<(), BuildError> {
        let sitemap = sitemap_xml(report.indexable_routes(), &self.config.base_url);
        fs::write(self.config.output_dir.join("sitemap.xml"), sitemap)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        fs::write(
            self.config.output_dir.join("robots.txt"),
            robots_txt(&self.config.base_url),
        )
        .map_err(|e| BuildError::WriteError(e.to_string()))?;

        Ok(())
    }
}
