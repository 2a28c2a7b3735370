//! Site configuration file (site.toml).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use vitrine_content::Language;
use vitrine_static::{BuildConfig, FailurePolicy, RouteTable};

/// Configuration file structure.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default)]
    pub site: SiteSection,
    #[serde(default)]
    pub build: BuildSection,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SiteSection {
    pub title: String,
    pub base_url: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub language: Language,
    pub languages: Vec<Language>,
    /// Routes to prerender; the built-in route table when absent
    pub routes: Option<Vec<String>>,
}

impl Default for SiteSection {
    fn default() -> Self {
        Self {
            title: "Vitrine".to_string(),
            base_url: "/".to_string(),
            description: None,
            image: None,
            language: Language::default(),
            languages: Language::ALL.to_vec(),
            routes: None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct BuildSection {
    pub content: PathBuf,
    pub output: PathBuf,
    pub shell: PathBuf,
    pub public: PathBuf,
    pub minify: bool,
    pub sitemap: bool,
    pub failure_policy: FailurePolicy,
}

impl Default for BuildSection {
    fn default() -> Self {
        Self {
            content: PathBuf::from("content"),
            output: PathBuf::from("dist"),
            shell: PathBuf::from("index.html"),
            public: PathBuf::from("public"),
            minify: true,
            sitemap: true,
            failure_policy: FailurePolicy::default(),
        }
    }
}

/// Load configuration from `path` if it exists.
/// Returns an error if the config file exists but is malformed.
pub fn load_config(path: &Path) -> Result<ConfigFile> {
    if !path.exists() {
        tracing::debug!("No {} found, using defaults", path.display());
        return Ok(ConfigFile::default());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let config = parse_config(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    tracing::info!("Loaded config from {}", path.display());
    Ok(config)
}

pub fn parse_config(content: &str) -> Result<ConfigFile> {
    Ok(toml::from_str(content)?)
}

impl ConfigFile {
    /// Resolve into a build configuration, relative to the config file's directory.
    pub fn into_build_config(self, root: &Path) -> Result<BuildConfig> {
        let routes = match &self.site.routes {
            Some(routes) => RouteTable::parse(routes.as_slice()).context("Invalid route table")?,
            None => RouteTable::site_default(),
        };

        Ok(BuildConfig {
            content_dir: root.join(&self.build.content),
            output_dir: root.join(&self.build.output),
            shell_path: root.join(&self.build.shell),
            public_dir: Some(root.join(&self.build.public)),
            routes,
            base_url: self.site.base_url,
            title: self.site.title,
            description: self.site.description,
            image: self.site.image,
            language: self.site.language,
            languages: self.site.languages,
            minify: self.build.minify,
            sitemap: self.build.sitemap,
            failure_policy: self.build.failure_policy,
        })
    }
}

/// Directory paths in the config file are relative to.
pub fn config_root(path: &Path) -> PathBuf {
    path.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}
