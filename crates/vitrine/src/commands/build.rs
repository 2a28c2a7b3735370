//! Prerender build command.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use vitrine_static::{FailurePolicy, Prerenderer};

use crate::config::{config_root, load_config};

/// Command-line overrides for the build.
#[derive(Debug, Default)]
pub struct BuildOptions {
    pub output: Option<PathBuf>,
    pub minify: Option<bool>,
    pub keep_going: bool,
    pub report: Option<PathBuf>,
}

/// Run the build command.
pub async fn run(config_path: &Path, options: BuildOptions) -> Result<()> {
    tracing::info!("Prerendering site...");

    let file_config = load_config(config_path)?;
    let mut config = file_config.into_build_config(&config_root(config_path))?;

    if let Some(output) = options.output {
        config.output_dir = output;
    }
    if let Some(minify) = options.minify {
        config.minify = minify;
    }
    if options.keep_going {
        config.failure_policy = FailurePolicy::Continue;
    }

    let result = Prerenderer::new(config).build().await?;

    if let Some(report_path) = &options.report {
        let json = serde_json::to_string_pretty(&result.report)?;
        fs::write(report_path, json)
            .with_context(|| format!("Failed to write report {}", report_path.display()))?;
        tracing::info!("Report: {}", report_path.display());
    }

    tracing::info!(
        "Prerendered {} pages and copied {} public files in {}ms",
        result.pages,
        result.assets,
        result.duration_ms
    );

    tracing::info!("Output: {}", result.output_dir.display());

    if result.failed > 0 {
        for failure in &result.report.failures {
            tracing::error!("{} ({}): {}", failure.route, failure.path.display(), failure.message);
        }
        anyhow::bail!("{} of {} routes failed", result.failed, result.failed + result.pages);
    }

    Ok(())
}
