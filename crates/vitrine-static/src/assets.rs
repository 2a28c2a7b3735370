//! Static asset copying and CSS minification.

use std::fs;
use std::path::Path;

use walkdir::WalkDir;

/// Errors that can occur while copying assets.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("Failed to walk {path}: {message}")]
    Walk { path: String, message: String },

    #[error("Failed to copy {from} to {to}: {source}")]
    Copy {
        from: String,
        to: String,
        source: std::io::Error,
    },
}

/// Asset pipeline utilities.
pub struct AssetPipeline;

impl AssetPipeline {
    /// Copy every file below `public_dir` into `output_dir`, keeping relative paths.
    ///
    /// `.css` files are minified when `minify` is set. Returns the number of files copied.
    pub fn copy_public(
        public_dir: &Path,
        output_dir: &Path,
        minify: bool,
    ) -> Result<usize, AssetError> {
        let mut copied = 0;

        for entry in WalkDir::new(public_dir).follow_links(true).sort_by_file_name() {
            let entry = entry.map_err(|e| AssetError::Walk {
                path: public_dir.display().to_string(),
                message: e.to_string(),
            })?;

            if !entry.file_type().is_file() {
                continue;
            }

            let relative = entry
                .path()
                .strip_prefix(public_dir)
                .unwrap_or(entry.path());
            let target = output_dir.join(relative);

            Self::copy_file(entry.path(), &target, minify)?;
            tracing::debug!("Copied asset {}", relative.display());
            copied += 1;
        }

        Ok(copied)
    }

    fn copy_file(from: &Path, to: &Path, minify: bool) -> Result<(), AssetError> {
        let copy_err = |source| AssetError::Copy {
            from: from.display().to_string(),
            to: to.display().to_string(),
            source,
        };

        if let Some(parent) = to.parent() {
            fs::create_dir_all(parent).map_err(copy_err)?;
        }

        let is_css = from.extension().and_then(|e| e.to_str()) == Some("css");
        if minify && is_css {
            let css = fs::read_to_string(from).map_err(copy_err)?;
            let output = match Self::minify_css(&css) {
                Ok(minified) => minified,
                Err(e) => {
                    tracing::warn!("Keeping {} unminified: {}", from.display(), e);
                    css
                }
            };
            fs::write(to, output).map_err(copy_err)?;
        } else {
            fs::copy(from, to).map_err(copy_err)?;
        }

        Ok(())
    }

    /// Minify CSS using lightningcss.
    pub fn minify_css(css: &str) -> Result<String, String> {
        use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};

        let stylesheet = StyleSheet::parse(css, ParserOptions::default())
            .map_err(|e| format!("CSS parse error: {}", e))?;

        let minified = stylesheet
            .to_css(PrinterOptions {
                minify: true,
                ..Default::default()
            })
            .map_err(|e| format!("CSS minify error: {}", e))?;

        Ok(minified.code)
    }
}
