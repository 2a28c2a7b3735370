//! Frontmatter extraction and parsing.

use serde::Deserialize;

use crate::language::Language;

/// Parsed frontmatter from a page source.
#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
pub struct Frontmatter {
    /// Page title (required)
    pub title: String,

    /// Meta description for search engines and link previews
    #[serde(default)]
    pub description: Option<String>,

    /// Meta keywords
    #[serde(default)]
    pub keywords: Vec<String>,

    /// Open Graph image URL
    #[serde(default)]
    pub image: Option<String>,

    /// Language override for this page
    #[serde(default)]
    pub lang: Option<Language>,

    /// Keep the page out of search indexes and the sitemap
    #[serde(default)]
    pub noindex: bool,
}

/// Split a page source into its frontmatter and markdown body.
///
/// The block must open on the first non-blank line with a line of exactly `---`
/// and close with another such line. Sources without an opening fence have no
/// frontmatter and are returned whole.
pub fn extract_frontmatter(source: &str) -> Result<(Option<Frontmatter>, &str), FrontmatterError> {
    let body = source.trim_start();
    let Some(rest) = strip_fence(body) else {
        return Ok((None, source));
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == FENCE {
            let yaml = &rest[..offset];
            let frontmatter = serde_yaml::from_str::<Frontmatter>(yaml)
                .map_err(|e| FrontmatterError::InvalidYaml(e.to_string()))?;
            let content = &rest[offset + line.len()..];
            return Ok((Some(frontmatter), content.trim_start()));
        }
        offset += line.len();
    }

    Err(FrontmatterError::Unclosed)
}

const FENCE: &str = "---";

/// The text after an opening fence line, if `source` starts with one.
fn strip_fence(source: &str) -> Option<&str> {
    let rest = source.strip_prefix(FENCE)?;
    rest.strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))
}

#[derive(Debug, thiserror::Error)]
pub enum FrontmatterError {
    #[error("frontmatter opened with --- but never closed")]
    Unclosed,

    #[error("frontmatter is not valid YAML: {0}")]
    InvalidYaml(String),
}
