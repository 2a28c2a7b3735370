//! Page sources for the prerendered site.
//!
//! Parses markdown pages with YAML frontmatter, extracts headings for a table of
//! contents, and defines the closed set of languages the site is published in.

pub mod frontmatter;
pub mod language;
pub mod page;

pub use frontmatter::{Frontmatter, FrontmatterError};
pub use language::{Language, UnknownLanguage};
pub use page::{parse_page, ParseError, ParsedPage, TocEntry};
