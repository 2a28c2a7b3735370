//! HTML shell the rendered pages are injected into.

use std::fs;
use std::path::Path;

use crate::renderer::RenderedPage;

/// Placeholder replaced by the rendered page body.
pub const APP_HTML: &str = "<!--app-html-->";

/// Optional placeholder replaced by the page head metadata.
pub const APP_HEAD: &str = "<!--app-head-->";

/// Errors that can occur when loading a shell.
#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    #[error("Failed to read shell {path}: {message}")]
    Read { path: String, message: String },

    #[error("Shell is missing the <!--app-html--> placeholder")]
    MissingPlaceholder,

    #[error("Shell contains {count} {placeholder} placeholders, expected one")]
    DuplicatePlaceholder {
        placeholder: &'static str,
        count: usize,
    },
}

/// A validated HTML template holding exactly one body placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlShell {
    template: String,
}

impl HtmlShell {
    /// Validate a template string.
    pub fn new(template: impl Into<String>) -> Result<Self, ShellError> {
        let template = template.into();

        match template.matches(APP_HTML).count() {
            0 => return Err(ShellError::MissingPlaceholder),
            1 => {}
            count => {
                return Err(ShellError::DuplicatePlaceholder {
                    placeholder: APP_HTML,
                    count,
                })
            }
        }

        let head_count = template.matches(APP_HEAD).count();
        if head_count > 1 {
            return Err(ShellError::DuplicatePlaceholder {
                placeholder: APP_HEAD,
                count: head_count,
            });
        }

        Ok(Self { template })
    }

    /// Load and validate a template file.
    pub fn load(path: &Path) -> Result<Self, ShellError> {
        let template = fs::read_to_string(path).map_err(|e| ShellError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::new(template)
    }

    /// Template shipped by `vitrine init`.
    pub fn default_template() -> &'static str {
        DEFAULT_SHELL
    }

    /// Raw template text.
    pub fn as_str(&self) -> &str {
        &self.template
    }

    /// Whether the template has a head placeholder.
    pub fn has_head(&self) -> bool {
        self.template.contains(APP_HEAD)
    }

    /// Produce a full document for a rendered page.
    ///
    /// Placeholders are substituted in a single left-to-right pass over the
    /// template, so placeholder text inside the page itself is never expanded.
    pub fn assemble(&self, page: &RenderedPage) -> String {
        let mut out =
            String::with_capacity(self.template.len() + page.html.len() + page.head.len());
        let mut rest = self.template.as_str();

        while let Some((pos, token)) = next_placeholder(rest) {
            out.push_str(&rest[..pos]);
            out.push_str(if token == APP_HTML { &page.html } else { &page.head });
            rest = &rest[pos + token.len()..];
        }
        out.push_str(rest);
        out
    }
}

fn next_placeholder(s: &str) -> Option<(usize, &'static str)> {
    [APP_HTML, APP_HEAD]
        .into_iter()
        .filter_map(|token| s.find(token).map(|pos| (pos, token)))
        .min_by_key(|(pos, _)| *pos)
}

const DEFAULT_SHELL: &str = r#"<!DOCTYPE html>
<html lang="fr">
  <head>
    <meta charset="UTF-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1.0" />
    <link rel="icon" type="image/svg+xml" href="/favicon.svg" />
    <link rel="stylesheet" href="/assets/main.css" />
    <!--app-head-->
  </head>
  <body>
    <div id="root"><!--app-html--></div>
    <script type="module" src="/assets/main.js"></script>
  </body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn page(html: &str, head: &str) -> RenderedPage {
        RenderedPage::new(html).with_head(head)
    }

    #[test]
    fn requires_body_placeholder() {
        let result = HtmlShell::new("<html><body></body></html>");
        assert!(matches!(result, Err(ShellError::MissingPlaceholder)));
    }

    #[test]
    fn rejects_repeated_body_placeholder() {
        let result = HtmlShell::new("<!--app-html--><!--app-html-->");
        assert!(matches!(
            result,
            Err(ShellError::DuplicatePlaceholder { count: 2, .. })
        ));
    }

    #[test]
    fn rejects_repeated_head_placeholder() {
        let result = HtmlShell::new("<!--app-head--><!--app-head--><!--app-html-->");
        assert!(matches!(
            result,
            Err(ShellError::DuplicatePlaceholder {
                placeholder: APP_HEAD,
                ..
            })
        ));
    }

    #[test]
    fn substitutes_body_once() {
        let shell = HtmlShell::new("<html><body><!--app-html--></body></html>").unwrap();

        let doc = shell.assemble(&page("<h1>Home</h1>", ""));

        assert_eq!(doc, "<html><body><h1>Home</h1></body></html>");
    }

    #[test]
    fn substitutes_head_when_present() {
        let shell =
            HtmlShell::new("<head><!--app-head--></head><body><!--app-html--></body>").unwrap();

        let doc = shell.assemble(&page("<p>x</p>", "<title>X</title>"));

        assert_eq!(doc, "<head><title>X</title></head><body><p>x</p></body>");
    }

    #[test]
    fn ignores_head_when_shell_has_no_slot() {
        let shell = HtmlShell::new("<body><!--app-html--></body>").unwrap();

        let doc = shell.assemble(&page("<p>x</p>", "<title>X</title>"));

        assert_eq!(doc, "<body><p>x</p></body>");
    }

    #[test]
    fn placeholder_text_inside_content_is_not_substituted_again() {
        let shell =
            HtmlShell::new("<head><!--app-head--></head><body><!--app-html--></body>").unwrap();

        let doc = shell.assemble(&page("<!--app-head-->", "<!--app-html-->"));

        assert_eq!(
            doc,
            "<head><!--app-html--></head><body><!--app-head--></body>"
        );
    }

    #[test]
    fn shell_text_outside_slot_is_unchanged() {
        let template = "<html><body><!--app-html--></body></html>";
        let shell = HtmlShell::new(template).unwrap();

        let a = shell.assemble(&page("<h1>Home</h1>", ""));
        let b = shell.assemble(&page("<h1>Policy</h1>", ""));

        assert_eq!(a.replace("<h1>Home</h1>", APP_HTML), template);
        assert_eq!(b.replace("<h1>Policy</h1>", APP_HTML), template);
        assert_eq!(shell.as_str(), template);
    }

    #[test]
    fn default_template_is_valid() {
        let shell = HtmlShell::new(HtmlShell::default_template()).unwrap();
        assert!(shell.has_head());
    }
}
