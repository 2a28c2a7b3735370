//! Prerender pipeline: render every route in table order and write its document.

use std::path::PathBuf;

use serde::Serialize;

use crate::assembler::{PageAssembler, PageWriter, WriteError};
use crate::renderer::{RenderError, Renderer};
use crate::routes::{Route, RouteTable};
use crate::shell::HtmlShell;

/// What to do when a route fails to render or write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Stop at the first failing route.
    #[default]
    Abort,
    /// Record the failure and move on to the next route.
    Continue,
}

/// A document produced for a route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageOutput {
    pub route: Route,
    pub path: PathBuf,
    pub indexable: bool,
}

/// A route that produced no document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageFailure {
    pub route: Route,
    /// Output path that was being produced
    pub path: PathBuf,
    pub message: String,
}

/// Outcome of a pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Report {
    pub written: Vec<PageOutput>,
    pub failures: Vec<PageFailure>,
}

impl Report {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Routes whose documents may be listed in the sitemap.
    pub fn indexable_routes(&self) -> impl Iterator<Item = &Route> {
        self.written
            .iter()
            .filter(|page| page.indexable)
            .map(|page| &page.route)
    }
}

/// Errors that stop a pipeline run.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Failed to render {route}: {source}")]
    Render {
        route: Route,
        #[source]
        source: RenderError,
    },

    #[error("Failed to write {route} to {}: {source}", .path.display())]
    Write {
        route: Route,
        path: PathBuf,
        #[source]
        source: WriteError,
    },
}

impl PipelineError {
    pub fn route(&self) -> &Route {
        match self {
            Self::Render { route, .. } | Self::Write { route, .. } => route,
        }
    }
}

/// Prerender every route of `routes`, strictly one at a time and in order.
///
/// A route is rendered completely before anything is written for it, so a
/// render failure never leaves a partial document behind. Documents written
/// before a failure stay in place.
pub fn run(
    routes: &RouteTable,
    shell: &HtmlShell,
    renderer: &impl Renderer,
    writer: &impl PageWriter,
    policy: FailurePolicy,
) -> Result<Report, PipelineError> {
    let mut report = Report::default();

    for route in routes {
        let output = route.output_path();

        let result = renderer
            .render(route)
            .map_err(|source| PipelineError::Render {
                route: route.clone(),
                source,
            })
            .and_then(|page| {
                PageAssembler::assemble(route, &page, shell, writer)
                    .map(|path| (path, page.indexable))
                    .map_err(|source| PipelineError::Write {
                        route: route.clone(),
                        path: output.clone(),
                        source,
                    })
            });

        match result {
            Ok((path, indexable)) => {
                tracing::info!("Prerendered {} -> {}", route, path.display());
                report.written.push(PageOutput {
                    route: route.clone(),
                    path,
                    indexable,
                });
            }
            Err(e) => {
                tracing::error!("Route {} ({}) failed: {}", route, output.display(), e);
                match policy {
                    FailurePolicy::Abort => return Err(e),
                    FailurePolicy::Continue => report.failures.push(PageFailure {
                        route: route.clone(),
                        path: output,
                        message: e.to_string(),
                    }),
                }
            }
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::fs;
    use std::path::Path;

    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    use crate::assembler::{FsWriter, MemoryWriter};
    use crate::renderer::{RenderedPage, StaticRenderer};

    const SHELL: &str = "<html><body><!--app-html--></body></html>";

    fn route(raw: &str) -> Route {
        Route::parse(raw).unwrap()
    }

    fn site_renderer() -> StaticRenderer {
        StaticRenderer::new()
            .page(route("/"), RenderedPage::new("<h1>Home</h1>"))
            .page(route("/privacy-policy"), RenderedPage::new("<h1>Policy</h1>"))
    }

    #[test]
    fn writes_one_document_per_route() {
        let temp = tempdir().unwrap();
        let out = temp.path().join("dist");
        let routes = RouteTable::parse(&["/", "/privacy-policy"]).unwrap();
        let shell = HtmlShell::new(SHELL).unwrap();

        let report = run(
            &routes,
            &shell,
            &site_renderer(),
            &FsWriter::new(&out),
            FailurePolicy::Abort,
        )
        .unwrap();

        assert!(report.is_success());
        assert_eq!(report.written.len(), 2);
        assert_eq!(
            fs::read_to_string(out.join("index.html")).unwrap(),
            "<html><body><h1>Home</h1></body></html>"
        );
        assert_eq!(
            fs::read_to_string(out.join("privacy-policy.html")).unwrap(),
            "<html><body><h1>Policy</h1></body></html>"
        );
    }

    #[test]
    fn rerunning_produces_identical_files() {
        let temp = tempdir().unwrap();
        let routes = RouteTable::parse(&["/", "/privacy-policy"]).unwrap();
        let shell = HtmlShell::new(SHELL).unwrap();
        let writer = FsWriter::new(temp.path());

        run(&routes, &shell, &site_renderer(), &writer, FailurePolicy::Abort).unwrap();
        let first = fs::read(temp.path().join("privacy-policy.html")).unwrap();

        run(&routes, &shell, &site_renderer(), &writer, FailurePolicy::Abort).unwrap();
        let second = fs::read(temp.path().join("privacy-policy.html")).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn processes_routes_in_table_order() {
        let routes = RouteTable::parse(&["/privacy-policy", "/demo/fashion", "/"]).unwrap();
        let shell = HtmlShell::new(SHELL).unwrap();
        let seen = RefCell::new(Vec::new());
        let renderer = |r: &Route| -> Result<RenderedPage, RenderError> {
            seen.borrow_mut().push(r.to_string());
            Ok(RenderedPage::new(r.as_str()))
        };

        let report = run(
            &routes,
            &shell,
            &renderer,
            &MemoryWriter::new(),
            FailurePolicy::Abort,
        )
        .unwrap();

        assert_eq!(
            seen.into_inner(),
            vec!["/privacy-policy", "/demo/fashion", "/"]
        );
        let paths: Vec<_> = report.written.iter().map(|p| p.path.clone()).collect();
        assert_eq!(
            paths,
            vec![
                PathBuf::from("privacy-policy.html"),
                Path::new("demo").join("fashion.html"),
                PathBuf::from("index.html"),
            ]
        );
    }

    #[test]
    fn aborts_on_unknown_route_without_writing_it() {
        let routes = RouteTable::parse(&["/", "/unknown", "/privacy-policy"]).unwrap();
        let shell = HtmlShell::new(SHELL).unwrap();
        let writer = MemoryWriter::new();

        let err = run(
            &routes,
            &shell,
            &site_renderer(),
            &writer,
            FailurePolicy::Abort,
        )
        .unwrap_err();

        assert!(matches!(
            err,
            PipelineError::Render {
                source: RenderError::NotFound(_),
                ..
            }
        ));
        assert_eq!(err.route(), &route("/unknown"));
        // Earlier output is kept, nothing for the failing route or after it
        assert_eq!(writer.paths(), vec![PathBuf::from("index.html")]);
    }

    #[test]
    fn continue_policy_reports_failures_and_keeps_going() {
        let routes = RouteTable::parse(&["/", "/unknown", "/privacy-policy"]).unwrap();
        let shell = HtmlShell::new(SHELL).unwrap();
        let writer = MemoryWriter::new();

        let report = run(
            &routes,
            &shell,
            &site_renderer(),
            &writer,
            FailurePolicy::Continue,
        )
        .unwrap();

        assert!(!report.is_success());
        assert_eq!(report.written.len(), 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].route, route("/unknown"));
        assert_eq!(report.failures[0].path, PathBuf::from("unknown.html"));
        assert!(writer.get("unknown.html").is_none());
    }

    #[test]
    fn write_failures_name_the_attempted_path() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("demo"), "blocks the directory").unwrap();
        let routes = RouteTable::parse(&["/", "/demo/fashion"]).unwrap();
        let shell = HtmlShell::new(SHELL).unwrap();
        let renderer = |r: &Route| -> Result<RenderedPage, RenderError> {
            Ok(RenderedPage::new(r.as_str()))
        };

        let err = run(
            &routes,
            &shell,
            &renderer,
            &FsWriter::new(temp.path()),
            FailurePolicy::Abort,
        )
        .unwrap_err();

        match err {
            PipelineError::Write { route, path, .. } => {
                assert_eq!(route.as_str(), "/demo/fashion");
                assert_eq!(path, Path::new("demo").join("fashion.html"));
            }
            other => panic!("expected write failure, got {other}"),
        }
        assert!(temp.path().join("index.html").exists());
    }

    #[test]
    fn only_the_placeholder_differs_between_documents() {
        let routes = RouteTable::site_default();
        let shell = HtmlShell::new(SHELL).unwrap();
        let writer = MemoryWriter::new();
        let renderer = |r: &Route| -> Result<RenderedPage, RenderError> {
            Ok(RenderedPage::new(format!("<main>{}</main>", r)))
        };

        run(&routes, &shell, &renderer, &writer, FailurePolicy::Abort).unwrap();

        assert_eq!(writer.len(), routes.len());
        for route in &routes {
            let doc = writer.get(route.output_path()).unwrap();
            let fragment = format!("<main>{}</main>", route);
            assert_eq!(doc.matches(&fragment).count(), 1);
            assert_eq!(doc.replacen(&fragment, "<!--app-html-->", 1), SHELL);
        }
    }

    #[test]
    fn report_serializes_to_json() {
        let routes = RouteTable::parse(&["/"]).unwrap();
        let shell = HtmlShell::new(SHELL).unwrap();

        let report = run(
            &routes,
            &shell,
            &site_renderer(),
            &MemoryWriter::new(),
            FailurePolicy::Abort,
        )
        .unwrap();

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["written"][0]["route"], "/");
        assert_eq!(json["written"][0]["path"], "index.html");
        assert_eq!(json["failures"], serde_json::json!([]));
    }
}
