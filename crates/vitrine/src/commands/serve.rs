//! Preview server command.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::{Request, State};
use axum::http::Uri;
use axum::middleware::map_request_with_state;
use axum::Router;
use tower_http::services::{ServeDir, ServeFile};
use vitrine_static::Route;

use crate::config::{config_root, load_config};

/// Run the serve command.
pub async fn run(config_path: &Path, port: u16, dir: Option<PathBuf>, open: bool) -> Result<()> {
    let dir = match dir {
        Some(dir) => dir,
        None => {
            let file_config = load_config(config_path)?;
            config_root(config_path).join(&file_config.build.output)
        }
    };

    if !dir.exists() {
        anyhow::bail!(
            "Directory not found: {}. Run 'vitrine build' first.",
            dir.display()
        );
    }

    let addr: SocketAddr = format!("127.0.0.1:{}", port)
        .parse()
        .context("Invalid address")?;

    tracing::info!("Serving {} at http://{}", dir.display(), addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    if open {
        let url = format!("http://{}", addr);
        let _ = open::that(&url);
    }

    axum::serve(listener, router(dir)).await?;

    Ok(())
}

/// Static file router: prerendered documents by route, then files, then the
/// root document for client-side routes that were not prerendered.
fn router(dir: PathBuf) -> Router {
    let files = ServeDir::new(&dir).fallback(ServeFile::new(dir.join("index.html")));

    Router::new()
        .fallback_service(files)
        .layer(map_request_with_state(Arc::new(dir), rewrite_to_document))
}

async fn rewrite_to_document(State(dir): State<Arc<PathBuf>>, mut req: Request) -> Request {
    if let Some(document) = document_for(&dir, req.uri().path()) {
        let rewritten = match req.uri().query() {
            Some(query) => format!("{}?{}", document, query),
            None => document,
        };
        if let Ok(uri) = rewritten.parse::<Uri>() {
            tracing::debug!("{} -> {}", req.uri(), uri);
            *req.uri_mut() = uri;
        }
    }
    req
}

/// Request path of the prerendered document for `path`, when one exists in `dir`.
fn document_for(dir: &Path, path: &str) -> Option<String> {
    let route = Route::parse(path).ok().filter(|r| !r.is_root())?;
    let output = route.output_path();

    if !dir.join(&output).is_file() {
        return None;
    }

    let segments: Vec<_> = output
        .iter()
        .map(|part| part.to_string_lossy().into_owned())
        .collect();
    Some(format!("/{}", segments.join("/")))
}
