//! Static asset resolution for the generated site.
//!
//! The site generator writes pages as `<page>/index.html`, while canonical
//! URLs carry no trailing slash. `/about` therefore has to be served from
//! `about/index.html` directly: redirecting it to `/about/` would bounce
//! straight back off the trailing-slash filter.
//!
//! Resolution for a request path, first hit wins:
//! 1. the path itself, when it names a file
//! 2. `<path>/index.html`
//! 3. `<path>.html`
//!
//! Anything else is answered by the configured not-found page with 404.

use std::path::{Path, PathBuf};

use axum::{
    body::Body,
    extract::State,
    http::{uri::PathAndQuery, Request, Uri},
    response::Response,
};
use percent_encoding::percent_decode_str;
use tower::ServiceExt;
use tower_http::{
    services::{ServeDir, ServeFile},
    set_status::SetStatus,
};

use crate::config::AssetsConfig;

/// Serves the site directory with clean-URL resolution.
#[derive(Debug, Clone)]
pub struct AssetService {
    root: PathBuf,
    serve_dir: ServeDir<SetStatus<ServeFile>>,
}

impl AssetService {
    pub fn new(config: &AssetsConfig) -> Self {
        let root = PathBuf::from(&config.root);
        let not_found = ServeFile::new(root.join(&config.not_found_page));
        let serve_dir = ServeDir::new(&root)
            .append_index_html_on_directories(false)
            .not_found_service(not_found);

        Self { root, serve_dir }
    }
}

/// Work out which path [`ServeDir`] should see for `path`.
///
/// Returns `None` when the path should be served as-is (it names a file, or
/// nothing matches and the not-found page takes over).
pub async fn resolve_asset_path(root: &Path, path: &str) -> Option<String> {
    let decoded = percent_decode_str(path).decode_utf8().ok()?;
    if decoded.split('/').any(|segment| segment == "..") || decoded.contains('\\') {
        return None;
    }
    let relative = decoded.trim_start_matches('/');

    if path.ends_with('/') {
        return is_file(&root.join(relative).join("index.html"))
            .await
            .then(|| format!("{path}index.html"));
    }

    if is_file(&root.join(relative)).await {
        return None;
    }
    if is_file(&root.join(relative).join("index.html")).await {
        return Some(format!("{path}/index.html"));
    }
    if is_file(&root.join(format!("{relative}.html"))).await {
        return Some(format!("{path}.html"));
    }
    None
}

async fn is_file(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|m| m.is_file())
        .unwrap_or(false)
}

fn with_path(uri: &Uri, path: &str) -> Result<Uri, axum::http::Error> {
    let path_and_query = match uri.query() {
        Some(query) => format!("{path}?{query}"),
        None => path.to_string(),
    };
    let mut parts = uri.clone().into_parts();
    parts.path_and_query = Some(path_and_query.parse::<PathAndQuery>()?);
    Ok(Uri::from_parts(parts)?)
}

/// Fallback handler: everything the API layer does not claim lands here.
pub async fn serve_asset(State(assets): State<AssetService>, request: Request<Body>) -> Response {
    let (mut parts, body) = request.into_parts();

    if let Some(resolved) = resolve_asset_path(&assets.root, parts.uri.path()).await {
        match with_path(&parts.uri, &resolved) {
            Ok(uri) => {
                tracing::trace!(from = %parts.uri.path(), to = %resolved, "Resolved clean URL");
                parts.uri = uri;
            }
            Err(e) => {
                tracing::warn!(path = %resolved, error = %e, "Failed to rewrite asset path");
            }
        }
    }

    let request = Request::from_parts(parts, body);
    match assets.serve_dir.oneshot(request).await {
        Ok(response) => response.map(Body::new),
        Err(never) => match never {},
    }
}
