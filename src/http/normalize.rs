//! Trailing-slash normalization filter.
//!
//! Every request passes through here before routing. A request whose path
//! ends in `/` (other than the root) and is not exempted by a skip rule is
//! answered with a `301 Moved Permanently` to the same URL without the slash.
//! Everything else is forwarded untouched.
//!
//! The redirect is permanent so crawlers consolidate ranking on the
//! slash-less URL. The decision is a pure function of the URI and headers.

use std::borrow::Cow;
use std::str::FromStr;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, uri::Authority, HeaderMap, HeaderValue, Request, StatusCode, Uri},
    middleware::Next,
    response::Response,
};

use crate::config::NormalizeConfig;
use crate::observability::metrics;
use crate::routing::SkipPatterns;

const X_FORWARDED_PROTO: &str = "x-forwarded-proto";

/// Outcome of the filter for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Answer with 301 and this `Location`.
    Redirect(String),
    /// Forward the request unmodified.
    PassThrough,
}

/// Shared, read-only state for [`trailing_slash_middleware`].
#[derive(Debug, Clone)]
pub struct NormalizeState {
    patterns: Arc<SkipPatterns>,
    default_scheme: Arc<str>,
    enabled: bool,
}

impl NormalizeState {
    pub fn from_config(config: &NormalizeConfig) -> Self {
        Self {
            patterns: Arc::new(SkipPatterns::from_config(config)),
            default_scheme: Arc::from(config.default_scheme.as_str()),
            enabled: config.enabled,
        }
    }
}

/// Path with its trailing slash removed, if it has one and is not the root.
///
/// A run of slashes (`/docs//`) is removed in one go so the target can never
/// be redirected again; the site's old edge worker dropped a single character
/// and needed one hop per slash. A path made only of slashes collapses to `/`.
pub fn canonical_path(path: &str) -> Option<&str> {
    if path == "/" || !path.ends_with('/') {
        return None;
    }
    match path.trim_end_matches('/') {
        "" => Some("/"),
        trimmed => Some(trimmed),
    }
}

/// Decide whether a request gets redirected.
pub fn decide(
    patterns: &SkipPatterns,
    uri: &Uri,
    headers: &HeaderMap,
    default_scheme: &str,
) -> Decision {
    let path = uri.path();
    if patterns.should_skip(path) {
        return Decision::PassThrough;
    }

    let Some(target) = canonical_path(path) else {
        return Decision::PassThrough;
    };

    let mut location = String::with_capacity(path.len() + 32);
    match request_origin(uri, headers, default_scheme) {
        Some((scheme, host)) => {
            location.push_str(scheme);
            location.push_str("://");
            location.push_str(host.as_str());
            location.push_str(target);
        }
        None => location.push_str(&same_origin_path(target)),
    }
    if let Some(query) = uri.query() {
        location.push('?');
        location.push_str(query);
    }

    Decision::Redirect(location)
}

/// Scheme and host the client used, when the host is known and well formed.
///
/// The host must parse as a bare authority (no path, query or userinfo) and
/// the scheme must be `http` or `https`; anything else falls back to an
/// origin-relative `Location` and `default_scheme` respectively.
fn request_origin<'a>(
    uri: &'a Uri,
    headers: &'a HeaderMap,
    default_scheme: &'a str,
) -> Option<(&'a str, Authority)> {
    let host = match uri.authority() {
        Some(authority) => authority.clone(),
        None => {
            let raw = headers.get(header::HOST)?.to_str().ok()?;
            Authority::from_str(raw).ok()?
        }
    };
    if host.as_str().is_empty() || host.as_str().contains('@') {
        return None;
    }

    let forwarded = headers
        .get(X_FORWARDED_PROTO)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim);

    let scheme = [uri.scheme_str(), forwarded]
        .into_iter()
        .flatten()
        .find_map(web_scheme)
        .unwrap_or(default_scheme);

    Some((scheme, host))
}

fn web_scheme(scheme: &str) -> Option<&'static str> {
    if scheme.eq_ignore_ascii_case("https") {
        Some("https")
    } else if scheme.eq_ignore_ascii_case("http") {
        Some("http")
    } else {
        None
    }
}

/// Collapse leading slashes and backslashes to one `/`.
///
/// A relative `//host/...` or `/\host/...` target is read by browsers as a
/// different origin.
fn same_origin_path(path: &str) -> Cow<'_, str> {
    let rest = path.trim_start_matches(['/', '\\']);
    if rest.len() + 1 >= path.len() {
        Cow::Borrowed(path)
    } else {
        Cow::Owned(format!("/{rest}"))
    }
}

/// 301 with an empty body.
pub fn permanent_redirect(location: HeaderValue) -> Response {
    let mut response = Response::new(Body::empty());
    *response.status_mut() = StatusCode::MOVED_PERMANENTLY;
    response.headers_mut().insert(header::LOCATION, location);
    response
}

/// Middleware applying [`decide`] to every request.
pub async fn trailing_slash_middleware(
    State(state): State<NormalizeState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if !state.enabled {
        return next.run(request).await;
    }

    let decision = decide(
        &state.patterns,
        request.uri(),
        request.headers(),
        &state.default_scheme,
    );

    if let Decision::Redirect(location) = decision {
        match HeaderValue::from_str(&location) {
            Ok(value) => {
                tracing::debug!(
                    path = %request.uri().path(),
                    location = %location,
                    "Redirecting to canonical URL"
                );
                metrics::record_redirect();
                return permanent_redirect(value);
            }
            Err(e) => {
                tracing::warn!(
                    location = %location,
                    error = %e,
                    "Unusable redirect target, passing through"
                );
            }
        }
    }

    next.run(request).await
}
