//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the API routes and static asset fallback
//! - Wire up middleware (request ID, tracing, timeout, metrics, normalization)
//! - Bind server to listener
//! - Stop gracefully on signal

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::FromRef,
    http::Request,
    middleware,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::api::api_routes;
use crate::config::SiteConfig;
use crate::http::assets::{serve_asset, AssetService};
use crate::http::normalize::{trailing_slash_middleware, NormalizeState};
use crate::http::request::{propagate_request_id_layer, set_request_id_layer, RequestIdExt};
use crate::lifecycle::wait_for_shutdown;
use crate::newsletter::{Provider, RelayResult};
use crate::observability::metrics;

/// Application state injected into handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub assets: AssetService,
    pub provider: Arc<Provider>,
}

impl FromRef<AppState> for AssetService {
    fn from_ref(state: &AppState) -> Self {
        state.assets.clone()
    }
}

impl FromRef<AppState> for Arc<Provider> {
    fn from_ref(state: &AppState) -> Self {
        state.provider.clone()
    }
}

/// HTTP server for the site edge.
pub struct HttpServer {
    router: Router,
    config: SiteConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    ///
    /// Fails only if the newsletter provider cannot be built.
    pub fn new(config: SiteConfig) -> RelayResult<Self> {
        let provider = Provider::from_config(
            &config.newsletter,
            Duration::from_secs(config.timeouts.upstream_secs),
        )?;

        let state = AppState {
            assets: AssetService::new(&config.assets),
            provider: Arc::new(provider),
        };

        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// Outermost first: request ID, trace span, response ID echo, timeout,
    /// metrics, trailing-slash filter, then routing.
    #[allow(deprecated)]
    fn build_router(config: &SiteConfig, state: AppState) -> Router {
        let normalize = NormalizeState::from_config(&config.normalize);

        Router::new()
            .merge(api_routes())
            .fallback(serve_asset)
            .with_state(state)
            .layer(middleware::from_fn_with_state(normalize, trailing_slash_middleware))
            .layer(middleware::from_fn(metrics::track_requests))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    path = %request.uri().path(),
                    request_id = %request.request_id(),
                )
            }))
            .layer(set_request_id_layer())
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            assets_root = %self.config.assets.root,
            provider = ?self.config.newsletter.provider,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(wait_for_shutdown(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// The fully layered router, for driving requests without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }
}
