//! API routing layer.
//!
//! Lives under `/api/`, which the trailing-slash filter never touches.

pub mod heartbeat;
pub mod newsletter;

use axum::{
    routing::{get, post},
    Router,
};

use crate::http::server::AppState;

pub use heartbeat::heartbeat;
pub use newsletter::subscribe_handler;

pub const NEWSLETTER_PATH: &str = "/api/newsletter";
pub const HEARTBEAT_PATH: &str = "/api/test";

pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route(NEWSLETTER_PATH, post(subscribe_handler))
        .route(HEARTBEAT_PATH, get(heartbeat))
}
