//! `POST /api/newsletter`.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::Response,
};
use serde_json::Value;

use crate::http::request::X_REQUEST_ID;
use crate::http::response::ApiResponse;
use crate::newsletter::{is_valid_email, Provider};
use crate::observability::metrics;

pub const SUBSCRIBED: &str = "Successfully subscribed!";
pub const INVALID_EMAIL: &str = "Invalid email address";
pub const SUBSCRIBE_FAILED: &str = "Failed to subscribe. Please try again.";

/// Validate the submitted address and relay it to the provider.
///
/// Invalid JSON and a JSON `null` body are failed signups (500). Any other
/// body without a usable `email` string (arrays, scalars, objects lacking the
/// field) is a client error (400).
pub async fn subscribe_handler(
    State(provider): State<Arc<Provider>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let start = Instant::now();
    let request_id = headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown");

    let payload: Value = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::error!(request_id = %request_id, error = %e, "Newsletter signup error");
            metrics::record_signup(provider.name(), "malformed");
            return failed();
        }
    };

    if payload.is_null() {
        tracing::error!(request_id = %request_id, "Newsletter signup error: null body");
        metrics::record_signup(provider.name(), "malformed");
        return failed();
    }

    let email = payload
        .as_object()
        .and_then(|fields| fields.get("email"))
        .and_then(Value::as_str)
        .unwrap_or_default();
    if !is_valid_email(email) {
        tracing::debug!(request_id = %request_id, "Rejected invalid email address");
        metrics::record_signup(provider.name(), "invalid");
        return ApiResponse::error(INVALID_EMAIL).with_status(StatusCode::BAD_REQUEST);
    }

    match provider.subscribe(email).await {
        Ok(()) => {
            tracing::debug!(
                request_id = %request_id,
                provider = provider.name(),
                elapsed_ms = start.elapsed().as_millis() as u64,
                "Newsletter signup relayed"
            );
            metrics::record_signup(provider.name(), "subscribed");
            ApiResponse::ok(SUBSCRIBED).with_status(StatusCode::OK)
        }
        Err(e) => {
            tracing::error!(
                request_id = %request_id,
                provider = provider.name(),
                error = %e,
                "Newsletter signup error"
            );
            metrics::record_signup(provider.name(), "failed");
            failed()
        }
    }
}

fn failed() -> Response {
    ApiResponse::error(SUBSCRIBE_FAILED).with_status(StatusCode::INTERNAL_SERVER_ERROR)
}
