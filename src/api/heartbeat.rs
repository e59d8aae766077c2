//! `GET /api/test`: liveness check for the API layer.

use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct Heartbeat {
    pub success: bool,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

pub async fn heartbeat() -> Json<Heartbeat> {
    Json(Heartbeat {
        success: true,
        message: "Edge functions are working!".to_string(),
        timestamp: Utc::now(),
    })
}
