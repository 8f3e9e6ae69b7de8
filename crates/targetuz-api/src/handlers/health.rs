//! Health endpoints

use axum::Json;
use serde::Serialize;

/// Liveness probe
pub async fn ping() -> &'static str {
    "pong"
}

#[derive(Debug, Serialize)]
pub struct ServerTime {
    pub server_time: i64,
}

/// Current server time in epoch milliseconds
pub async fn server_time() -> Json<ServerTime> {
    Json(ServerTime {
        server_time: chrono::Utc::now().timestamp_millis(),
    })
}
