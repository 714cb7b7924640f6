//! HTTP / WebSocket handlers。

mod metrics;
mod status_ws;

pub use metrics::get_metrics;
pub use status_ws::elevator_status;

use axum::{Json, response::IntoResponse};

/// 健康检查。
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "ok": true }))
}
