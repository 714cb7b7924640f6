//! Telemetry 指标快照。
//!
//! - GET /metrics

use api_contract::{ApiResponse, MetricsSnapshotDto};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use lift_telemetry::metrics;

pub async fn get_metrics() -> Response {
    let snapshot = metrics().snapshot();
    (
        StatusCode::OK,
        Json(ApiResponse::success(MetricsSnapshotDto {
            connections_opened: snapshot.connections_opened,
            connections_closed: snapshot.connections_closed,
            connections_replaced: snapshot.connections_replaced,
            connections_rejected: snapshot.connections_rejected,
            frames_received: snapshot.frames_received,
            frames_decode_failed: snapshot.frames_decode_failed,
            commands_applied: snapshot.commands_applied,
            commands_unknown: snapshot.commands_unknown,
            ticks_run: snapshot.ticks_run,
            snapshots_sent: snapshot.snapshots_sent,
            snapshot_send_failures: snapshot.snapshot_send_failures,
        })),
    )
        .into_response()
}
