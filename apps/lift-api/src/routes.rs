//! 路由定义
//!
//! 集中管理所有端点，将路径映射到对应的 handlers。
//! - 健康检查：/health
//! - 指标快照：/metrics
//! - 电梯状态推送（WebSocket）：/ws/elevator/status/{elevator_id}

use super::AppState;
use super::handlers::*;
use axum::{Router, routing::get};

/// 创建 API 路由
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(get_metrics))
        .route("/ws/elevator/status/:elevator_id", get(elevator_status))
}
