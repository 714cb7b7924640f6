//! 电梯监控后端入口：HTTP 端点 + 每梯 WebSocket 状态推送。

mod handlers;
mod routes;

use axum::{
    body::Body,
    http::{HeaderValue, Request},
    middleware::{self, Next},
    response::Response,
};
use lift_config::AppConfig;
use lift_registry::ElevatorRegistry;
use lift_simulator::SimulatorConfig;
use lift_telemetry::{init_tracing, new_request_ids};
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;
use tracing::Instrument;

/// 各 handler 共享的应用状态。
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<ElevatorRegistry>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 加载本地 .env（如存在），便于直接 cargo run 启动
    dotenvy::dotenv().ok();
    // 从环境变量加载运行配置
    let config = AppConfig::from_env()?;
    // 初始化结构化日志
    init_tracing();

    let simulator_config = SimulatorConfig {
        tick_interval: Duration::from_millis(config.tick_interval_ms),
        door_hold: Duration::from_millis(config.door_hold_ms),
        floor_count: config.floor_count,
        max_weight: config.max_weight,
        ..SimulatorConfig::default()
    };
    let registry = Arc::new(ElevatorRegistry::new(simulator_config));
    let state = AppState { registry };

    let app = routes::create_api_router()
        .with_state(state)
        // 注入 request_id/trace_id
        .layer(middleware::from_fn(request_context))
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(&config.http_addr).await?;
    tracing::info!(target: "lift.api", addr = %config.http_addr, "listening");
    axum::serve(listener, app).await?;
    Ok(())
}

async fn request_context(mut req: Request<Body>, next: Next) -> Response {
    // 生成 request_id 与 trace_id，并注入请求扩展与日志
    let ids = new_request_ids();
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    req.extensions_mut().insert(ids.clone());

    let span = tracing::info_span!(
        "request",
        request_id = %ids.request_id,
        trace_id = %ids.trace_id,
        method = %method,
        path = %path
    );

    let mut response = next.run(req).instrument(span).await;
    response.headers_mut().insert(
        "x-request-id",
        HeaderValue::from_str(&ids.request_id).unwrap_or_else(|_| HeaderValue::from_static("")),
    );
    response.headers_mut().insert(
        "x-trace-id",
        HeaderValue::from_str(&ids.trace_id).unwrap_or_else(|_| HeaderValue::from_static("")),
    );
    response
}
