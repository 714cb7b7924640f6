//! 追踪与请求 ID 生成。

use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing_subscriber::{EnvFilter, fmt};

/// 请求级追踪标识。
#[derive(Debug, Clone)]
pub struct RequestIds {
    pub request_id: String,
    pub trace_id: String,
}

/// 基础指标快照。
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsSnapshot {
    pub connections_opened: u64,
    pub connections_closed: u64,
    pub connections_replaced: u64,
    pub connections_rejected: u64,
    pub frames_received: u64,
    pub frames_decode_failed: u64,
    pub commands_applied: u64,
    pub commands_unknown: u64,
    pub ticks_run: u64,
    pub snapshots_sent: u64,
    pub snapshot_send_failures: u64,
}

/// 基础指标（进程内计数器）。
pub struct TelemetryMetrics {
    connections_opened: AtomicU64,
    connections_closed: AtomicU64,
    connections_replaced: AtomicU64,
    connections_rejected: AtomicU64,
    frames_received: AtomicU64,
    frames_decode_failed: AtomicU64,
    commands_applied: AtomicU64,
    commands_unknown: AtomicU64,
    ticks_run: AtomicU64,
    snapshots_sent: AtomicU64,
    snapshot_send_failures: AtomicU64,
}

impl TelemetryMetrics {
    pub fn new() -> Self {
        Self {
            connections_opened: AtomicU64::new(0),
            connections_closed: AtomicU64::new(0),
            connections_replaced: AtomicU64::new(0),
            connections_rejected: AtomicU64::new(0),
            frames_received: AtomicU64::new(0),
            frames_decode_failed: AtomicU64::new(0),
            commands_applied: AtomicU64::new(0),
            commands_unknown: AtomicU64::new(0),
            ticks_run: AtomicU64::new(0),
            snapshots_sent: AtomicU64::new(0),
            snapshot_send_failures: AtomicU64::new(0),
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            connections_opened: self.connections_opened.load(Ordering::Relaxed),
            connections_closed: self.connections_closed.load(Ordering::Relaxed),
            connections_replaced: self.connections_replaced.load(Ordering::Relaxed),
            connections_rejected: self.connections_rejected.load(Ordering::Relaxed),
            frames_received: self.frames_received.load(Ordering::Relaxed),
            frames_decode_failed: self.frames_decode_failed.load(Ordering::Relaxed),
            commands_applied: self.commands_applied.load(Ordering::Relaxed),
            commands_unknown: self.commands_unknown.load(Ordering::Relaxed),
            ticks_run: self.ticks_run.load(Ordering::Relaxed),
            snapshots_sent: self.snapshots_sent.load(Ordering::Relaxed),
            snapshot_send_failures: self.snapshot_send_failures.load(Ordering::Relaxed),
        }
    }
}

impl Default for TelemetryMetrics {
    fn default() -> Self {
        Self::new()
    }
}

static METRICS: OnceLock<TelemetryMetrics> = OnceLock::new();

/// 获取全局指标实例。
pub fn metrics() -> &'static TelemetryMetrics {
    METRICS.get_or_init(TelemetryMetrics::new)
}

/// 初始化 tracing（默认 info）。
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).try_init();
}

/// 生成新的 request_id 与 trace_id。
pub fn new_request_ids() -> RequestIds {
    RequestIds {
        request_id: uuid::Uuid::new_v4().to_string(),
        trace_id: uuid::Uuid::new_v4().to_string(),
    }
}

/// 记录连接建立次数。
pub fn record_connection_opened() {
    metrics().connections_opened.fetch_add(1, Ordering::Relaxed);
}

/// 记录连接关闭次数。
pub fn record_connection_closed() {
    metrics().connections_closed.fetch_add(1, Ordering::Relaxed);
}

/// 记录同 ID 重连替换次数。
pub fn record_connection_replaced() {
    metrics()
        .connections_replaced
        .fetch_add(1, Ordering::Relaxed);
}

/// 记录连接被拒绝次数（缺失设备 ID）。
pub fn record_connection_rejected() {
    metrics()
        .connections_rejected
        .fetch_add(1, Ordering::Relaxed);
}

/// 记录入站帧接收次数。
pub fn record_frame_received() {
    metrics().frames_received.fetch_add(1, Ordering::Relaxed);
}

/// 记录入站帧解码失败次数。
pub fn record_frame_decode_failed() {
    metrics()
        .frames_decode_failed
        .fetch_add(1, Ordering::Relaxed);
}

/// 记录命令应用成功次数。
pub fn record_command_applied() {
    metrics().commands_applied.fetch_add(1, Ordering::Relaxed);
}

/// 记录未知命令次数。
pub fn record_command_unknown() {
    metrics().commands_unknown.fetch_add(1, Ordering::Relaxed);
}

/// 记录仿真 tick 执行次数。
pub fn record_tick() {
    metrics().ticks_run.fetch_add(1, Ordering::Relaxed);
}

/// 记录快照发送成功次数。
pub fn record_snapshot_sent() {
    metrics().snapshots_sent.fetch_add(1, Ordering::Relaxed);
}

/// 记录快照发送失败次数。
pub fn record_snapshot_send_failure() {
    metrics()
        .snapshot_send_failures
        .fetch_add(1, Ordering::Relaxed);
}
