//! 电梯状态推送通道（WebSocket）。
//!
//! - GET /ws/elevator/status/{elevator_id}
//!
//! 传输适配：注册表/仿真器只认识 `SnapshotSink`。这里把 sink
//! 实现为一条有界通道，写端单独一个任务持有 WebSocket 发送半边，
//! 读循环把入站文本帧交给注册表路由。连接断开（任一方向出错）后
//! 走 on_disconnect 回收仿真器。

use crate::AppState;
use async_trait::async_trait;
use axum::{
    extract::ws::{CloseFrame, Message, WebSocket, WebSocketUpgrade},
    extract::{Path, State},
    response::Response,
};
use futures::{SinkExt, StreamExt, stream::SplitSink};
use lift_registry::RegistryError;
use lift_simulator::{SinkError, SnapshotSink};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// 快照通道容量：有界，发送端在仿真任务里 await，不无限堆积。
const FRAME_BUFFER: usize = 32;

#[derive(serde::Deserialize)]
pub struct ElevatorPath {
    pub(crate) elevator_id: String,
}

/// 把快照帧交给写端任务的 sink 适配器。
struct WsSnapshotSink {
    tx: mpsc::Sender<String>,
}

#[async_trait]
impl SnapshotSink for WsSnapshotSink {
    async fn send(&self, frame: String) -> Result<(), SinkError> {
        // 写端任务退出（对端已断）即视为传输关闭
        self.tx.send(frame).await.map_err(|_| SinkError::Closed)
    }
}

pub async fn elevator_status(
    State(state): State<AppState>,
    Path(path): Path<ElevatorPath>,
    ws: WebSocketUpgrade,
) -> Response {
    ws.on_upgrade(move |socket| serve_elevator(state, path.elevator_id, socket))
}

async fn serve_elevator(state: AppState, elevator_id: String, mut socket: WebSocket) {
    let (frame_tx, frame_rx) = mpsc::channel::<String>(FRAME_BUFFER);
    let sink = Arc::new(WsSnapshotSink { tx: frame_tx });

    let connection_id = match state.registry.on_connect(&elevator_id, sink).await {
        Ok(connection_id) => connection_id,
        Err(RegistryError::MissingElevatorId) => {
            warn!(target: "lift.api", "rejecting connection without elevator id");
            let _ = socket
                .send(Message::Close(Some(CloseFrame {
                    code: 1007,
                    reason: "missing elevator id".into(),
                })))
                .await;
            return;
        }
    };

    let (ws_tx, mut ws_rx) = socket.split();
    let writer = tokio::spawn(forward_frames(frame_rx, ws_tx));

    // 读循环：入站帧路由到注册表，关闭/出错即退出
    while let Some(message) = ws_rx.next().await {
        match message {
            Ok(Message::Text(text)) => state.registry.on_message(&elevator_id, &text).await,
            Ok(Message::Close(_)) => break,
            // Ping/Pong 由协议层自动应答，Binary 帧不在契约内
            Ok(_) => {}
            Err(err) => {
                debug!(target: "lift.api", elevator_id, "websocket read error: {err}");
                break;
            }
        }
    }

    state.registry.on_disconnect(&elevator_id, connection_id).await;
    // 仿真器停止后快照发送端随之关闭，写端任务自然退出
    let _ = writer.await;
}

/// 写端任务：把仿真器的快照帧转发到 WebSocket。
async fn forward_frames(
    mut frame_rx: mpsc::Receiver<String>,
    mut ws_tx: SplitSink<WebSocket, Message>,
) {
    while let Some(frame) = frame_rx.recv().await {
        if ws_tx.send(Message::Text(frame)).await.is_err() {
            // 对端已断开，仿真器下一次 send 会看到 Closed 并自停
            break;
        }
    }
    let _ = ws_tx.close().await;
}
