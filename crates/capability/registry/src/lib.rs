//! 连接注册能力：设备 ID → 活跃仿真器的唯一事实来源。
//!
//! 注册表把传输层的生命周期事件（建连/入站帧/断连）路由到对应的
//! 仿真任务。内部的映射表是整个系统里唯一被多个执行上下文共享的
//! 资源，插入/查找/移除都在一把异步锁内完成；命令投递走克隆出的
//! `CommandHandle`，绝不持锁跨 await 发送。

use api_contract::{CodecError, CommandFrame};
use lift_simulator::{SimulatorConfig, SimulatorHandle, SnapshotSink, spawn_simulator};
use lift_telemetry::{
    record_command_unknown, record_connection_closed, record_connection_opened,
    record_connection_rejected, record_connection_replaced, record_frame_decode_failed,
    record_frame_received,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// 连接建立错误。
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// 路径中缺失或空白的设备 ID，连接应以 bad data 关闭。
    #[error("missing elevator id")]
    MissingElevatorId,
}

struct Entry {
    /// 本次连接的令牌；断连只清理令牌匹配的条目，
    /// 避免被替换的旧连接拆掉新仿真器。
    connection_id: Uuid,
    handle: SimulatorHandle,
}

/// 电梯连接注册表。
pub struct ElevatorRegistry {
    config: SimulatorConfig,
    entries: Mutex<HashMap<String, Entry>>,
}

impl ElevatorRegistry {
    pub fn new(config: SimulatorConfig) -> Self {
        Self {
            config,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// 建连：为该设备启动一个仿真器并登记。
    ///
    /// 同一 ID 已有活跃仿真器时执行替换：新仿真器入表，被顶掉的
    /// 旧仿真器停止。返回本次连接的令牌，断连时带回。
    pub async fn on_connect(
        &self,
        elevator_id: &str,
        sink: Arc<dyn SnapshotSink>,
    ) -> Result<Uuid, RegistryError> {
        let elevator_id = elevator_id.trim();
        if elevator_id.is_empty() {
            record_connection_rejected();
            return Err(RegistryError::MissingElevatorId);
        }

        let connection_id = Uuid::new_v4();
        let handle = spawn_simulator(elevator_id, self.config.clone(), sink);
        let displaced = {
            let mut entries = self.entries.lock().await;
            entries.insert(
                elevator_id.to_string(),
                Entry {
                    connection_id,
                    handle,
                },
            )
        };

        record_connection_opened();
        info!(
            target: "lift.registry",
            elevator_id,
            connection_id = %connection_id,
            "elevator connected"
        );

        if let Some(old) = displaced {
            record_connection_replaced();
            info!(
                target: "lift.registry",
                elevator_id,
                "reconnect replaces existing simulator"
            );
            old.handle.stop().await;
        }

        Ok(connection_id)
    }

    /// 入站帧：解码为命令并投递给对应仿真器。
    ///
    /// 解码失败或未知命令只记录并丢帧，连接保持打开；
    /// 没有对应仿真器时静默丢弃。
    pub async fn on_message(&self, elevator_id: &str, raw: &str) {
        record_frame_received();

        let command = match CommandFrame::decode(raw).and_then(CommandFrame::into_command) {
            Ok(command) => command,
            Err(CodecError::UnknownCommand(kind)) => {
                record_command_unknown();
                warn!(target: "lift.registry", elevator_id, kind, "unknown command dropped");
                return;
            }
            Err(err) => {
                record_frame_decode_failed();
                warn!(target: "lift.registry", elevator_id, "inbound frame dropped: {err}");
                return;
            }
        };

        let commands = {
            let entries = self.entries.lock().await;
            entries.get(elevator_id).map(|entry| entry.handle.commands())
        };

        match commands {
            Some(commands) => {
                if !commands.apply(command).await {
                    debug!(
                        target: "lift.registry",
                        elevator_id,
                        "simulator already stopped, command dropped"
                    );
                }
            }
            None => {
                debug!(
                    target: "lift.registry",
                    elevator_id,
                    "no active simulator, frame dropped"
                );
            }
        }
    }

    /// 断连：移除并停止对应仿真器；条目缺失或令牌不匹配时为空操作。
    pub async fn on_disconnect(&self, elevator_id: &str, connection_id: Uuid) {
        let removed = {
            let mut entries = self.entries.lock().await;
            let owns_entry = entries
                .get(elevator_id)
                .is_some_and(|entry| entry.connection_id == connection_id);
            if owns_entry {
                entries.remove(elevator_id)
            } else {
                None
            }
        };

        match removed {
            Some(entry) => {
                entry.handle.stop().await;
                record_connection_closed();
                info!(target: "lift.registry", elevator_id, "elevator disconnected");
            }
            None => {
                debug!(
                    target: "lift.registry",
                    elevator_id,
                    "disconnect for inactive connection ignored"
                );
            }
        }
    }

    /// 该设备当前是否有活跃仿真器。
    pub async fn is_active(&self, elevator_id: &str) -> bool {
        self.entries.lock().await.contains_key(elevator_id)
    }

    /// 活跃仿真器数量。
    pub async fn active_count(&self) -> usize {
        self.entries.lock().await.len()
    }
}
