//! 稳定的帧契约与 API 响应封装。
//!
//! WebSocket 双向帧（入站命令 / 出站状态快照）的编解码都走这里，
//! 核心能力 crate 不直接接触 serde_json 的细节。

use domain::{ElevatorCommand, ElevatorState};
use serde::{Deserialize, Serialize};

/// 帧编解码错误。
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("malformed frame: {0}")]
    Decode(String),
    #[error("unknown command: {0}")]
    UnknownCommand(String),
    #[error("missing floor for GOTO_FLOOR")]
    MissingFloor,
    #[error("encode error: {0}")]
    Encode(String),
}

/// 入站命令帧。
///
/// `floor` 仅 GOTO_FLOOR 需要，其余命令忽略该字段。
#[derive(Debug, Clone, Deserialize)]
pub struct CommandFrame {
    pub command: String,
    #[serde(default)]
    pub floor: Option<i64>,
}

impl CommandFrame {
    /// 解析入站文本帧。
    pub fn decode(raw: &str) -> Result<Self, CodecError> {
        serde_json::from_str(raw).map_err(|err| CodecError::Decode(err.to_string()))
    }

    /// 映射为领域命令；未知命令种类原样返回错误由调用方记录。
    pub fn into_command(self) -> Result<ElevatorCommand, CodecError> {
        match self.command.as_str() {
            "GOTO_FLOOR" => {
                let floor = self.floor.ok_or(CodecError::MissingFloor)?;
                let floor = i32::try_from(floor)
                    .map_err(|_| CodecError::Decode(format!("floor out of range: {floor}")))?;
                Ok(ElevatorCommand::GotoFloor(floor))
            }
            "TOGGLE_DOOR" => Ok(ElevatorCommand::ToggleDoor),
            "EMERGENCY_STOP" => Ok(ElevatorCommand::EmergencyStop),
            "RESUME_OPERATION" => Ok(ElevatorCommand::ResumeOperation),
            other => Err(CodecError::UnknownCommand(other.to_string())),
        }
    }
}

/// 出站状态快照帧。
///
/// 字段顺序与命名对齐前端消费的 JSON 契约；`mode` 与开门时间戳
/// 属于仿真内部状态，不随快照传出。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateFrame {
    pub id: String,
    pub current_floor: f64,
    pub target_floor: i32,
    pub status: String,
    pub door_status: String,
    pub speed: f64,
    pub direction: String,
    pub load_weight: f64,
    pub max_weight: i32,
    pub temperature: f64,
    pub maintenance_status: String,
    pub floor_count: i32,
}

impl StateFrame {
    /// 从领域状态复制出只读快照。
    pub fn from_state(state: &ElevatorState) -> Self {
        Self {
            id: state.id.clone(),
            current_floor: state.current_floor,
            target_floor: state.target_floor,
            status: state.status.as_str().to_string(),
            door_status: state.door_status.as_str().to_string(),
            speed: state.speed,
            direction: state.direction.as_str().to_string(),
            load_weight: state.load_weight,
            max_weight: state.max_weight,
            temperature: state.temperature,
            maintenance_status: state.maintenance_status.clone(),
            floor_count: state.floor_count,
        }
    }

    /// 序列化为出站文本帧。
    pub fn encode(&self) -> Result<String, CodecError> {
        serde_json::to_string(self).map_err(|err| CodecError::Encode(err.to_string()))
    }
}

/// 标准 API 响应封装。
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ApiError>,
}

/// 失败响应的错误体。
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ApiError {
                code: code.into(),
                message: message.into(),
            }),
        }
    }
}

/// 指标快照 DTO（GET /metrics）。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshotDto {
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
