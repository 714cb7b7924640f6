//! 单梯仿真能力。
//!
//! 每台接入的电梯由一个独立的 tokio 任务驱动：任务独占持有
//! `ElevatorState`，在固定周期 tick 与入站命令之间 `select!`，
//! 所有状态读写与快照发射都串行经过这一个执行上下文，彼此之间
//! 不需要锁。快照通过 `SnapshotSink` 抽象下发，传输层自行适配。

pub mod engine;

use api_contract::StateFrame;
use async_trait::async_trait;
use domain::{ElevatorCommand, ElevatorState};
use lift_telemetry::{
    record_command_applied, record_snapshot_send_failure, record_snapshot_sent, record_tick,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

/// 命令通道容量。
const COMMAND_BUFFER: usize = 16;

/// 仿真参数。
#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    /// tick 周期。
    pub tick_interval: Duration,
    /// 开门保持时长。
    pub door_hold: Duration,
    /// 楼层总数。
    pub floor_count: i32,
    /// 额定载重（kg）。
    pub max_weight: i32,
    /// 自动巡航速度（层/秒）。
    pub auto_speed: f64,
    /// 手动导航速度（层/秒）。
    pub manual_speed: f64,
    /// 关门后随机载重的上界（不含）。
    pub load_weight_ceiling: u32,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(150),
            door_hold: Duration::from_millis(2000),
            floor_count: 15,
            max_weight: 1000,
            auto_speed: 0.5,
            manual_speed: 0.8,
            load_weight_ceiling: 800,
        }
    }
}

/// 快照下发错误。
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    /// 传输已关闭，后续发送不可能成功。
    #[error("transport closed")]
    Closed,
    /// 单次发送失败，传输可能仍然可用。
    #[error("send failed: {0}")]
    Send(String),
}

/// 快照下发抽象：仿真任务只关心"把一帧文本交给传输层"。
#[async_trait]
pub trait SnapshotSink: Send + Sync {
    async fn send(&self, frame: String) -> Result<(), SinkError>;
}

enum SimulatorMsg {
    Command(ElevatorCommand),
    Stop,
}

/// 可克隆的命令入口；互不阻塞注册表锁。
#[derive(Clone)]
pub struct CommandHandle {
    tx: mpsc::Sender<SimulatorMsg>,
}

impl CommandHandle {
    /// 投递一条命令；仿真任务已结束时返回 false。
    pub async fn apply(&self, command: ElevatorCommand) -> bool {
        self.tx.send(SimulatorMsg::Command(command)).await.is_ok()
    }
}

/// 运行中仿真任务的句柄。
pub struct SimulatorHandle {
    elevator_id: String,
    tx: mpsc::Sender<SimulatorMsg>,
    join: JoinHandle<()>,
}

impl SimulatorHandle {
    pub fn elevator_id(&self) -> &str {
        &self.elevator_id
    }

    /// 克隆命令入口。
    pub fn commands(&self) -> CommandHandle {
        CommandHandle {
            tx: self.tx.clone(),
        }
    }

    /// 仿真任务是否已自行结束（例如传输关闭后自停）。
    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// 停止仿真并等待任务退出。
    ///
    /// 返回后保证不再有任何 tick 或命令被处理，也不再发射快照。
    pub async fn stop(self) {
        // 任务可能已自停并关闭通道，发送失败可忽略
        let _ = self.tx.send(SimulatorMsg::Stop).await;
        let _ = self.join.await;
    }
}

/// 启动一台电梯的仿真任务，立即开始按周期发射快照。
pub fn spawn_simulator(
    elevator_id: impl Into<String>,
    config: SimulatorConfig,
    sink: Arc<dyn SnapshotSink>,
) -> SimulatorHandle {
    let elevator_id = elevator_id.into();
    let state = ElevatorState::new(elevator_id.clone(), config.floor_count, config.max_weight);
    let (tx, rx) = mpsc::channel(COMMAND_BUFFER);
    let join = tokio::spawn(run_simulator(state, config, sink, rx));
    SimulatorHandle {
        elevator_id,
        tx,
        join,
    }
}

/// 仿真主循环：同一任务内串行处理 tick 与命令。
async fn run_simulator(
    mut state: ElevatorState,
    config: SimulatorConfig,
    sink: Arc<dyn SnapshotSink>,
    mut rx: mpsc::Receiver<SimulatorMsg>,
) {
    let mut rng = StdRng::from_entropy();
    let mut ticker = tokio::time::interval(config.tick_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    info!(target: "lift.sim", elevator_id = %state.id, "simulator started");

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                engine::advance_tick(&mut state, &config, &mut rng, Instant::now());
                record_tick();
                if !emit_snapshot(&state, sink.as_ref()).await {
                    break;
                }
            }
            msg = rx.recv() => match msg {
                Some(SimulatorMsg::Command(command)) => {
                    debug!(
                        target: "lift.sim",
                        elevator_id = %state.id,
                        command = command.kind(),
                        "applying command"
                    );
                    engine::apply_command(&mut state, command, Instant::now());
                    record_command_applied();
                    // 命令生效后立刻发快照，客户端无需等下一个 tick
                    if !emit_snapshot(&state, sink.as_ref()).await {
                        break;
                    }
                }
                Some(SimulatorMsg::Stop) | None => break,
            },
        }
    }

    info!(target: "lift.sim", elevator_id = %state.id, "simulator stopped");
}

/// 发射一帧快照；返回 false 表示传输已确认关闭，仿真应当自停。
async fn emit_snapshot(state: &ElevatorState, sink: &dyn SnapshotSink) -> bool {
    let frame = match StateFrame::from_state(state).encode() {
        Ok(frame) => frame,
        Err(err) => {
            // 编码失败只丢掉本帧，不中断 tick 循环
            error!(target: "lift.sim", elevator_id = %state.id, "snapshot encode failed: {err}");
            return true;
        }
    };

    match sink.send(frame).await {
        Ok(()) => {
            record_snapshot_sent();
            true
        }
        Err(SinkError::Closed) => {
            record_snapshot_send_failure();
            info!(
                target: "lift.sim",
                elevator_id = %state.id,
                "transport closed, stopping simulator"
            );
            false
        }
        Err(SinkError::Send(err)) => {
            record_snapshot_send_failure();
            warn!(target: "lift.sim", elevator_id = %state.id, "snapshot send failed: {err}");
            true
        }
    }
}
