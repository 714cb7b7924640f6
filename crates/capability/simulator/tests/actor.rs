//! 仿真任务（actor）层行为：周期发射、命令即时生效、自停与停止保证。

use api_contract::StateFrame;
use async_trait::async_trait;
use domain::ElevatorCommand;
use lift_simulator::{SimulatorConfig, SinkError, SnapshotSink, spawn_simulator};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// 收集所有出站帧的测试 sink。
#[derive(Default)]
struct CollectorSink {
    frames: Mutex<Vec<String>>,
}

impl CollectorSink {
    fn frames(&self) -> Vec<String> {
        self.frames.lock().expect("frames lock").clone()
    }
}

#[async_trait]
impl SnapshotSink for CollectorSink {
    async fn send(&self, frame: String) -> Result<(), SinkError> {
        self.frames.lock().expect("frames lock").push(frame);
        Ok(())
    }
}

/// 始终报告传输已关闭的 sink。
struct ClosedSink;

#[async_trait]
impl SnapshotSink for ClosedSink {
    async fn send(&self, _frame: String) -> Result<(), SinkError> {
        Err(SinkError::Closed)
    }
}

fn fast_config() -> SimulatorConfig {
    SimulatorConfig {
        tick_interval: Duration::from_millis(10),
        ..SimulatorConfig::default()
    }
}

#[tokio::test]
async fn ticks_emit_snapshots_periodically() {
    let sink = Arc::new(CollectorSink::default());
    let handle = spawn_simulator("EL-001", fast_config(), sink.clone());

    tokio::time::sleep(Duration::from_millis(100)).await;
    let frames = sink.frames();
    assert!(frames.len() >= 3, "expected several frames, got {}", frames.len());

    let snapshot: StateFrame = serde_json::from_str(&frames[0]).expect("frame json");
    assert_eq!(snapshot.id, "EL-001");
    assert_eq!(snapshot.floor_count, 15);

    handle.stop().await;
}

#[tokio::test]
async fn command_effect_is_visible_without_waiting_for_a_tick() {
    let sink = Arc::new(CollectorSink::default());
    let handle = spawn_simulator("EL-002", fast_config(), sink.clone());

    let commands = handle.commands();
    assert!(commands.apply(ElevatorCommand::GotoFloor(10)).await);

    tokio::time::sleep(Duration::from_millis(80)).await;
    let frames = sink.frames();
    let targeted = frames.iter().any(|frame| {
        serde_json::from_str::<StateFrame>(frame)
            .map(|snapshot| snapshot.target_floor == 10)
            .unwrap_or(false)
    });
    assert!(targeted, "no snapshot reflected the GOTO_FLOOR command");

    handle.stop().await;
}

#[tokio::test]
async fn stop_guarantees_no_further_emission() {
    let sink = Arc::new(CollectorSink::default());
    let handle = spawn_simulator("EL-003", fast_config(), sink.clone());

    tokio::time::sleep(Duration::from_millis(50)).await;
    let commands = handle.commands();
    handle.stop().await;

    let after_stop = sink.frames().len();
    tokio::time::sleep(Duration::from_millis(60)).await;
    assert_eq!(sink.frames().len(), after_stop);

    // 停止后的命令投递失败而非悬挂
    assert!(!commands.apply(ElevatorCommand::ToggleDoor).await);
}

#[tokio::test]
async fn simulator_self_stops_when_transport_is_closed() {
    let handle = spawn_simulator("EL-004", fast_config(), Arc::new(ClosedSink));

    tokio::time::sleep(Duration::from_millis(60)).await;
    assert!(handle.is_finished(), "simulator should stop on closed sink");

    // 自停之后 stop 仍然安全
    handle.stop().await;
}

#[tokio::test]
async fn two_simulators_do_not_share_state() {
    let sink_a = Arc::new(CollectorSink::default());
    let sink_b = Arc::new(CollectorSink::default());
    // B 只有 5 层，A 的 12 层命令若串线会立刻破坏 B 的楼层边界
    let config_b = SimulatorConfig {
        floor_count: 5,
        ..fast_config()
    };
    let handle_a = spawn_simulator("EL-A", fast_config(), sink_a.clone());
    let handle_b = spawn_simulator("EL-B", config_b, sink_b.clone());

    assert!(handle_a.commands().apply(ElevatorCommand::GotoFloor(12)).await);
    tokio::time::sleep(Duration::from_millis(80)).await;

    for frame in sink_a.frames() {
        let snapshot: StateFrame = serde_json::from_str(&frame).expect("frame json");
        assert_eq!(snapshot.id, "EL-A");
    }
    for frame in sink_b.frames() {
        let snapshot: StateFrame = serde_json::from_str(&frame).expect("frame json");
        assert_eq!(snapshot.id, "EL-B");
        assert!(snapshot.target_floor <= 5, "EL-B observed EL-A's command");
    }

    handle_a.stop().await;
    handle_b.stop().await;
}
