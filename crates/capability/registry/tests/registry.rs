//! 注册表生命周期与路由行为。

use api_contract::StateFrame;
use async_trait::async_trait;
use lift_registry::{ElevatorRegistry, RegistryError};
use lift_simulator::{SimulatorConfig, SinkError, SnapshotSink};
use std::sync::{Arc, Mutex};
use std::time::Duration;

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

fn registry() -> ElevatorRegistry {
    ElevatorRegistry::new(SimulatorConfig {
        tick_interval: Duration::from_millis(10),
        ..SimulatorConfig::default()
    })
}

#[tokio::test]
async fn connect_disconnect_lifecycle() {
    let registry = registry();
    let sink = Arc::new(CollectorSink::default());

    let token = registry
        .on_connect("EL-001", sink.clone())
        .await
        .expect("connect");
    assert!(registry.is_active("EL-001").await);
    assert_eq!(registry.active_count().await, 1);

    registry.on_disconnect("EL-001", token).await;
    assert!(!registry.is_active("EL-001").await);

    // 仿真器已停：不再有新帧
    let frames_after = sink.frames().len();
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(sink.frames().len(), frames_after);

    // 重复断连是空操作
    registry.on_disconnect("EL-001", token).await;
    assert_eq!(registry.active_count().await, 0);
}

#[tokio::test]
async fn blank_elevator_id_is_rejected() {
    let registry = registry();
    let sink = Arc::new(CollectorSink::default());

    let err = registry.on_connect("  ", sink).await.expect_err("reject");
    assert!(matches!(err, RegistryError::MissingElevatorId));
    assert_eq!(registry.active_count().await, 0);
}

#[tokio::test]
async fn messages_route_to_the_matching_simulator() {
    let registry = registry();
    let sink_a = Arc::new(CollectorSink::default());
    let sink_b = Arc::new(CollectorSink::default());
    let token_a = registry
        .on_connect("EL-A", sink_a.clone())
        .await
        .expect("connect A");
    let token_b = registry
        .on_connect("EL-B", sink_b.clone())
        .await
        .expect("connect B");

    registry
        .on_message("EL-A", r#"{"command":"EMERGENCY_STOP"}"#)
        .await;
    tokio::time::sleep(Duration::from_millis(60)).await;

    let a_stopped = sink_a.frames().iter().any(|frame| {
        serde_json::from_str::<StateFrame>(frame)
            .map(|snapshot| snapshot.status == "EMERGENCY_STOPPED")
            .unwrap_or(false)
    });
    assert!(a_stopped, "EL-A never reported the emergency stop");

    for frame in sink_b.frames() {
        let snapshot: StateFrame = serde_json::from_str(&frame).expect("frame json");
        assert_eq!(snapshot.id, "EL-B");
        assert_ne!(snapshot.status, "EMERGENCY_STOPPED");
    }

    registry.on_disconnect("EL-A", token_a).await;
    registry.on_disconnect("EL-B", token_b).await;
}

#[tokio::test]
async fn bad_frames_do_not_tear_down_the_connection() {
    let registry = registry();
    let sink = Arc::new(CollectorSink::default());
    let token = registry
        .on_connect("EL-001", sink.clone())
        .await
        .expect("connect");

    registry.on_message("EL-001", "not json").await;
    registry
        .on_message("EL-001", r#"{"command":"SELF_DESTRUCT"}"#)
        .await;
    // 未接入的设备：静默丢弃
    registry
        .on_message("EL-404", r#"{"command":"TOGGLE_DOOR"}"#)
        .await;

    assert!(registry.is_active("EL-001").await);
    registry.on_disconnect("EL-001", token).await;
}

#[tokio::test]
async fn reconnect_replaces_the_existing_simulator() {
    let registry = registry();
    let old_sink = Arc::new(CollectorSink::default());
    let new_sink = Arc::new(CollectorSink::default());

    let old_token = registry
        .on_connect("EL-001", old_sink.clone())
        .await
        .expect("first connect");
    let new_token = registry
        .on_connect("EL-001", new_sink.clone())
        .await
        .expect("reconnect");
    assert_eq!(registry.active_count().await, 1);

    // 旧仿真器已停止发射，新仿真器接管
    let old_frames = old_sink.frames().len();
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(old_sink.frames().len(), old_frames);
    assert!(!new_sink.frames().is_empty(), "replacement simulator is silent");

    // 旧连接迟到的断连不能拆掉新仿真器
    registry.on_disconnect("EL-001", old_token).await;
    assert!(registry.is_active("EL-001").await);

    registry.on_disconnect("EL-001", new_token).await;
    assert!(!registry.is_active("EL-001").await);
}
