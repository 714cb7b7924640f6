use lift_config::{AppConfig, ConfigError};
use std::sync::Mutex;

// 两个用例都会改写进程级环境变量，串行执行避免互相干扰。
static ENV_LOCK: Mutex<()> = Mutex::new(());

#[test]
fn load_config_defaults_and_overrides() {
    let _guard = ENV_LOCK.lock().expect("env lock");
    // Rust 2024 中 set_var 需要显式标注 unsafe（测试进程内可控）。
    unsafe {
        std::env::set_var("LIFT_HTTP_ADDR", "127.0.0.1:8081");
        std::env::set_var("LIFT_TICK_INTERVAL_MS", "100");
        std::env::remove_var("LIFT_DOOR_HOLD_MS");
        std::env::remove_var("LIFT_FLOOR_COUNT");
        std::env::remove_var("LIFT_MAX_WEIGHT");
    }

    let config = AppConfig::from_env().expect("config");
    assert_eq!(config.http_addr, "127.0.0.1:8081");
    assert_eq!(config.tick_interval_ms, 100);
    assert_eq!(config.door_hold_ms, 2000);
    assert_eq!(config.floor_count, 15);
    assert_eq!(config.max_weight, 1000);

    unsafe {
        std::env::remove_var("LIFT_TICK_INTERVAL_MS");
    }
}

#[test]
fn zero_tick_interval_is_rejected() {
    let _guard = ENV_LOCK.lock().expect("env lock");
    unsafe {
        std::env::set_var("LIFT_TICK_INTERVAL_MS", "0");
    }
    let err = AppConfig::from_env().expect_err("zero interval");
    assert!(matches!(err, ConfigError::Invalid(key, _) if key == "LIFT_TICK_INTERVAL_MS"));
    unsafe {
        std::env::remove_var("LIFT_TICK_INTERVAL_MS");
    }
}
