//! 应用运行配置加载。

use std::env;

/// 配置加载错误。
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required env: {0}")]
    Missing(String),
    #[error("invalid value for {0}: {1}")]
    Invalid(String, String),
}

/// 应用运行配置。
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub http_addr: String,
    /// 仿真 tick 周期（毫秒）。
    pub tick_interval_ms: u64,
    /// 开门保持时长（毫秒），超时自动关门。
    pub door_hold_ms: u64,
    /// 楼层总数。
    pub floor_count: i32,
    /// 额定载重（kg）。
    pub max_weight: i32,
}

impl AppConfig {
    /// 从环境变量读取配置；所有键都有默认值，可零配置启动。
    pub fn from_env() -> Result<Self, ConfigError> {
        let http_addr = env::var("LIFT_HTTP_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
        let tick_interval_ms = read_u64_with_default("LIFT_TICK_INTERVAL_MS", 150)?;
        let door_hold_ms = read_u64_with_default("LIFT_DOOR_HOLD_MS", 2000)?;
        let floor_count = read_i32_with_default("LIFT_FLOOR_COUNT", 15)?;
        let max_weight = read_i32_with_default("LIFT_MAX_WEIGHT", 1000)?;

        if tick_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "LIFT_TICK_INTERVAL_MS".to_string(),
                "0".to_string(),
            ));
        }
        if floor_count < 2 {
            return Err(ConfigError::Invalid(
                "LIFT_FLOOR_COUNT".to_string(),
                floor_count.to_string(),
            ));
        }

        Ok(Self {
            http_addr,
            tick_interval_ms,
            door_hold_ms,
            floor_count,
            max_weight,
        })
    }
}

fn read_u64_with_default(key: &str, default: u64) -> Result<u64, ConfigError> {
    let value = match env::var(key) {
        Ok(value) => value,
        Err(_) => return Ok(default),
    };
    value
        .parse::<u64>()
        .map_err(|_| ConfigError::Invalid(key.to_string(), value))
}

fn read_i32_with_default(key: &str, default: i32) -> Result<i32, ConfigError> {
    let value = match env::var(key) {
        Ok(value) => value,
        Err(_) => return Ok(default),
    };
    value
        .parse::<i32>()
        .map_err(|_| ConfigError::Invalid(key.to_string(), value))
}
