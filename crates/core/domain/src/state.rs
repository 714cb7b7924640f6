use std::time::Instant;

/// 电梯运行状态。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Stopped,
    Running,
    EmergencyStopped,
}

impl RunStatus {
    /// 出站快照使用的状态标记。
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stopped => "STOPPED",
            Self::Running => "RUNNING",
            Self::EmergencyStopped => "EMERGENCY_STOPPED",
        }
    }
}

/// 轿门状态。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoorStatus {
    Open,
    Closed,
}

impl DoorStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::Closed => "CLOSED",
        }
    }
}

/// 运行方向。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    None,
    Up,
    Down,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Up => "UP",
            Self::Down => "DOWN",
        }
    }

    /// 从当前位置指向目标楼层的方向。
    pub fn toward(current_floor: f64, target_floor: i32) -> Self {
        if f64::from(target_floor) > current_floor {
            Self::Up
        } else {
            Self::Down
        }
    }
}

/// 导航模式：自动巡航或用户指定目标。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriveMode {
    Auto,
    Manual,
}

impl DriveMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "AUTO",
            Self::Manual => "MANUAL",
        }
    }
}

/// 单台电梯的完整状态。
///
/// 由唯一一个仿真任务独占持有；仅该任务的 tick 或命令处理可修改，
/// 对外只以只读快照的形式复制传出。
#[derive(Debug, Clone)]
pub struct ElevatorState {
    /// 设备标识，创建后不可变。
    pub id: String,
    /// 连续位置，1.0..=floor_count。
    pub current_floor: f64,
    /// 目标楼层，1..=floor_count。
    pub target_floor: i32,
    /// 楼层总数，创建时固定。
    pub floor_count: i32,
    pub status: RunStatus,
    pub door_status: DoorStatus,
    /// 当前标量速度，停止时为 0。
    pub speed: f64,
    pub direction: Direction,
    /// 模拟轿厢载重，0..max_weight。
    pub load_weight: f64,
    /// 额定载重，创建时固定。
    pub max_weight: i32,
    /// 缓慢漂移的环境温度读数，限定在 [20.0, 30.0]。
    pub temperature: f64,
    /// 静态维保信息。
    pub maintenance_status: String,
    pub mode: DriveMode,
    /// 本次开门周期的起始时刻；关门时为 None。
    pub door_opened_at: Option<Instant>,
}

impl ElevatorState {
    /// 构造初始状态：1 层停靠、关门、自动模式。
    pub fn new(id: impl Into<String>, floor_count: i32, max_weight: i32) -> Self {
        Self {
            id: id.into(),
            current_floor: 1.0,
            target_floor: 1,
            floor_count,
            status: RunStatus::Stopped,
            door_status: DoorStatus::Closed,
            speed: 0.0,
            direction: Direction::None,
            load_weight: 0.0,
            max_weight,
            temperature: 22.5,
            maintenance_status: "NORMAL".to_string(),
            mode: DriveMode::Auto,
            door_opened_at: None,
        }
    }

    /// 当前位置对应的整数楼层（截断，与目标楼层比较用）。
    pub fn floor_index(&self) -> i32 {
        self.current_floor as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_is_parked_at_first_floor() {
        let state = ElevatorState::new("EL-001", 15, 1000);
        assert_eq!(state.current_floor, 1.0);
        assert_eq!(state.target_floor, 1);
        assert_eq!(state.status, RunStatus::Stopped);
        assert_eq!(state.door_status, DoorStatus::Closed);
        assert_eq!(state.mode, DriveMode::Auto);
        assert!(state.door_opened_at.is_none());
    }

    #[test]
    fn direction_toward_matches_target_sign() {
        assert_eq!(Direction::toward(3.0, 10), Direction::Up);
        assert_eq!(Direction::toward(8.0, 2), Direction::Down);
    }
}
