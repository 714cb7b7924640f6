//! 仿真状态机：tick 推进与命令应用的纯转移逻辑。
//!
//! 所有函数都显式接收时钟（`now`）与随机源，仿真任务之外
//! 可以用种子 rng 和构造的时间点做确定性验证。

use crate::SimulatorConfig;
use domain::{Direction, DoorStatus, DriveMode, ElevatorCommand, ElevatorState, RunStatus};
use rand::Rng;
use std::time::Instant;
use tracing::debug;

/// 环境温度下限（摄氏度）。
const TEMP_MIN: f64 = 20.0;
/// 环境温度上限（摄氏度）。
const TEMP_MAX: f64 = 30.0;
/// 单次 tick 温度漂移幅度。
const TEMP_DRIFT: f64 = 0.1;

/// 应用一条外部命令。
///
/// 命令可在任意状态下到达，包括运行途中；未知命令在解码层已被
/// 拒绝，这里只处理合法的领域命令。
pub fn apply_command(
    state: &mut ElevatorState,
    command: ElevatorCommand,
    now: Instant,
) {
    match command {
        ElevatorCommand::GotoFloor(floor) => {
            // 越界楼层收敛到 [1, floor_count]
            let clamped = floor.clamp(1, state.floor_count);
            if clamped != floor {
                debug!(
                    target: "lift.sim",
                    elevator_id = %state.id,
                    requested = floor,
                    clamped,
                    "goto floor clamped to bounds"
                );
            }
            state.mode = DriveMode::Manual;
            state.target_floor = clamped;
        }
        ElevatorCommand::ToggleDoor => {
            // 运行中禁止开关门
            if state.status != RunStatus::Running {
                match state.door_status {
                    DoorStatus::Open => {
                        state.door_status = DoorStatus::Closed;
                        state.door_opened_at = None;
                    }
                    DoorStatus::Closed => {
                        state.door_status = DoorStatus::Open;
                        state.door_opened_at = Some(now);
                    }
                }
            }
        }
        ElevatorCommand::EmergencyStop => {
            state.mode = DriveMode::Manual;
            state.status = RunStatus::EmergencyStopped;
            state.speed = 0.0;
        }
        ElevatorCommand::ResumeOperation => {
            // 仅从急停态恢复；其他状态下该命令无意义
            if state.status == RunStatus::EmergencyStopped {
                state.status = RunStatus::Stopped;
                state.direction = Direction::None;
                state.mode = DriveMode::Auto;
            }
        }
    }
}

/// 推进一个仿真 tick。
pub fn advance_tick(
    state: &mut ElevatorState,
    config: &SimulatorConfig,
    rng: &mut impl Rng,
    now: Instant,
) {
    drift_temperature(state, rng);

    match state.status {
        RunStatus::Running => advance_motion(state, config, now),
        RunStatus::Stopped => match state.door_status {
            DoorStatus::Open => hold_or_close_door(state, config, rng, now),
            DoorStatus::Closed => plan_next_leg(state, config, rng),
        },
        // 急停态只保留温度漂移，不做任何运动/门逻辑
        RunStatus::EmergencyStopped => {}
    }
}

/// 温度缓慢漂移：±0.1 / tick，限定 [20.0, 30.0]，保留 1 位小数。
fn drift_temperature(state: &mut ElevatorState, rng: &mut impl Rng) {
    let delta = rng.gen_range(-TEMP_DRIFT..=TEMP_DRIFT);
    let drifted = (state.temperature + delta).clamp(TEMP_MIN, TEMP_MAX);
    state.temperature = (drifted * 10.0).round() / 10.0;
}

/// 运行中：按当前速度向目标楼层推进，到达或越过即停靠。
fn advance_motion(state: &mut ElevatorState, config: &SimulatorConfig, now: Instant) {
    let step = state.speed * config.tick_interval.as_secs_f64();
    let target = f64::from(state.target_floor);

    match state.direction {
        Direction::Up => {
            state.current_floor += step;
            if state.current_floor >= target {
                state.current_floor = target;
                arrive(state, now);
            } else {
                state.door_status = DoorStatus::Closed;
            }
        }
        _ => {
            state.current_floor -= step;
            if state.current_floor <= target {
                state.current_floor = target;
                arrive(state, now);
            } else {
                state.door_status = DoorStatus::Closed;
            }
        }
    }
}

/// 停靠子流程：开门并回到自动模式。
fn arrive(state: &mut ElevatorState, now: Instant) {
    state.status = RunStatus::Stopped;
    state.direction = Direction::None;
    state.speed = 0.0;
    state.door_status = DoorStatus::Open;
    state.door_opened_at = Some(now);
    state.mode = DriveMode::Auto;
}

/// 开门保持：超过保持时长即关门并重置载重。
fn hold_or_close_door(
    state: &mut ElevatorState,
    config: &SimulatorConfig,
    rng: &mut impl Rng,
    now: Instant,
) {
    match state.door_opened_at {
        // 门被外部路径打开而未记录时刻，从本 tick 起计时
        None => state.door_opened_at = Some(now),
        Some(opened_at) => {
            if now.duration_since(opened_at) >= config.door_hold {
                state.door_status = DoorStatus::Closed;
                state.load_weight = f64::from(rng.gen_range(0..config.load_weight_ceiling));
                state.door_opened_at = None;
            }
        }
    }
}

/// 门已关、停止中：决定下一段行程。
fn plan_next_leg(state: &mut ElevatorState, config: &SimulatorConfig, rng: &mut impl Rng) {
    state.door_opened_at = None;
    match state.mode {
        DriveMode::Auto => {
            // 自动巡航：随机挑选目标楼层
            let target = rng.gen_range(1..=state.floor_count);
            state.target_floor = target;
            if target != state.floor_index() {
                state.direction = Direction::toward(state.current_floor, target);
                state.status = RunStatus::Running;
                state.speed = config.auto_speed;
            }
        }
        DriveMode::Manual => {
            if state.target_floor != state.floor_index() {
                state.direction = Direction::toward(state.current_floor, state.target_floor);
                state.status = RunStatus::Running;
                state.speed = config.manual_speed;
            } else {
                // 已在用户目标楼层，恢复自动模式
                state.mode = DriveMode::Auto;
            }
        }
    }
}
