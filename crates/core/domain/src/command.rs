/// 解码后的远程控制命令。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElevatorCommand {
    /// 指定目标楼层并进入手动模式。
    GotoFloor(i32),
    /// 非运行状态下切换轿门开/关。
    ToggleDoor,
    /// 急停：锁定状态直至恢复命令。
    EmergencyStop,
    /// 从急停恢复为停止 + 自动模式。
    ResumeOperation,
}

impl ElevatorCommand {
    /// 命令种类标记（日志用）。
    pub fn kind(&self) -> &'static str {
        match self {
            Self::GotoFloor(_) => "GOTO_FLOOR",
            Self::ToggleDoor => "TOGGLE_DOOR",
            Self::EmergencyStop => "EMERGENCY_STOP",
            Self::ResumeOperation => "RESUME_OPERATION",
        }
    }
}
