pub mod command;
pub mod state;

pub use command::ElevatorCommand;
pub use state::{Direction, DoorStatus, DriveMode, ElevatorState, RunStatus};
