//! Feedback control: per-axis PID, motion-command mapping, and the
//! command-rate gate.

pub mod command;
pub mod gate;
pub mod pid;

pub use command::{Axis, Direction, MotionCommand};
pub use gate::CommandGate;
pub use pid::AxisPid;
