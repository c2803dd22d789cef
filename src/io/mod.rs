//! External collaborators: frame acquisition and the actuator command
//! channel, behind traits so live hardware and test doubles are
//! interchangeable.

pub mod actuator;
pub mod source;
pub mod tello;

pub use actuator::{Actuator, ActuatorCall, RecordingActuator, SendStatus};
pub use source::{FrameSource, ReplaySource, VideoSource};
pub use tello::TelloActuator;
