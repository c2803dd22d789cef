//! Actuator command channel.

use std::sync::{Arc, Mutex};

use anyhow::Result;

use crate::control::command::MotionCommand;

/// Outcome of a motion-command send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendStatus {
    /// The channel acknowledged the command.
    Acked,
    /// No acknowledgement in time. The command is stale and must not be
    /// retried; retrying a stale correction compounds overshoot.
    TimedOut,
}

/// Command channel to the vehicle.
///
/// `send` blocks until the channel acknowledges or times out. `land` must
/// be safe to call repeatedly. A returned `Err` from any method means the
/// channel is permanently unavailable; for `send` this forces emergency
/// teardown.
pub trait Actuator: Send {
    fn takeoff(&mut self) -> Result<()>;
    fn land(&mut self) -> Result<()>;
    fn stream_on(&mut self) -> Result<()>;
    fn stream_off(&mut self) -> Result<()>;
    fn send(&mut self, cmd: MotionCommand) -> Result<SendStatus>;
}

/// One recorded actuator interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorCall {
    Takeoff,
    Land,
    StreamOn,
    StreamOff,
    Send(MotionCommand),
}

/// Records every call instead of talking to hardware. Clones share the
/// same log, so a caller can keep a handle for inspection after handing
/// the actuator to the flight system. Used for dry runs and tests.
#[derive(Debug, Clone, Default)]
pub struct RecordingActuator {
    calls: Arc<Mutex<Vec<ActuatorCall>>>,
}

impl RecordingActuator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the calls recorded so far.
    pub fn calls(&self) -> Vec<ActuatorCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: ActuatorCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl Actuator for RecordingActuator {
    fn takeoff(&mut self) -> Result<()> {
        self.record(ActuatorCall::Takeoff);
        Ok(())
    }

    fn land(&mut self) -> Result<()> {
        self.record(ActuatorCall::Land);
        Ok(())
    }

    fn stream_on(&mut self) -> Result<()> {
        self.record(ActuatorCall::StreamOn);
        Ok(())
    }

    fn stream_off(&mut self) -> Result<()> {
        self.record(ActuatorCall::StreamOff);
        Ok(())
    }

    fn send(&mut self, cmd: MotionCommand) -> Result<SendStatus> {
        self.record(ActuatorCall::Send(cmd));
        Ok(SendStatus::Acked)
    }
}
