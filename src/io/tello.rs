//! UDP command channel for Tello-class quadcopters.
//!
//! The vehicle speaks a plain-text SDK: each command is a single ASCII
//! datagram (`command`, `takeoff`, `land`, `streamon`, `streamoff`,
//! `left 20`, ...) answered with `ok` or `error ...`. A missing reply is a
//! timeout; a rejecting reply is treated the same way — transient, logged,
//! never retried.

use std::io::ErrorKind;
use std::net::UdpSocket;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use tracing::{debug, warn};

use crate::control::command::MotionCommand;
use crate::io::actuator::{Actuator, SendStatus};

/// Default command address of a Tello on its own access point.
pub const DEFAULT_ADDR: &str = "192.168.10.1:8889";

/// Smallest move distance the vehicle accepts, in cm. Non-zero magnitudes
/// below this are raised to it rather than dropped.
const MIN_MOVE_CM: i32 = 20;

/// How long to wait for a reply before declaring a timeout. Takeoff and
/// landing answer only after the maneuver settles, hence the generous
/// bound.
const RESPONSE_TIMEOUT: Duration = Duration::from_secs(7);

pub struct TelloActuator {
    socket: UdpSocket,
}

impl TelloActuator {
    /// Bind a local socket and switch the vehicle into SDK command mode.
    pub fn connect(addr: &str) -> Result<Self> {
        let socket = UdpSocket::bind("0.0.0.0:0").context("binding command socket")?;
        socket
            .connect(addr)
            .with_context(|| format!("connecting command channel to {addr}"))?;
        socket
            .set_read_timeout(Some(RESPONSE_TIMEOUT))
            .context("configuring command channel timeout")?;

        let mut this = Self { socket };
        match this.exchange("command")? {
            SendStatus::Acked => Ok(this),
            SendStatus::TimedOut => bail!("vehicle did not enter command mode"),
        }
    }

    /// Send one SDK command and wait for its reply.
    fn exchange(&mut self, cmd: &str) -> Result<SendStatus> {
        debug!(command = cmd, "sdk send");
        self.socket
            .send(cmd.as_bytes())
            .context("command channel send failed")?;

        let mut buf = [0u8; 1024];
        match self.socket.recv(&mut buf) {
            Ok(n) => {
                let reply = String::from_utf8_lossy(&buf[..n]);
                let reply = reply.trim();
                if reply.eq_ignore_ascii_case("ok") {
                    Ok(SendStatus::Acked)
                } else {
                    warn!(command = cmd, %reply, "vehicle rejected command");
                    Ok(SendStatus::TimedOut)
                }
            }
            Err(e) if e.kind() == ErrorKind::WouldBlock || e.kind() == ErrorKind::TimedOut => {
                Ok(SendStatus::TimedOut)
            }
            Err(e) => Err(e).context("command channel receive failed"),
        }
    }

    /// Run a non-motion command, surfacing a timeout as an error the
    /// caller can report.
    fn exchange_required(&mut self, cmd: &str) -> Result<()> {
        match self.exchange(cmd)? {
            SendStatus::Acked => Ok(()),
            SendStatus::TimedOut => bail!("`{cmd}` was not acknowledged"),
        }
    }
}

impl Actuator for TelloActuator {
    fn takeoff(&mut self) -> Result<()> {
        self.exchange_required("takeoff")
    }

    fn land(&mut self) -> Result<()> {
        // The vehicle answers `ok` to `land` on the ground too, so
        // repeated calls are safe.
        self.exchange_required("land")
    }

    fn stream_on(&mut self) -> Result<()> {
        self.exchange_required("streamon")
    }

    fn stream_off(&mut self) -> Result<()> {
        self.exchange_required("streamoff")
    }

    fn send(&mut self, cmd: MotionCommand) -> Result<SendStatus> {
        let distance = cmd.magnitude.clamp(MIN_MOVE_CM, 100);
        let wire = format!("{} {}", cmd.heading(), distance);
        self.exchange(&wire)
    }
}
