//! Flight session orchestration: the state machine around the tracking
//! loop, and the loop driver itself.
//!
//! `FlightSystem` owns the injected collaborators (frame source, actuator
//! channel) plus the tracker, and is the only place that issues actuator
//! commands. While tracking is active the loop has exclusive use of the
//! command channel; stop requests are observed between iterations only.

use std::sync::Arc;

use anyhow::{Context, Result};
use crossbeam_channel::Sender;
use tracing::{error, info, warn};

use crate::io::actuator::{Actuator, SendStatus};
use crate::io::source::FrameSource;
use crate::system::messages::TrackingSnapshot;
use crate::system::shared_state::SharedState;
use crate::system::state::FlightState;
use crate::tracking::result::LoopEnd;
use crate::tracking::tracker::Tracker;

/// Console-level commands accepted by the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlightCommand {
    Takeoff,
    Start,
    Land,
    Exit,
}

/// Top-level flight session.
pub struct FlightSystem {
    state: FlightState,
    /// `None` once the capture device has been released in teardown.
    source: Option<Box<dyn FrameSource>>,
    actuator: Box<dyn Actuator>,
    tracker: Tracker,
    shared: Arc<SharedState>,
    /// Observer channel; snapshots are dropped when the consumer lags.
    snapshots: Option<Sender<TrackingSnapshot>>,
    torn_down: bool,
}

impl FlightSystem {
    pub fn new(source: Box<dyn FrameSource>, actuator: Box<dyn Actuator>, tracker: Tracker) -> Self {
        Self {
            state: FlightState::default(),
            source: Some(source),
            actuator,
            tracker,
            shared: SharedState::new(),
            snapshots: None,
            torn_down: false,
        }
    }

    /// Attach an observer channel notified after every loop iteration.
    pub fn with_snapshots(mut self, tx: Sender<TrackingSnapshot>) -> Self {
        self.snapshots = Some(tx);
        self
    }

    /// Flags shared with observer threads (stop/quit signalling).
    pub fn shared(&self) -> Arc<SharedState> {
        self.shared.clone()
    }

    pub fn state(&self) -> FlightState {
        self.state
    }

    /// Apply one console command. Returns `false` once `exit` has been
    /// handled and the session is torn down. An `Err` means the actuator
    /// channel failed permanently; teardown has already run and the
    /// process should exit non-zero.
    pub fn handle(&mut self, cmd: FlightCommand) -> Result<bool> {
        if self.torn_down {
            warn!("session closed, ignoring {cmd:?}");
            return Ok(false);
        }
        match cmd {
            FlightCommand::Takeoff => self.takeoff(),
            FlightCommand::Start => self.start()?,
            FlightCommand::Land => self.land(),
            FlightCommand::Exit => {
                self.teardown();
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn takeoff(&mut self) {
        if self.state != FlightState::Idle {
            warn!("takeoff ignored: already airborne");
            return;
        }
        match self.actuator.takeoff() {
            Ok(()) => {
                self.state = FlightState::Flying;
                info!("airborne");
            }
            Err(e) => warn!("takeoff failed: {e:#}"),
        }
    }

    /// Enter tracking and drive the loop until a stop request or end of
    /// stream. Blocks the caller for the whole session.
    fn start(&mut self) -> Result<()> {
        match self.state {
            FlightState::Idle => {
                warn!("start rejected: take off first");
                return Ok(());
            }
            FlightState::Tracking => {
                warn!("start ignored: already tracking");
                return Ok(());
            }
            FlightState::Flying => {}
        }

        self.state = FlightState::Tracking;
        info!("tracking started");

        match self.run_tracking() {
            Ok(LoopEnd::Stopped) => {
                self.state = FlightState::Flying;
                info!("tracking stopped");
                Ok(())
            }
            Ok(LoopEnd::EndOfStream) => {
                info!("video stream ended, landing");
                if let Err(e) = self.actuator.land() {
                    warn!("landing after stream end failed: {e:#}");
                }
                self.state = FlightState::Idle;
                Ok(())
            }
            Err(e) => {
                error!("unrecoverable failure in tracking loop: {e:#}");
                self.teardown();
                Err(e)
            }
        }
    }

    /// The detection-to-actuation loop, one frame per iteration.
    fn run_tracking(&mut self) -> Result<LoopEnd> {
        self.tracker.reset();
        // Drain any quit left over from a previous session.
        self.shared.take_stop_request();

        let source = match self.source.as_mut() {
            Some(source) => source,
            None => return Ok(LoopEnd::EndOfStream),
        };

        loop {
            // Transitions only happen between iterations: one poll per loop.
            if self.shared.take_stop_request() {
                return Ok(LoopEnd::Stopped);
            }

            let frame = match source.next_frame() {
                Some(frame) => frame,
                None => return Ok(LoopEnd::EndOfStream),
            };

            let result = match self.tracker.process_frame(&frame) {
                Ok(result) => result,
                Err(e) => {
                    // A vision hiccup is transient: skip the frame.
                    warn!("frame processing failed: {e:#}");
                    continue;
                }
            };

            for cmd in &result.report.commands {
                match self.actuator.send(*cmd) {
                    Ok(SendStatus::Acked) => {}
                    Ok(SendStatus::TimedOut) => {
                        // Stale corrections are dropped, never retried.
                        warn!(heading = cmd.heading(), magnitude = cmd.magnitude, "command timed out");
                    }
                    Err(e) => return Err(e).context("actuator channel failed"),
                }
            }

            if let Some(tx) = &self.snapshots {
                let snapshot = TrackingSnapshot {
                    frame,
                    mask: result.mask,
                    report: result.report,
                };
                // Rendering must never stall control.
                let _ = tx.try_send(snapshot);
            }
        }
    }

    fn land(&mut self) {
        match self.state {
            FlightState::Idle => warn!("land ignored: already on the ground"),
            FlightState::Flying | FlightState::Tracking => match self.actuator.land() {
                Ok(()) => {
                    self.state = FlightState::Idle;
                    info!("landed");
                }
                Err(e) => warn!("land failed: {e:#}"),
            },
        }
    }

    /// Land if airborne, then release the stream, capture device, and
    /// observer resources — in that order, exactly once. Later calls
    /// (including the `Drop` safety net) are no-ops.
    fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;

        if self.state != FlightState::Idle {
            if let Err(e) = self.actuator.land() {
                warn!("landing during teardown failed: {e:#}");
            }
            self.state = FlightState::Idle;
        }
        if let Err(e) = self.actuator.stream_off() {
            warn!("stream off failed: {e:#}");
        }
        // Dropping the source releases the capture device; dropping the
        // sender lets observer threads see a disconnect.
        self.source = None;
        self.snapshots = None;
        self.shared.request_shutdown();
        info!("session closed");
    }
}

impl Drop for FlightSystem {
    fn drop(&mut self) {
        self.teardown();
    }
}
