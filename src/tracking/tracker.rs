//! Main tracker: orchestrates the mask → locate → offset → PID pipeline
//! for one frame at a time.
//!
//! The tracker owns all per-session control state (PID integrators, the
//! command-rate gate, the iteration clock) and is reset whenever tracking
//! (re)starts. It never talks to the actuator or the display itself; the
//! flight system decides what to do with the returned commands.

use std::time::{Duration, Instant};

use anyhow::Result;
use opencv::core::{Mat, Point};
use opencv::prelude::*;
use tracing::debug;

use crate::control::command::{Axis, MotionCommand};
use crate::control::gate::CommandGate;
use crate::control::pid::AxisPid;
use crate::tracking::result::IterationReport;
use crate::vision::locator::{self, DEFAULT_MIN_AREA};
use crate::vision::mask;
use crate::vision::offset;
use crate::vision::range::{self, HsvRange};

/// Dead-zone half-width in pixels: offsets at or below this magnitude are
/// treated as zero error, preventing oscillation around the setpoint.
pub const DEFAULT_TOLERANCE: i32 = 40;

/// Default minimum spacing between emitted command batches.
pub const DEFAULT_COMMAND_INTERVAL: Duration = Duration::from_millis(200);

/// PID gains for one axis.
#[derive(Debug, Clone, Copy)]
pub struct Gains {
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
}

impl Default for Gains {
    fn default() -> Self {
        Self {
            kp: 0.4,
            ki: 0.01,
            kd: 0.15,
        }
    }
}

/// Tracker configuration, fixed for the duration of a session.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Target color band.
    pub range: HsvRange,
    /// Dead-zone half-width in pixels.
    pub tolerance: i32,
    /// Minimum blob area in pixels (strictly exceeded to count).
    pub min_area: i32,
    pub gains_x: Gains,
    pub gains_y: Gains,
    /// Minimum spacing between command emissions.
    pub command_interval: Duration,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            range: range::GREEN,
            tolerance: DEFAULT_TOLERANCE,
            min_area: DEFAULT_MIN_AREA,
            gains_x: Gains::default(),
            gains_y: Gains::default(),
            command_interval: DEFAULT_COMMAND_INTERVAL,
        }
    }
}

/// Result of one [`Tracker::process_frame`] call.
pub struct FrameResult {
    pub report: IterationReport,
    /// Binary mask used for detection, kept for observers.
    pub mask: Mat,
}

/// Per-frame tracking pipeline with per-session control state.
pub struct Tracker {
    config: TrackerConfig,
    pid_x: AxisPid,
    pid_y: AxisPid,
    gate: CommandGate,
    /// Timestamp of the previous iteration; `None` before the first.
    last_tick: Option<Instant>,
}

impl Tracker {
    pub fn new(config: TrackerConfig) -> Self {
        let pid_x = AxisPid::new(config.gains_x.kp, config.gains_x.ki, config.gains_x.kd);
        let pid_y = AxisPid::new(config.gains_y.kp, config.gains_y.ki, config.gains_y.kd);
        let gate = CommandGate::new(config.command_interval);
        Self {
            config,
            pid_x,
            pid_y,
            gate,
            last_tick: None,
        }
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Clear all per-session state. Must run when tracking (re)starts so a
    /// stale integral or clock does not leak into the new session.
    pub fn reset(&mut self) {
        self.pid_x.reset();
        self.pid_y.reset();
        self.gate.reset();
        self.last_tick = None;
    }

    /// Process one frame: locate the target and produce the commands that
    /// would re-center it.
    ///
    /// `dt` for the controllers is measured here, from the previous call
    /// on this instance (0 on the first iteration), so control cadence is
    /// independent of whatever the caller does with the results.
    pub fn process_frame(&mut self, frame: &Mat) -> Result<FrameResult> {
        let t_start = Instant::now();
        let dt = match self.last_tick {
            Some(last) => t_start.duration_since(last).as_secs_f64(),
            None => 0.0,
        };
        self.last_tick = Some(t_start);

        let mask = mask::mask(frame, &self.config.range)?;
        let detection = locator::locate(&mask, self.config.min_area)?;

        let mut report = IterationReport {
            detection,
            dt,
            ..Default::default()
        };

        let det = match detection {
            Some(det) => det,
            None => {
                // No candidate: hold controller state, emit nothing.
                report.total_ms = t_start.elapsed().as_secs_f64() * 1000.0;
                return Ok(FrameResult { report, mask });
            }
        };

        let frame_center = Point::new(frame.cols() / 2, frame.rows() / 2);
        let off = offset::compute(det.center, frame_center);
        report.offset = Some(off);

        // Dead-zone pre-filter: within tolerance the axis error is exactly
        // zero no matter the gains.
        let err_x = if off.dx.abs() <= self.config.tolerance { 0 } else { off.dx };
        let err_y = if off.dy.abs() <= self.config.tolerance { 0 } else { off.dy };
        report.error = (err_x, err_y);

        let out_x = self.pid_x.update(err_x as f64, dt);
        let out_y = self.pid_y.update(err_y as f64, dt);
        report.output = (out_x, out_y);

        if self.gate.permit(t_start) {
            report.commands.extend(MotionCommand::from_output(Axis::X, out_x));
            report.commands.extend(MotionCommand::from_output(Axis::Y, out_y));
        }

        debug!(
            area = det.area,
            dx = off.dx,
            dy = off.dy,
            out_x,
            out_y,
            n_commands = report.commands.len(),
            "tracked frame"
        );

        report.total_ms = t_start.elapsed().as_secs_f64() * 1000.0;
        Ok(FrameResult { report, mask })
    }
}
