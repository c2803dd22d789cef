//! Per-iteration tracking outputs and diagnostics.
//!
//! These types describe what happened during processing of a single frame:
//! detection and offset results, the post-dead-zone error signal, the
//! controller outputs, and the commands actually emitted.

use crate::control::command::MotionCommand;
use crate::vision::locator::Detection;
use crate::vision::offset::Offset;

/// Why the tracking loop returned control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopEnd {
    /// A stop or quit request was observed between iterations.
    Stopped,
    /// The frame source is exhausted or failed permanently.
    EndOfStream,
}

/// Summary of a single control-loop iteration.
#[derive(Debug, Clone, Default)]
pub struct IterationReport {
    /// The located target, if any cleared the minimum-area threshold.
    pub detection: Option<Detection>,
    /// Centering error; `None` whenever `detection` is absent.
    pub offset: Option<Offset>,
    /// Per-axis error after the dead-zone filter, (x, y).
    pub error: (i32, i32),
    /// Bounded controller outputs, (x, y).
    pub output: (i32, i32),
    /// Commands emitted this iteration. Empty when the target is absent,
    /// centered, or the rate gate withheld emission.
    pub commands: Vec<MotionCommand>,
    /// Wall-clock interval fed to the controllers, in seconds.
    pub dt: f64,
    /// Total processing time for the iteration, in milliseconds.
    pub total_ms: f64,
}
