//! Per-frame tracking: converts a frame into detection results and bounded
//! motion commands.
//!
//! The pipeline per iteration:
//! - HSV mask and largest-blob localization
//! - centering offset with inverted vertical axis
//! - dead-zone pre-filter on the error signal
//! - one PID controller per axis
//! - mapping of controller outputs to rate-limited motion commands

pub mod result;
pub mod tracker;

pub use result::{IterationReport, LoopEnd};
pub use tracker::{Tracker, TrackerConfig};
