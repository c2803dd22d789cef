//! Messages published by the control loop to observers.

use opencv::core::Mat;

use crate::tracking::result::IterationReport;

/// Snapshot of one loop iteration, published after commands are issued.
///
/// Sent over a bounded channel with `try_send`: when the consumer is
/// behind, snapshots are dropped rather than stalling control. Observers
/// are strictly read-only with respect to control state.
pub struct TrackingSnapshot {
    /// The frame the iteration ran on.
    pub frame: Mat,
    /// Binary mask used for detection.
    pub mask: Mat,
    /// What the iteration decided.
    pub report: IterationReport,
}
