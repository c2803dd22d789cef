//! Flight state machine states.

/// External-facing state gating which commands are legal and whether the
/// tracking loop may run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlightState {
    /// On the ground, motors off.
    Idle,
    /// Airborne, holding position.
    Flying,
    /// Airborne with the tracking loop driving motion commands.
    Tracking,
}

impl Default for FlightState {
    fn default() -> Self {
        Self::Idle
    }
}
