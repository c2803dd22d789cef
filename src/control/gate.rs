//! Command-rate limiting for the actuator channel.

use std::time::{Duration, Instant};

/// Minimum spacing between command emissions, keeping a slow or lossy
/// actuator channel from saturating while the control loop runs at frame
/// rate. PID state still advances on gated iterations; only emission is
/// withheld.
#[derive(Debug, Clone)]
pub struct CommandGate {
    min_interval: Duration,
    last_emit: Option<Instant>,
}

impl CommandGate {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_emit: None,
        }
    }

    /// Whether a command batch may be emitted at `now`. Records the
    /// emission when permitted.
    pub fn permit(&mut self, now: Instant) -> bool {
        match self.last_emit {
            Some(last) if now.duration_since(last) < self.min_interval => false,
            _ => {
                self.last_emit = Some(now);
                true
            }
        }
    }

    /// Forget the last emission; the next `permit` succeeds immediately.
    pub fn reset(&mut self) {
        self.last_emit = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_emission_is_permitted() {
        let mut gate = CommandGate::new(Duration::from_millis(200));
        assert!(gate.permit(Instant::now()));
    }

    #[test]
    fn test_blocks_until_interval_elapses() {
        let mut gate = CommandGate::new(Duration::from_millis(200));
        let t0 = Instant::now();
        assert!(gate.permit(t0));
        assert!(!gate.permit(t0 + Duration::from_millis(100)));
        assert!(gate.permit(t0 + Duration::from_millis(250)));
        // The permitted emission restarts the window.
        assert!(!gate.permit(t0 + Duration::from_millis(300)));
    }

    #[test]
    fn test_reset_reopens_the_gate() {
        let mut gate = CommandGate::new(Duration::from_secs(60));
        let t0 = Instant::now();
        assert!(gate.permit(t0));
        assert!(!gate.permit(t0));
        gate.reset();
        assert!(gate.permit(t0));
    }
}
