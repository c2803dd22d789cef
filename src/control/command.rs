//! Discrete motion commands issued to the actuator channel.

/// Controlled screen axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// Sign of the correction along an axis.
///
/// On X, negative steers left and positive right; on Y, positive steers up
/// and negative down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Negative,
    Positive,
}

/// A single bounded actuator directive. One is emitted per axis whose
/// controller output is non-zero (and the rate gate permits emission).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotionCommand {
    pub axis: Axis,
    pub direction: Direction,
    /// Correction magnitude in `[1, 100]`; zero output maps to no command.
    pub magnitude: i32,
}

impl MotionCommand {
    /// Map a controller output to a command. Zero means "no command".
    pub fn from_output(axis: Axis, output: i32) -> Option<Self> {
        if output == 0 {
            return None;
        }
        let direction = if output < 0 {
            Direction::Negative
        } else {
            Direction::Positive
        };
        Some(Self {
            axis,
            direction,
            magnitude: output.abs().min(100),
        })
    }

    /// Human/wire-facing name of the commanded direction.
    pub fn heading(&self) -> &'static str {
        match (self.axis, self.direction) {
            (Axis::X, Direction::Negative) => "left",
            (Axis::X, Direction::Positive) => "right",
            (Axis::Y, Direction::Positive) => "up",
            (Axis::Y, Direction::Negative) => "down",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_maps_to_direction() {
        let left = MotionCommand::from_output(Axis::X, -40).unwrap();
        assert_eq!(left.direction, Direction::Negative);
        assert_eq!(left.magnitude, 40);
        assert_eq!(left.heading(), "left");

        let up = MotionCommand::from_output(Axis::Y, 25).unwrap();
        assert_eq!(up.direction, Direction::Positive);
        assert_eq!(up.heading(), "up");

        assert_eq!(MotionCommand::from_output(Axis::Y, -1).unwrap().heading(), "down");
        assert_eq!(MotionCommand::from_output(Axis::X, 1).unwrap().heading(), "right");
    }

    #[test]
    fn test_zero_output_is_no_command() {
        assert!(MotionCommand::from_output(Axis::X, 0).is_none());
    }

    #[test]
    fn test_magnitude_is_bounded() {
        let cmd = MotionCommand::from_output(Axis::Y, -250).unwrap();
        assert_eq!(cmd.magnitude, 100);
    }
}
