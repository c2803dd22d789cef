//! Screen-space centering error.

use opencv::core::Point;

/// Signed pixel error of a detection center relative to the frame center.
///
/// Positive `dx` means the target sits right of center; positive `dy`
/// means above center.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Offset {
    pub dx: i32,
    pub dy: i32,
}

/// Compute the centering error. The vertical axis is inverted: the image
/// origin is top-left, but "up" must be positive in control space.
pub fn compute(center: Point, frame_center: Point) -> Offset {
    Offset {
        dx: center.x - frame_center.x,
        dy: frame_center.y - center.y,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_target_has_zero_offset() {
        let c = Point::new(320, 240);
        assert_eq!(compute(c, c), Offset { dx: 0, dy: 0 });
    }

    #[test]
    fn test_top_left_target() {
        let off = compute(Point::new(0, 0), Point::new(320, 240));
        assert_eq!(off, Offset { dx: -320, dy: 240 });
    }

    #[test]
    fn test_vertical_axis_is_inverted() {
        // Target below center → negative dy.
        let off = compute(Point::new(320, 400), Point::new(320, 240));
        assert_eq!(off, Offset { dx: 0, dy: -160 });
    }
}
