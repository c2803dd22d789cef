//! Binary color masking in HSV space.

use anyhow::Result;
use opencv::core::{self, Mat, Scalar};
use opencv::imgproc;
use opencv::prelude::*;

use crate::vision::range::HsvRange;

/// Convert a BGR frame into a binary mask: 255 where the pixel falls
/// inside `range` on all three HSV channels, 0 elsewhere.
///
/// A zero-dimension frame yields an empty mask. Side-effect-free.
pub fn mask(frame: &Mat, range: &HsvRange) -> Result<Mat> {
    if frame.rows() == 0 || frame.cols() == 0 {
        return Ok(Mat::default());
    }

    let mut hsv = Mat::default();
    imgproc::cvt_color(frame, &mut hsv, imgproc::COLOR_BGR2HSV, 0)?;

    let lower = channel_scalar(range.lower);
    let upper = channel_scalar(range.upper);

    let mut out = Mat::default();
    core::in_range(&hsv, &lower, &upper, &mut out)?;
    Ok(out)
}

fn channel_scalar(hsv: [i32; 3]) -> Scalar {
    Scalar::new(hsv[0] as f64, hsv[1] as f64, hsv[2] as f64, 0.0)
}
