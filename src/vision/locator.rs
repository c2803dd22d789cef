//! Largest-blob localization on a binary mask.

use anyhow::Result;
use opencv::core::{self, Mat, Point};
use opencv::imgproc;
use opencv::prelude::*;

/// Default minimum blob area in pixels; smaller candidates are noise.
pub const DEFAULT_MIN_AREA: i32 = 300;

/// A located target on the current frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Detection {
    /// Bounding-box centroid in pixel coordinates.
    pub center: Point,
    /// Region area in pixels.
    pub area: i32,
}

/// Find the dominant foreground region of `mask`.
///
/// Regions are labeled with 8-connectivity in raster-scan order; the one
/// with the largest pixel-count area wins, and the strict comparison keeps
/// the first-found region on ties. Returns `None` unless the winner's area
/// strictly exceeds `min_area`.
///
/// The reported center is the bounding-box centroid `(x + w/2, y + h/2)`,
/// integer-truncated — not the region's true centroid. This biases the
/// estimate for non-convex shapes and is kept for compatibility with the
/// controller's original tuning.
pub fn locate(mask: &Mat, min_area: i32) -> Result<Option<Detection>> {
    if mask.rows() == 0 || mask.cols() == 0 {
        return Ok(None);
    }

    let mut labels = Mat::default();
    let mut stats = Mat::default();
    let mut centroids = Mat::default();
    let n_labels = imgproc::connected_components_with_stats(
        mask,
        &mut labels,
        &mut stats,
        &mut centroids,
        8,
        core::CV_32S,
    )?;

    // Label 0 is the background.
    let mut best: Option<Detection> = None;
    for label in 1..n_labels {
        let area = *stats.at_2d::<i32>(label, imgproc::CC_STAT_AREA)?;
        if best.map_or(false, |b| area <= b.area) {
            continue;
        }
        let x = *stats.at_2d::<i32>(label, imgproc::CC_STAT_LEFT)?;
        let y = *stats.at_2d::<i32>(label, imgproc::CC_STAT_TOP)?;
        let w = *stats.at_2d::<i32>(label, imgproc::CC_STAT_WIDTH)?;
        let h = *stats.at_2d::<i32>(label, imgproc::CC_STAT_HEIGHT)?;
        best = Some(Detection {
            center: Point::new(x + w / 2, y + h / 2),
            area,
        });
    }

    Ok(best.filter(|d| d.area > min_area))
}
