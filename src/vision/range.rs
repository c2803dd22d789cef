//! HSV threshold ranges: validation, named presets, and JSON persistence.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Maximum hue value in OpenCV's 8-bit HSV encoding.
pub const H_MAX: i32 = 179;
/// Maximum saturation/value channel value.
pub const SV_MAX: i32 = 255;

/// Inclusive lower/upper HSV bounds defining the target color.
///
/// Channels are `[h, s, v]` with `h ∈ [0, 179]` and `s, v ∈ [0, 255]`.
/// `lower[i] ≤ upper[i]` must hold per channel; hue wrap-around is not
/// supported. Immutable for the duration of a tracking session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HsvRange {
    pub lower: [i32; 3],
    pub upper: [i32; 3],
}

/// Default range: the green band the tracker was originally tuned for.
pub const GREEN: HsvRange = HsvRange {
    lower: [40, 70, 70],
    upper: [80, 255, 255],
};

impl HsvRange {
    /// Build a validated range.
    pub fn new(lower: [i32; 3], upper: [i32; 3]) -> Result<Self> {
        let range = Self { lower, upper };
        range.validate()?;
        Ok(range)
    }

    /// Check channel bounds and per-channel ordering.
    pub fn validate(&self) -> Result<()> {
        let max = [H_MAX, SV_MAX, SV_MAX];
        for (i, name) in ["hue", "saturation", "value"].iter().enumerate() {
            if self.lower[i] < 0 || self.upper[i] > max[i] {
                bail!("{name} must lie in [0, {}]", max[i]);
            }
            if self.lower[i] > self.upper[i] {
                bail!("{name} lower bound {} exceeds upper bound {}", self.lower[i], self.upper[i]);
            }
        }
        Ok(())
    }

    /// Load a range from a JSON file of the form
    /// `{"lower": [h, s, v], "upper": [h, s, v]}`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).with_context(|| format!("opening threshold config {:?}", path))?;
        let range: Self =
            serde_json::from_reader(file).with_context(|| format!("parsing threshold config {:?}", path))?;
        range.validate().with_context(|| format!("threshold config {:?} is out of range", path))?;
        Ok(range)
    }

    /// Load a range, falling back to the green preset when the file is
    /// missing, malformed, or out of range. Never fails the session.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::load(&path) {
            Ok(range) => range,
            Err(e) => {
                warn!("{e:#}; falling back to the green preset");
                GREEN
            }
        }
    }

    /// Write the range as JSON. Called on explicit user save only.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).with_context(|| format!("creating threshold config {:?}", path))?;
        serde_json::to_writer(BufWriter::new(file), self)
            .with_context(|| format!("writing threshold config {:?}", path))?;
        Ok(())
    }
}

/// Look up a named preset. Available without any file I/O.
pub fn preset(name: &str) -> Option<HsvRange> {
    let range = match name {
        "green" => GREEN,
        "red" => HsvRange {
            lower: [0, 120, 70],
            upper: [10, 255, 255],
        },
        "blue" => HsvRange {
            lower: [100, 150, 50],
            upper: [130, 255, 255],
        },
        "yellow" => HsvRange {
            lower: [20, 100, 100],
            upper: [35, 255, 255],
        },
        "orange" => HsvRange {
            lower: [10, 100, 20],
            upper: [25, 255, 255],
        },
        _ => return None,
    };
    Some(range)
}
