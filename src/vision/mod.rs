//! Color-based target localization: HSV thresholds, masking, blob
//! selection, and screen-space offsets.

pub mod locator;
pub mod mask;
pub mod offset;
pub mod range;

pub use locator::Detection;
pub use offset::Offset;
pub use range::HsvRange;
