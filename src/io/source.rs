//! Frame acquisition sources.

use std::thread;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use opencv::core::{Mat, Size};
use opencv::imgproc;
use opencv::prelude::*;
use opencv::videoio::{self, VideoCapture};
use tracing::warn;

/// Width every source frame is normalized to.
pub const FRAME_WIDTH: i32 = 640;
/// Height every source frame is normalized to.
pub const FRAME_HEIGHT: i32 = 480;

/// A source of video frames, polled once per control-loop iteration.
///
/// `None` means end of stream. Implementations log acquisition errors and
/// map them to `None` — the loop treats both the same way.
pub trait FrameSource: Send {
    fn next_frame(&mut self) -> Option<Mat>;
}

/// Live capture from a camera index or a stream URL, with frames resized
/// to a fixed geometry so the center and tolerance math stay stable.
pub struct VideoSource {
    cap: VideoCapture,
}

impl VideoSource {
    /// Consecutive empty grabs tolerated before the source is declared
    /// exhausted. Keeps "not yet ready" from busy-spinning forever.
    const MAX_EMPTY_READS: u32 = 50;
    const RETRY_DELAY: Duration = Duration::from_millis(10);

    /// Open a local camera by index.
    pub fn open_index(index: i32) -> Result<Self> {
        let cap = VideoCapture::new(index, videoio::CAP_ANY)
            .with_context(|| format!("opening camera {index}"))?;
        if !cap.is_opened()? {
            bail!("camera {index} could not be opened");
        }
        Ok(Self { cap })
    }

    /// Open a stream URL or a video file.
    pub fn open_url(url: &str) -> Result<Self> {
        let cap = VideoCapture::from_file(url, videoio::CAP_ANY)
            .with_context(|| format!("opening stream {url}"))?;
        if !cap.is_opened()? {
            bail!("stream {url} could not be opened");
        }
        Ok(Self { cap })
    }
}

impl FrameSource for VideoSource {
    fn next_frame(&mut self) -> Option<Mat> {
        let mut raw = Mat::default();
        for _ in 0..Self::MAX_EMPTY_READS {
            match self.cap.read(&mut raw) {
                Ok(true) if raw.rows() > 0 => {
                    let mut frame = Mat::default();
                    let target = Size::new(FRAME_WIDTH, FRAME_HEIGHT);
                    match imgproc::resize(&raw, &mut frame, target, 0.0, 0.0, imgproc::INTER_LINEAR) {
                        Ok(()) => return Some(frame),
                        Err(e) => {
                            warn!("frame resize failed: {e}");
                            return None;
                        }
                    }
                }
                // Not yet ready: wait briefly and retry.
                Ok(_) => thread::sleep(Self::RETRY_DELAY),
                Err(e) => {
                    warn!("frame acquisition failed: {e}");
                    return None;
                }
            }
        }
        warn!(
            "no frame after {} attempts, treating source as exhausted",
            Self::MAX_EMPTY_READS
        );
        None
    }
}

/// Replays a fixed frame sequence. The stand-in for live capture in tests
/// and dry runs.
pub struct ReplaySource {
    frames: std::vec::IntoIter<Mat>,
}

impl ReplaySource {
    pub fn new(frames: Vec<Mat>) -> Self {
        Self {
            frames: frames.into_iter(),
        }
    }
}

impl FrameSource for ReplaySource {
    fn next_frame(&mut self) -> Option<Mat> {
        self.frames.next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opencv::core::{self, Scalar};

    #[test]
    fn test_replay_source_yields_frames_then_ends() {
        let frame =
            Mat::new_rows_cols_with_default(4, 4, core::CV_8UC3, Scalar::default()).unwrap();
        let mut source = ReplaySource::new(vec![frame.clone(), frame]);

        assert!(source.next_frame().is_some());
        assert!(source.next_frame().is_some());
        assert!(source.next_frame().is_none());
        assert!(source.next_frame().is_none());
    }
}
