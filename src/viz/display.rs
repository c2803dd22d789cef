//! Display observer: renders frames, masks, and detections.
//!
//! Runs on its own thread fed by a bounded snapshot channel, so render
//! cadence never affects command ordering or the controllers' `dt`. Its
//! only feedback into control is the quit key, surfaced through
//! [`SharedState::request_stop`] and observed by the loop between
//! iterations.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use anyhow::Result;
use crossbeam_channel::{Receiver, RecvTimeoutError};
use opencv::core::Scalar;
use opencv::highgui;
use opencv::imgproc;
use tracing::warn;

use crate::system::messages::TrackingSnapshot;
use crate::system::shared_state::SharedState;

const STREAM_WINDOW: &str = "Tracking";
const MASK_WINDOW: &str = "Mask";
const QUIT_KEY: i32 = 'q' as i32;

/// Radius of the dot drawn on the detected center.
const MARKER_RADIUS: i32 = 10;

/// Spawn the display thread. It exits when teardown drops the snapshot
/// sender or raises the shutdown flag, and closes its windows on the way
/// out.
pub fn spawn(rx: Receiver<TrackingSnapshot>, shared: Arc<SharedState>) -> JoinHandle<()> {
    thread::spawn(move || {
        if let Err(e) = run(rx, &shared) {
            warn!("display loop failed: {e:#}");
        }
        if let Err(e) = highgui::destroy_all_windows() {
            warn!("closing display windows failed: {e}");
        }
    })
}

fn run(rx: Receiver<TrackingSnapshot>, shared: &SharedState) -> Result<()> {
    loop {
        if shared.is_shutdown_requested() {
            return Ok(());
        }

        match rx.recv_timeout(Duration::from_millis(100)) {
            Ok(snapshot) => render(snapshot)?,
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => return Ok(()),
        }

        // Pump the GUI event loop and watch for the quit key.
        if highgui::wait_key(1)? == QUIT_KEY {
            shared.request_stop();
        }
    }
}

fn render(snapshot: TrackingSnapshot) -> Result<()> {
    let mut frame = snapshot.frame;
    if let Some(det) = snapshot.report.detection {
        imgproc::circle(
            &mut frame,
            det.center,
            MARKER_RADIUS,
            Scalar::new(0.0, 255.0, 0.0, 0.0),
            imgproc::FILLED,
            imgproc::LINE_8,
            0,
        )?;
    }
    highgui::imshow(STREAM_WINDOW, &frame)?;
    highgui::imshow(MASK_WINDOW, &snapshot.mask)?;
    Ok(())
}
