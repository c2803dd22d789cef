//! State shared between the control loop and observer threads.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cross-thread flags.
///
/// The control loop polls `stop` exactly once per iteration, so state
/// transitions only ever happen between iterations and never race an
/// in-flight command. The display thread sets it when the quit key is
/// pressed; `shutdown` asks observer threads themselves to exit during
/// teardown.
pub struct SharedState {
    stop_requested: AtomicBool,
    shutdown_requested: AtomicBool,
}

impl SharedState {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            stop_requested: AtomicBool::new(false),
            shutdown_requested: AtomicBool::new(false),
        })
    }

    /// Ask the tracking loop to stop before its next iteration.
    pub fn request_stop(&self) {
        self.stop_requested.store(true, Ordering::SeqCst);
    }

    /// Read and clear the stop request, so a stale quit cannot leak into
    /// the next tracking session.
    pub fn take_stop_request(&self) -> bool {
        self.stop_requested.swap(false, Ordering::SeqCst)
    }

    /// Ask observer threads to exit.
    pub fn request_shutdown(&self) {
        self.shutdown_requested.store(true, Ordering::SeqCst);
    }

    pub fn is_shutdown_requested(&self) -> bool {
        self.shutdown_requested.load(Ordering::SeqCst)
    }
}
