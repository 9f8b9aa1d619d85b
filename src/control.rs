use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

const PAUSE_POLL: Duration = Duration::from_millis(10);

/// Cooperative cancellation and pause flag for a search run.
///
/// The run polls the token once per processed state, right after the
/// progress callback. Clones share the same flags, so a controller on another
/// thread can stop, pause or resume a run that owns the calling thread.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
    paused: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    pub fn pause(&self) {
        self.paused.store(true, Ordering::SeqCst);
    }

    pub fn resume(&self) {
        self.paused.store(false, Ordering::SeqCst);
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }

    /// Block while paused, then report whether the run should stop.
    pub(crate) fn should_stop(&self) -> bool {
        while self.is_paused() && !self.is_cancelled() {
            thread::sleep(PAUSE_POLL);
        }
        self.is_cancelled()
    }
}
