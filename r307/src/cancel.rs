//! Cooperative cancellation
//!
//! A frame exchange cannot be interrupted mid-read (the sensor would be
//! left mid-response with no way to resynchronize), so cancellation is
//! only observed between transaction attempts.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared cancellation flag
///
/// Cloning is cheap; all clones observe the same flag. Hand a clone to the
/// UI thread and keep one inside the device.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create a fresh, uncancelled token
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation; takes effect at the next between-attempt check
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    /// Whether cancellation has been requested
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}
