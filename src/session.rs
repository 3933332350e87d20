//! Supersession guard for in-flight fetches.
//!
//! The interactive loop spawns one task per submitted address and never
//! cancels the old one. A fetch that was superseded while running must not
//! overwrite the newer result, so every submission takes a generation number
//! and a result is applied only while its generation is still the latest.

use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct FetchGuard {
    latest: AtomicU64,
}

impl FetchGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new submission and return its generation. Any generation
    /// handed out earlier becomes stale at this point.
    pub fn begin(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Whether a fetch started at `generation` may still publish its result.
    pub fn is_current(&self, generation: u64) -> bool {
        self.latest.load(Ordering::SeqCst) == generation
    }
}
