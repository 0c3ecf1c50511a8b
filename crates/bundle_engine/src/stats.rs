//! Per-pipeline counters for observability
//!
//! Explicitly owned by the pipeline and shared with the components that
//! record into it; there is no process-wide registry.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for a single pipeline instance
#[derive(Debug, Default)]
pub struct PipelineStats {
    /// Frames that came out of a processor and were installed into a bundle
    frames_processed: AtomicU64,
    /// Frames dropped because their processor failed
    frames_dropped: AtomicU64,
    /// Slot installs that replaced an existing frame
    slot_overwrites: AtomicU64,
    /// Bundles promoted to the completion queue
    bundles_completed: AtomicU64,
    /// Incomplete bundles discarded as stale by `latest_and_clear`
    bundles_discarded: AtomicU64,
}

impl PipelineStats {
    /// Create new counters
    pub fn new() -> Self {
        Self::default()
    }

    /// Get processed frame count
    pub fn frames_processed(&self) -> u64 {
        self.frames_processed.load(Ordering::Relaxed)
    }

    /// Increment processed frame count
    pub fn inc_frames_processed(&self) {
        self.frames_processed.fetch_add(1, Ordering::Relaxed);
    }

    /// Get dropped frame count
    pub fn frames_dropped(&self) -> u64 {
        self.frames_dropped.load(Ordering::Relaxed)
    }

    /// Increment dropped frame count
    pub fn inc_frames_dropped(&self) {
        self.frames_dropped.fetch_add(1, Ordering::Relaxed);
    }

    /// Get slot overwrite count
    pub fn slot_overwrites(&self) -> u64 {
        self.slot_overwrites.load(Ordering::Relaxed)
    }

    /// Increment slot overwrite count
    pub fn inc_slot_overwrites(&self) {
        self.slot_overwrites.fetch_add(1, Ordering::Relaxed);
    }

    /// Get completed bundle count
    pub fn bundles_completed(&self) -> u64 {
        self.bundles_completed.load(Ordering::Relaxed)
    }

    /// Increment completed bundle count
    pub fn inc_bundles_completed(&self) {
        self.bundles_completed.fetch_add(1, Ordering::Relaxed);
    }

    /// Get discarded bundle count
    pub fn bundles_discarded(&self) -> u64 {
        self.bundles_discarded.load(Ordering::Relaxed)
    }

    /// Add to discarded bundle count
    pub fn add_bundles_discarded(&self, n: u64) {
        self.bundles_discarded.fetch_add(n, Ordering::Relaxed);
    }

    /// Get snapshot of all counters
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            frames_processed: self.frames_processed(),
            frames_dropped: self.frames_dropped(),
            slot_overwrites: self.slot_overwrites(),
            bundles_completed: self.bundles_completed(),
            bundles_discarded: self.bundles_discarded(),
        }
    }
}

/// Point-in-time snapshot of pipeline counters (for reporting)
#[derive(Debug, Clone, Copy)]
pub struct StatsSnapshot {
    pub frames_processed: u64,
    pub frames_dropped: u64,
    pub slot_overwrites: u64,
    pub bundles_completed: u64,
    pub bundles_discarded: u64,
}
