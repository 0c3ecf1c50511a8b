//! Bundle correlator and completion queue.
//!
//! One mutex guards both indexes; every install runs as a single critical
//! section, so no two installs interleave. A condvar broadcast wakes all
//! blocked consumers when a bundle completes.

use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};

use tracing::{instrument, trace, warn};

use contracts::{CameraFrame, FrameBundle};

use crate::stats::PipelineStats;

/// Both shared indexes, ordered by reference timestamp
struct BundleIndexes {
    /// In-progress bundles, keyed uniquely by reference timestamp
    processing: BTreeMap<i64, FrameBundle>,
    /// Completed bundles awaiting consumer pull
    completed: BTreeMap<i64, Arc<FrameBundle>>,
}

/// Nearest-bundle matching with a tolerance window.
///
/// Invoked once per completed per-camera processing task; sole writer of
/// the processing index and completion queue.
pub(crate) struct Correlator {
    indexes: Mutex<BundleIndexes>,
    /// Broadcast on every bundle completion
    bundle_ready: Condvar,
    tolerance_ns: i64,
    num_cameras: usize,
    stats: Arc<PipelineStats>,
}

impl Correlator {
    pub(crate) fn new(num_cameras: usize, tolerance_ns: i64, stats: Arc<PipelineStats>) -> Self {
        Self {
            indexes: Mutex::new(BundleIndexes {
                processing: BTreeMap::new(),
                completed: BTreeMap::new(),
            }),
            bundle_ready: Condvar::new(),
            tolerance_ns,
            num_cameras,
            stats,
        }
    }

    fn lock_indexes(&self) -> MutexGuard<'_, BundleIndexes> {
        // A panicking worker task must not wedge every consumer.
        self.indexes.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Install a processed frame into the bundle nearest its timestamp,
    /// creating a new bundle when no open bundle lies within tolerance.
    #[instrument(
        level = "trace",
        name = "correlator_install",
        skip(self, frame),
        fields(camera_index = frame.camera_index, timestamp_ns = frame.timestamp_ns)
    )]
    pub(crate) fn install_frame(&self, frame: CameraFrame) {
        let timestamp_ns = frame.timestamp_ns;
        let camera_index = frame.camera_index;
        let mut indexes = self.lock_indexes();

        let key = match self.nearest_bundle_key(&indexes.processing, timestamp_ns) {
            Some(key) => key,
            None => {
                trace!(reference_timestamp_ns = timestamp_ns, "opening new bundle");
                timestamp_ns
            }
        };
        let num_cameras = self.num_cameras;
        let bundle = indexes
            .processing
            .entry(key)
            .or_insert_with(|| FrameBundle::new(num_cameras, key));

        if let Some(replaced) = bundle.insert(frame) {
            warn!(
                camera_index,
                reference_timestamp_ns = key,
                replaced_timestamp_ns = replaced.timestamp_ns,
                new_timestamp_ns = timestamp_ns,
                "overwriting an already-filled camera slot"
            );
            self.stats.inc_slot_overwrites();
            metrics::counter!("bundle_slot_overwrites_total").increment(1);
        }
        self.stats.inc_frames_processed();

        if bundle.is_complete() {
            if let Some(done) = indexes.processing.remove(&key) {
                indexes.completed.insert(key, Arc::new(done));
                self.stats.inc_bundles_completed();
                metrics::counter!("bundles_completed_total").increment(1);
                metrics::gauge!("bundle_completed_queue_depth")
                    .set(indexes.completed.len() as f64);
                self.bundle_ready.notify_all();
            }
        }
    }

    /// Key of the open bundle closest to `timestamp_ns`, if within
    /// tolerance.
    ///
    /// Bracket search: the greatest key <= timestamp and the smallest key
    /// above it are the only candidates. Equidistant candidates resolve to
    /// the earlier bundle.
    fn nearest_bundle_key(
        &self,
        processing: &BTreeMap<i64, FrameBundle>,
        timestamp_ns: i64,
    ) -> Option<i64> {
        let below = processing
            .range(..=timestamp_ns)
            .next_back()
            .map(|(key, _)| *key);
        let above = processing
            .range((Bound::Excluded(timestamp_ns), Bound::Unbounded))
            .next()
            .map(|(key, _)| *key);

        let best = match (below, above) {
            (Some(b), Some(a)) => {
                if timestamp_ns - b <= a - timestamp_ns {
                    b
                } else {
                    a
                }
            }
            (Some(b), None) => b,
            (None, Some(a)) => a,
            (None, None) => return None,
        };

        ((best - timestamp_ns).abs() <= self.tolerance_ns).then_some(best)
    }

    /// Remove and return the oldest completed bundle, if any. Never blocks.
    pub(crate) fn next(&self) -> Option<Arc<FrameBundle>> {
        let mut indexes = self.lock_indexes();
        indexes.completed.pop_first().map(|(_, bundle)| bundle)
    }

    /// Block until a bundle completes, then remove and return the oldest.
    pub(crate) fn next_blocking(&self) -> Arc<FrameBundle> {
        let mut indexes = self.lock_indexes();
        loop {
            if let Some((_, bundle)) = indexes.completed.pop_first() {
                return bundle;
            }
            indexes = self
                .bundle_ready
                .wait(indexes)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Return the newest completed bundle, clearing the completion queue
    /// and discarding every in-progress bundle at or before its timestamp.
    pub(crate) fn latest_and_clear(&self) -> Option<Arc<FrameBundle>> {
        let mut indexes = self.lock_indexes();
        let (timestamp_ns, bundle) = indexes.completed.pop_last()?;
        indexes.completed.clear();

        // Older partial bundles can never usefully complete now.
        let before = indexes.processing.len();
        indexes.processing.retain(|key, _| *key > timestamp_ns);
        let discarded = (before - indexes.processing.len()) as u64;
        if discarded > 0 {
            trace!(discarded, up_to_ns = timestamp_ns, "discarded stale bundles");
            self.stats.add_bundles_discarded(discarded);
            metrics::counter!("bundles_discarded_stale_total").increment(discarded);
        }

        Some(bundle)
    }

    /// Completion queue size
    pub(crate) fn num_complete(&self) -> usize {
        self.lock_indexes().completed.len()
    }

    /// Processing index size
    pub(crate) fn num_processing(&self) -> usize {
        self.lock_indexes().processing.len()
    }
}
