//! Pipeline metric recording helpers
//!
//! Consumers call these as bundles and frames move through the pipeline;
//! the engine itself additionally records hot-path counters inline.

use contracts::FrameBundle;
use metrics::{counter, gauge, histogram};

/// Record a completed bundle pulled off the completion queue.
///
/// Spread is the nanosecond distance between the earliest and latest frame
/// timestamp in the bundle, a direct measure of how tight the rig's
/// synchronization is.
pub fn record_bundle_completed(bundle: &FrameBundle) {
    counter!("sync_bundles_consumed_total").increment(1);
    gauge!("sync_last_bundle_timestamp_ns").set(bundle.reference_timestamp_ns() as f64);

    let timestamps: Vec<i64> = bundle.frames().map(|f| f.timestamp_ns).collect();
    if let (Some(min), Some(max)) = (timestamps.iter().min(), timestamps.iter().max()) {
        histogram!("sync_bundle_timestamp_spread_ns").record((max - min) as f64);
    }
}

/// Record one raw image arrival for a camera
pub fn record_image_received(camera_index: usize) {
    counter!(
        "sync_images_received_total",
        "camera" => camera_index.to_string()
    )
    .increment(1);
}

/// Record a frame dropped by a failing processor
pub fn record_frame_dropped(camera_index: usize) {
    counter!(
        "sync_frames_dropped_total",
        "camera" => camera_index.to_string()
    )
    .increment(1);
}

/// Record current index sizes (monitoring/backpressure)
pub fn record_queue_depths(processing: usize, complete: usize) {
    gauge!("sync_bundles_processing").set(processing as f64);
    gauge!("sync_bundles_complete").set(complete as f64);
}
