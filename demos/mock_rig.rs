//! Mock rig demonstration
//!
//! Drives a 4-camera pass-through pipeline from one producer thread per
//! camera, with per-camera clock jitter, and consumes bundles two ways:
//! a blocking consumer draining every bundle, then a latest-and-clear pull
//! the way a low-latency control loop would.
//!
//! Run with `cargo run -p mock_rig`.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::Result;
use bundle_engine::SyncPipeline;
use bytes::Bytes;
use contracts::{ImageData, ImageFormat};
use tracing::info;

const NUM_CAMERAS: usize = 4;
const NUM_GROUPS: i64 = 50;
const FRAME_INTERVAL_NS: i64 = 50_000_000; // 20 Hz
const TOLERANCE_NS: i64 = 5_000_000;

fn make_image(width: u32, height: u32) -> ImageData {
    ImageData {
        width,
        height,
        format: ImageFormat::Gray8,
        data: Bytes::from(vec![128u8; (width * height) as usize]),
    }
}

fn main() -> Result<()> {
    observability::init_with_config(observability::ObservabilityConfig {
        log_format: observability::LogFormat::Pretty,
        metrics_port: None,
        default_log_level: "info".to_string(),
    })?;

    let pipeline = Arc::new(SyncPipeline::test_rig(NUM_CAMERAS, 4, TOLERANCE_NS)?);

    let producers: Vec<_> = (0..NUM_CAMERAS)
        .map(|camera_index| {
            let pipeline = Arc::clone(&pipeline);
            thread::spawn(move || {
                // Fixed per-camera clock skew, well inside tolerance.
                let skew_ns = camera_index as i64 * 200_000;
                for group in 0..NUM_GROUPS {
                    let timestamp_ns = group * FRAME_INTERVAL_NS + skew_ns;
                    match pipeline.process_image(camera_index, make_image(640, 480), timestamp_ns)
                    {
                        Ok(()) => observability::record_image_received(camera_index),
                        Err(_) => observability::record_frame_dropped(camera_index),
                    }
                    thread::sleep(Duration::from_millis(2));
                }
            })
        })
        .collect();

    let consumer = {
        let pipeline = Arc::clone(&pipeline);
        thread::spawn(move || {
            for _ in 0..NUM_GROUPS - 1 {
                let bundle = pipeline.next_blocking();
                observability::record_bundle_completed(&bundle);
                info!(
                    reference_timestamp_ns = bundle.reference_timestamp_ns(),
                    frames = bundle.num_slots_set(),
                    "bundle consumed"
                );
            }
        })
    };

    for producer in producers {
        producer.join().expect("producer thread panicked");
    }
    pipeline.wait_for_all_work();
    observability::record_queue_depths(
        pipeline.num_bundles_processing(),
        pipeline.num_bundles_complete(),
    );
    consumer.join().expect("consumer thread panicked");

    // The control-loop style pull: freshest bundle only, backlog shed.
    if let Some(latest) = pipeline.latest_and_clear() {
        info!(
            reference_timestamp_ns = latest.reference_timestamp_ns(),
            "latest bundle pulled, backlog cleared"
        );
    }

    let stats = pipeline.stats();
    info!(
        frames_processed = stats.frames_processed,
        bundles_completed = stats.bundles_completed,
        slot_overwrites = stats.slot_overwrites,
        "mock rig run finished"
    );

    Ok(())
}
