//! # Bundle Engine
//!
//! Multi-camera synchronization core: accepts raw per-camera image arrivals
//! at independent rates, dispatches processing to a worker pool, and
//! reassembles the out-of-order results into timestamp-aligned
//! `FrameBundle`s on a completion queue.
//!
//! ## Usage
//!
//! ```ignore
//! use bundle_engine::SyncPipeline;
//! use contracts::PipelineConfig;
//!
//! let config = PipelineConfig {
//!     num_workers: 4,
//!     tolerance_ns: 1_000_000,
//! };
//! let pipeline = SyncPipeline::new(config, processors, input_cameras, output_cameras)?;
//!
//! // Producer side
//! pipeline.process_image(camera_index, image, timestamp_ns)?;
//!
//! // Consumer side
//! let bundle = pipeline.next_blocking();
//! ```

mod correlator;
mod passthrough;
mod pipeline;
mod stats;

// Re-exports
pub use contracts::{
    CameraFrame, CameraSet, FrameBundle, FrameProcessor, PipelineConfig, PipelineError,
};
pub use passthrough::PassThroughProcessor;
pub use pipeline::SyncPipeline;
pub use stats::{PipelineStats, StatsSnapshot};
