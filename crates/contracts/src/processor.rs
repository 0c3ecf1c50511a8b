//! FrameProcessor trait - per-camera processing abstraction
//!
//! Defines the single contract the sync core depends on: turn one raw image
//! plus a timestamp into a timestamped result. The underlying processor may
//! undistort, rectify, detect features, or pass the image through untouched;
//! all of that is opaque here.

use std::sync::Arc;

use crate::{Camera, FramePayload, ImageData, PipelineError};

/// What a processor returns for one image.
///
/// The timestamp may differ from the input timestamp when the processor
/// applies a hardware-clock correction; the sync core always matches on the
/// *output* timestamp.
#[derive(Debug, Clone)]
pub struct ProcessedFrame {
    /// Corrected timestamp in nanoseconds
    pub timestamp_ns: i64,

    /// Opaque result payload
    pub payload: FramePayload,
}

/// Per-camera image processor.
///
/// Implementations must be safe to call concurrently from worker threads.
/// The input camera describes the raw image geometry; the output camera
/// describes the geometry of whatever the processor emits. The pipeline
/// checks both against its camera sets by handle identity at construction.
pub trait FrameProcessor: Send + Sync {
    /// Camera descriptor of the raw images passed in
    fn input_camera(&self) -> &Arc<Camera>;

    /// Camera descriptor of the emitted results
    fn output_camera(&self) -> &Arc<Camera>;

    /// Synchronously process one image
    fn process_image(
        &self,
        image: ImageData,
        timestamp_ns: i64,
    ) -> Result<ProcessedFrame, PipelineError>;
}
