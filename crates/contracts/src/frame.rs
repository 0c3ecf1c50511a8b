//! CameraFrame - per-camera processing output
//!
//! One frame per (camera, image) pair. The payload is opaque to the sync
//! core: it may be the raw image, detected features, or both.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Raw image buffer handed to `process_image`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageData {
    /// Image width in pixels
    pub width: u32,

    /// Image height in pixels
    pub height: u32,

    /// Pixel format
    pub format: ImageFormat,

    /// Raw pixel data (zero-copy)
    pub data: Bytes,
}

/// Pixel format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageFormat {
    Gray8,
    Rgb8,
    Bgra8,
}

/// Detected features for one frame
///
/// Descriptor layout is processor-defined and opaque here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureSet {
    /// Keypoint locations in output-camera pixel coordinates
    pub keypoints: Vec<Keypoint>,

    /// Packed descriptor blob, `descriptor_stride` bytes per keypoint
    pub descriptors: Bytes,

    /// Bytes per descriptor
    pub descriptor_stride: u32,
}

/// A single detected keypoint
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Keypoint {
    pub x: f32,
    pub y: f32,
}

/// Per-camera result payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum FramePayload {
    /// Processed (or passed-through) image
    Image(ImageData),

    /// Detected features
    Features(FeatureSet),

    /// Raw bytes (fallback)
    Raw(Bytes),
}

/// The result of processing one image from one camera.
///
/// Immutable once produced; owned by whichever bundle holds it.
#[derive(Debug, Clone)]
pub struct CameraFrame {
    /// Owning camera index within the rig
    pub camera_index: usize,

    /// Post-processing timestamp in nanoseconds. May differ from the input
    /// timestamp when the processor applies a correction.
    pub timestamp_ns: i64,

    /// Opaque result payload
    pub payload: FramePayload,
}
