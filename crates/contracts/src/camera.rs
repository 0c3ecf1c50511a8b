//! Camera and CameraSet - immutable rig description
//!
//! Handles are shared as `Arc` across the pipeline, its processors, and
//! consumers; nothing mutates a camera set after construction. Identity
//! checks between a processor's declared camera and a set entry use
//! `Arc::ptr_eq`, not structural equality.

use std::sync::Arc;

/// Immutable camera descriptor.
///
/// Two descriptors conceptually exist per rig position: the *input* camera
/// (raw geometry before processing) and the *output* camera (geometry of
/// whatever a processor emits). Both are opaque to the sync core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Camera {
    /// Human-readable label, e.g. "cam0_front_left"
    pub label: String,

    /// Image width in pixels
    pub image_width: u32,

    /// Image height in pixels
    pub image_height: u32,
}

impl Camera {
    /// Create a new camera descriptor
    pub fn new(label: impl Into<String>, image_width: u32, image_height: u32) -> Self {
        Self {
            label: label.into(),
            image_width,
            image_height,
        }
    }
}

/// Ordered, fixed-cardinality set of camera descriptors.
///
/// Constructed once at pipeline setup and shared read-only for the
/// pipeline's lifetime.
#[derive(Debug, Clone)]
pub struct CameraSet {
    cameras: Vec<Arc<Camera>>,
}

impl CameraSet {
    /// Create a camera set from descriptor handles
    pub fn new(cameras: Vec<Arc<Camera>>) -> Self {
        Self { cameras }
    }

    /// Create a uniform `n`-camera test rig (identical resolution, labeled
    /// `cam0..camN-1`)
    pub fn uniform(num_cameras: usize, image_width: u32, image_height: u32) -> Self {
        let cameras = (0..num_cameras)
            .map(|i| {
                Arc::new(Camera::new(
                    format!("cam{i}"),
                    image_width,
                    image_height,
                ))
            })
            .collect();
        Self { cameras }
    }

    /// Number of cameras in the rig
    pub fn len(&self) -> usize {
        self.cameras.len()
    }

    /// Whether the set holds no cameras
    pub fn is_empty(&self) -> bool {
        self.cameras.is_empty()
    }

    /// Camera handle at `index`
    pub fn get(&self, index: usize) -> Option<&Arc<Camera>> {
        self.cameras.get(index)
    }

    /// Iterate over all camera handles in rig order
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Camera>> {
        self.cameras.iter()
    }
}
