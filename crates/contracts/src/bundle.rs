//! FrameBundle - timestamp-aligned multi-camera frame
//!
//! One optional slot per camera index plus a reference timestamp fixed at
//! creation. A bundle is complete when every slot is filled; completed
//! bundles are handed to consumers as shared read-only `Arc` references.

use crate::CameraFrame;

/// A fixed-size set of per-camera frame slots sharing one reference
/// timestamp.
///
/// The reference timestamp is the timestamp of the first frame that created
/// the bundle. No individual frame timestamp has to equal it exactly; they
/// are only guaranteed to lie within the sync tolerance of it.
#[derive(Debug)]
pub struct FrameBundle {
    reference_timestamp_ns: i64,
    slots: Vec<Option<CameraFrame>>,
}

impl FrameBundle {
    /// Create an empty bundle for a `num_cameras` rig
    pub fn new(num_cameras: usize, reference_timestamp_ns: i64) -> Self {
        let mut slots = Vec::with_capacity(num_cameras);
        slots.resize_with(num_cameras, || None);
        Self {
            reference_timestamp_ns,
            slots,
        }
    }

    /// Immutable reference timestamp assigned at creation
    pub fn reference_timestamp_ns(&self) -> i64 {
        self.reference_timestamp_ns
    }

    /// Number of camera slots
    pub fn num_cameras(&self) -> usize {
        self.slots.len()
    }

    /// Install `frame` at its camera slot.
    ///
    /// Returns the previously installed frame if the slot was already
    /// occupied (last-writer-wins; the caller decides how to diagnose it).
    pub fn insert(&mut self, frame: CameraFrame) -> Option<CameraFrame> {
        let index = frame.camera_index;
        self.slots[index].replace(frame)
    }

    /// Frame at `camera_index`, if installed
    pub fn frame(&self, camera_index: usize) -> Option<&CameraFrame> {
        self.slots.get(camera_index).and_then(|s| s.as_ref())
    }

    /// Whether the slot at `camera_index` is filled
    pub fn is_slot_set(&self, camera_index: usize) -> bool {
        self.frame(camera_index).is_some()
    }

    /// Complete iff every camera slot is filled
    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(|s| s.is_some())
    }

    /// Number of filled slots
    pub fn num_slots_set(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Iterate over filled slots in camera-index order
    pub fn frames(&self) -> impl Iterator<Item = &CameraFrame> {
        self.slots.iter().filter_map(|s| s.as_ref())
    }
}
