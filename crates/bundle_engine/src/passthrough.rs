//! Pass-through processor
//!
//! Forwards the raw image as the frame payload without any image work.
//! Used by tests and demos, and as the degenerate rig where synchronization
//! is wanted without undistortion or feature detection.

use std::sync::Arc;

use contracts::{Camera, FrameProcessor, FramePayload, ImageData, PipelineError, ProcessedFrame};

/// Processor that emits the input image unchanged.
///
/// An optional constant timestamp shift models a hardware-clock correction,
/// so the emitted timestamp can differ from the arrival timestamp the way a
/// real corrector's would.
#[derive(Debug, Clone)]
pub struct PassThroughProcessor {
    input_camera: Arc<Camera>,
    output_camera: Arc<Camera>,
    time_shift_ns: i64,
}

impl PassThroughProcessor {
    /// Create a pass-through processor; input and output geometry are the
    /// same camera
    pub fn new(camera: Arc<Camera>) -> Self {
        Self {
            input_camera: Arc::clone(&camera),
            output_camera: camera,
            time_shift_ns: 0,
        }
    }

    /// Pass-through with a constant timestamp correction applied to every
    /// frame
    pub fn with_time_shift(camera: Arc<Camera>, time_shift_ns: i64) -> Self {
        Self {
            input_camera: Arc::clone(&camera),
            output_camera: camera,
            time_shift_ns,
        }
    }
}

impl FrameProcessor for PassThroughProcessor {
    fn input_camera(&self) -> &Arc<Camera> {
        &self.input_camera
    }

    fn output_camera(&self) -> &Arc<Camera> {
        &self.output_camera
    }

    fn process_image(
        &self,
        image: ImageData,
        timestamp_ns: i64,
    ) -> Result<ProcessedFrame, PipelineError> {
        Ok(ProcessedFrame {
            timestamp_ns: timestamp_ns + self.time_shift_ns,
            payload: FramePayload::Image(image),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use contracts::ImageFormat;

    fn make_image() -> ImageData {
        ImageData {
            width: 4,
            height: 4,
            format: ImageFormat::Gray8,
            data: Bytes::from(vec![0u8; 16]),
        }
    }

    #[test]
    fn test_forwards_timestamp_and_image() {
        let camera = Arc::new(Camera::new("cam", 4, 4));
        let processor = PassThroughProcessor::new(camera);

        let frame = processor.process_image(make_image(), 1_234).unwrap();
        assert_eq!(frame.timestamp_ns, 1_234);
        assert!(matches!(frame.payload, FramePayload::Image(_)));
    }

    #[test]
    fn test_applies_time_shift() {
        let camera = Arc::new(Camera::new("cam", 4, 4));
        let processor = PassThroughProcessor::with_time_shift(camera, -34);

        let frame = processor.process_image(make_image(), 1_234).unwrap();
        assert_eq!(frame.timestamp_ns, 1_200);
    }
}
