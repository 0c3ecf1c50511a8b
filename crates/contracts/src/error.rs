//! Layered error definitions
//!
//! Categorized by source: configuration / indexing / processing

use thiserror::Error;

/// Unified error type
#[derive(Debug, Error)]
pub enum PipelineError {
    // ===== Configuration Errors =====
    /// Rig configuration rejected at construction
    #[error("invalid configuration at '{field}': {message}")]
    InvalidConfiguration { field: String, message: String },

    // ===== Indexing Errors =====
    /// Camera index outside the rig's valid range
    #[error("camera index {index} out of range: rig has {num_cameras} cameras")]
    IndexOutOfRange { index: usize, num_cameras: usize },

    // ===== Processing Errors =====
    /// A per-camera processor failed on one image
    #[error("processing failed for camera {camera_index}: {message}")]
    Processing {
        camera_index: usize,
        message: String,
    },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl PipelineError {
    /// Create configuration validation error
    pub fn invalid_configuration(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create out-of-range camera index error
    pub fn index_out_of_range(index: usize, num_cameras: usize) -> Self {
        Self::IndexOutOfRange { index, num_cameras }
    }

    /// Create per-camera processing error
    pub fn processing(camera_index: usize, message: impl Into<String>) -> Self {
        Self::Processing {
            camera_index,
            message: message.into(),
        }
    }
}
