//! # Contracts
//!
//! Frozen interface contracts (ICD), defining inter-crate data structures and traits.
//! All business crates can only depend on this crate, reverse dependencies are prohibited.
//!
//! ## Time Model
//! - Integer nanosecond timestamps (`i64`) are the primary clock
//! - A bundle's reference timestamp is fixed at creation and never changes

mod bundle;
mod camera;
mod config;
mod error;
mod frame;
mod processor;

pub use bundle::FrameBundle;
pub use camera::{Camera, CameraSet};
pub use config::PipelineConfig;
pub use error::*;
pub use frame::*;
pub use processor::{FrameProcessor, ProcessedFrame};
