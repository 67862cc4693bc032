//! Pose analysis for the supine monitor: landmark types, the lying-down
//! classifier, frame annotation, and the detector seam.
//!
//! The landmark extraction itself is an opaque capability behind the
//! `PoseDetector` trait; the `onnx` feature provides a YOLO-pose backed
//! implementation.

pub mod analyzer;
pub mod annotate;
pub mod classify;
pub mod detect;
pub mod error;
pub mod types;

#[cfg(feature = "onnx")]
pub mod onnx;

pub use analyzer::{AnalyzedFrame, Analyzer};
pub use classify::{is_lying_down, DEFAULT_LYING_RANGE};
pub use detect::{
    PoseConfig, PoseDetector, DEFAULT_DETECTION_CONFIDENCE, DEFAULT_TRACKING_CONFIDENCE,
};
pub use error::PoseError;
pub use types::{Keypoint, KeypointSet, Landmark, LANDMARK_COUNT};

#[cfg(feature = "onnx")]
pub use onnx::YoloPoseDetector;
