use crate::{KeypointSet, PoseError};
use supine_image::RgbFrame;

/// Default minimum confidence for accepting a body detection
pub const DEFAULT_DETECTION_CONFIDENCE: f32 = 0.5;

/// Default minimum confidence for treating an individual landmark as visible
pub const DEFAULT_TRACKING_CONFIDENCE: f32 = 0.5;

/// Configuration for a pose detector.
///
/// Both thresholds are fixed at construction time; they are not tunable per
/// call.
#[derive(Clone, Debug)]
pub struct PoseConfig {
    detection_confidence: f32,
    tracking_confidence: f32,
}

impl Default for PoseConfig {
    fn default() -> Self {
        Self {
            detection_confidence: DEFAULT_DETECTION_CONFIDENCE,
            tracking_confidence: DEFAULT_TRACKING_CONFIDENCE,
        }
    }
}

impl PoseConfig {
    /// Set the minimum confidence for accepting a body detection.
    pub fn with_detection_confidence(mut self, confidence: f32) -> Self {
        self.detection_confidence = confidence;
        self
    }

    /// Set the minimum confidence for treating a landmark as visible.
    pub fn with_tracking_confidence(mut self, confidence: f32) -> Self {
        self.tracking_confidence = confidence;
        self
    }

    pub fn detection_confidence(&self) -> f32 {
        self.detection_confidence
    }

    pub fn tracking_confidence(&self) -> f32 {
        self.tracking_confidence
    }
}

/// The body-landmark capability.
///
/// Given an image, return the landmark set for the detected body, or `None`
/// if no body is found. Implementations are stateful (a loaded model
/// session) and are driven by exactly one analysis worker each.
pub trait PoseDetector {
    fn detect(&mut self, frame: &RgbFrame) -> Result<Option<KeypointSet>, PoseError>;
}
