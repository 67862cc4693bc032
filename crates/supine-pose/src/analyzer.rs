use crate::classify::{is_lying_down, DEFAULT_LYING_RANGE};
use crate::detect::{PoseDetector, DEFAULT_TRACKING_CONFIDENCE};
use crate::{annotate, PoseError};
use supine_image::RgbFrame;

/// The outcome of analyzing one frame: the classification plus the annotated
/// image it was computed from. Consumed once by the presentation stage.
#[derive(Debug)]
pub struct AnalyzedFrame {
    pub lying: bool,
    pub frame: RgbFrame,
}

/// Runs the landmark capability on a frame, classifies, and annotates.
///
/// One `Analyzer` is owned by one analysis worker; the detector behind it is
/// never shared.
pub struct Analyzer {
    detector: Box<dyn PoseDetector + Send>,
    lying_range: f32,
    kp_threshold: f32,
}

impl Analyzer {
    pub fn new(detector: Box<dyn PoseDetector + Send>) -> Self {
        Self {
            detector,
            lying_range: DEFAULT_LYING_RANGE,
            kp_threshold: DEFAULT_TRACKING_CONFIDENCE,
        }
    }

    /// Set the peak-to-peak vertical range below which a body is lying down.
    pub fn with_lying_range(mut self, range: f32) -> Self {
        self.lying_range = range;
        self
    }

    /// Set the per-landmark confidence below which the overlay skips a joint.
    pub fn with_keypoint_threshold(mut self, threshold: f32) -> Self {
        self.kp_threshold = threshold;
        self
    }

    /// Analyze one frame: detect landmarks, classify, annotate in place.
    ///
    /// No detected body is the default/negative case: the frame is labeled
    /// "not lying down" with no skeleton.
    pub fn analyze(&mut self, mut frame: RgbFrame) -> Result<AnalyzedFrame, PoseError> {
        let lying = match self.detector.detect(&frame)? {
            Some(keypoints) => {
                annotate::draw_skeleton(&mut frame, &keypoints, self.kp_threshold);
                is_lying_down(&keypoints, self.lying_range)
            }
            None => false,
        };

        annotate::draw_classification_label(&mut frame, lying);

        Ok(AnalyzedFrame { lying, frame })
    }
}
