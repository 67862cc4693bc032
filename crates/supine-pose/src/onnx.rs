//! YOLO-pose landmark detection through ONNX Runtime.
//!
//! Letterboxes the frame to the model's 640x640 input, runs the session on
//! the CPU execution provider, and converts the single best detection into a
//! normalized `KeypointSet`. The monitor watches one subject, so only the
//! highest-confidence body is kept.

use crate::detect::{PoseConfig, PoseDetector};
use crate::{Keypoint, KeypointSet, PoseError, LANDMARK_COUNT};
use ndarray::ArrayD;
use ort::{inputs, session::Session, value::TensorRef};
use std::path::Path;
use supine_image::RgbFrame;

const INPUT_SIZE: usize = 640;
const PAD_VALUE: f32 = 114.0 / 255.0; // Gray letterbox padding, normalized

/// Model output rows: cx, cy, w, h, confidence, then 17 x (x, y, visibility)
const OUTPUT_ROWS: usize = 5 + LANDMARK_COUNT * 3;

/// Letterbox transform applied before inference, kept for rescaling
#[derive(Debug, Clone, Copy)]
struct Letterbox {
    scale: f32,
    pad_x: f32,
    pad_y: f32,
}

pub struct YoloPoseDetector {
    session: Session,
    input_name: String,
    output_name: String,
    config: PoseConfig,
}

impl YoloPoseDetector {
    /// Load a YOLO-pose ONNX model from disk.
    pub fn from_file(path: impl AsRef<Path>, config: PoseConfig) -> Result<Self, PoseError> {
        let session = Session::builder()
            .map_err(|e| PoseError::ModelLoad(format!("failed to create session builder: {e}")))?
            .commit_from_file(path)
            .map_err(|e| PoseError::ModelLoad(format!("failed to load model from file: {e}")))?;

        let input_name = session
            .inputs()
            .first()
            .map(|input| input.name().to_string())
            .ok_or_else(|| PoseError::ModelLoad("model has no inputs".to_string()))?;
        let output_name = session
            .outputs()
            .first()
            .map(|output| output.name().to_string())
            .ok_or_else(|| PoseError::ModelLoad("model has no outputs".to_string()))?;

        Ok(Self {
            session,
            input_name,
            output_name,
            config,
        })
    }
}

impl PoseDetector for YoloPoseDetector {
    fn detect(&mut self, frame: &RgbFrame) -> Result<Option<KeypointSet>, PoseError> {
        let (nchw, letterbox) = letterbox_nchw(frame);

        let array = ArrayD::from_shape_vec(vec![1, 3, INPUT_SIZE, INPUT_SIZE], nchw)
            .map_err(|e| PoseError::Inference(format!("failed to create input array: {e}")))?;
        let tensor_ref = TensorRef::from_array_view(array.view())
            .map_err(|e| PoseError::Inference(format!("failed to create tensor ref: {e}")))?;

        let outputs = self
            .session
            .run(inputs![self.input_name.as_str() => tensor_ref])
            .map_err(|e| PoseError::Inference(format!("inference failed: {e}")))?;

        let output = outputs[self.output_name.as_str()]
            .try_extract_array::<f32>()
            .map_err(|e| PoseError::Inference(format!("output is not f32: {e}")))?;

        let shape = output.shape().to_vec();
        let data: Vec<f32> = output.iter().copied().collect();

        best_detection(
            &shape,
            &data,
            &letterbox,
            frame.width() as f32,
            frame.height() as f32,
            self.config.detection_confidence(),
        )
    }
}

/// Letterbox-resize a frame to 640x640 NCHW f32 in [0.0, 1.0].
fn letterbox_nchw(frame: &RgbFrame) -> (Vec<f32>, Letterbox) {
    let w = frame.width() as usize;
    let h = frame.height() as usize;
    let data = frame.data();

    let scale = (INPUT_SIZE as f32 / w as f32).min(INPUT_SIZE as f32 / h as f32);
    let new_w = ((w as f32 * scale) as usize).max(1);
    let new_h = ((h as f32 * scale) as usize).max(1);
    let pad_x = ((INPUT_SIZE - new_w) / 2) as usize;
    let pad_y = ((INPUT_SIZE - new_h) / 2) as usize;

    let mut nchw = vec![PAD_VALUE; 3 * INPUT_SIZE * INPUT_SIZE];

    for out_y in 0..new_h {
        // Nearest-neighbor source row
        let src_y = ((out_y as f32 / scale) as usize).min(h - 1);
        for out_x in 0..new_w {
            let src_x = ((out_x as f32 / scale) as usize).min(w - 1);
            let src_idx = (src_y * w + src_x) * 3;
            let dst_y = out_y + pad_y;
            let dst_x = out_x + pad_x;
            for ch in 0..3 {
                let dst_idx = ch * INPUT_SIZE * INPUT_SIZE + dst_y * INPUT_SIZE + dst_x;
                nchw[dst_idx] = data[src_idx + ch] as f32 / 255.0;
            }
        }
    }

    (
        nchw,
        Letterbox {
            scale,
            pad_x: pad_x as f32,
            pad_y: pad_y as f32,
        },
    )
}

/// Pick the highest-confidence detection from a [1, 56, N] output and map its
/// keypoints back through the letterbox into normalized frame coordinates.
fn best_detection(
    shape: &[usize],
    data: &[f32],
    letterbox: &Letterbox,
    frame_w: f32,
    frame_h: f32,
    conf_threshold: f32,
) -> Result<Option<KeypointSet>, PoseError> {
    if shape.len() != 3 || shape[0] != 1 || shape[1] != OUTPUT_ROWS {
        return Err(PoseError::Inference(format!(
            "unexpected output shape {shape:?}, expected [1, {OUTPUT_ROWS}, N]"
        )));
    }

    let n = shape[2];
    let mut best: Option<(f32, usize)> = None;

    for i in 0..n {
        let confidence = data[4 * n + i];
        if confidence < conf_threshold {
            continue;
        }
        if best.map(|(c, _)| confidence > c).unwrap_or(true) {
            best = Some((confidence, i));
        }
    }

    let Some((_, i)) = best else {
        return Ok(None);
    };

    let mut keypoints = [Keypoint {
        x: 0.0,
        y: 0.0,
        confidence: 0.0,
    }; LANDMARK_COUNT];

    for (kp_idx, keypoint) in keypoints.iter_mut().enumerate() {
        let base = 5 + kp_idx * 3;
        let x = data[base * n + i];
        let y = data[(base + 1) * n + i];
        let visibility = data[(base + 2) * n + i];

        // Model space -> source pixels -> normalized
        let px = (x - letterbox.pad_x) / letterbox.scale;
        let py = (y - letterbox.pad_y) / letterbox.scale;

        *keypoint = Keypoint {
            x: (px / frame_w).clamp(0.0, 1.0),
            y: (py / frame_h).clamp(0.0, 1.0),
            confidence: visibility,
        };
    }

    Ok(Some(KeypointSet::new(keypoints)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column_output(confidences: &[f32]) -> (Vec<usize>, Vec<f32>) {
        let n = confidences.len();
        let mut data = vec![0.0; OUTPUT_ROWS * n];
        for (i, &conf) in confidences.iter().enumerate() {
            data[4 * n + i] = conf;
            // Keypoints at model-space (320, 320) with full visibility
            for kp in 0..LANDMARK_COUNT {
                let base = 5 + kp * 3;
                data[base * n + i] = 320.0;
                data[(base + 1) * n + i] = 320.0;
                data[(base + 2) * n + i] = 1.0;
            }
        }
        (vec![1, OUTPUT_ROWS, n], data)
    }

    #[test]
    fn test_no_detection_above_threshold() {
        let (shape, data) = column_output(&[0.1, 0.3]);
        let letterbox = Letterbox {
            scale: 1.0,
            pad_x: 0.0,
            pad_y: 0.0,
        };
        let result = best_detection(&shape, &data, &letterbox, 640.0, 640.0, 0.5).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_best_detection_keypoints_are_normalized() {
        let (shape, data) = column_output(&[0.4, 0.9]);
        let letterbox = Letterbox {
            scale: 1.0,
            pad_x: 0.0,
            pad_y: 0.0,
        };
        let keypoints = best_detection(&shape, &data, &letterbox, 640.0, 640.0, 0.5)
            .unwrap()
            .expect("expected a detection");
        for kp in keypoints.iter() {
            assert!((kp.x - 0.5).abs() < 1e-6);
            assert!((kp.y - 0.5).abs() < 1e-6);
        }
    }

    #[test]
    fn test_letterbox_rescaling() {
        // 320x240 source scaled by 2 into 640x480, padded 80 rows top/bottom
        let (shape, data) = column_output(&[0.9]);
        let letterbox = Letterbox {
            scale: 2.0,
            pad_x: 0.0,
            pad_y: 80.0,
        };
        let keypoints = best_detection(&shape, &data, &letterbox, 320.0, 240.0, 0.5)
            .unwrap()
            .expect("expected a detection");
        let kp = keypoints.get(crate::Landmark::Nose);
        // (320 - 0) / 2 / 320 = 0.5; (320 - 80) / 2 / 240 = 0.5
        assert!((kp.x - 0.5).abs() < 1e-6);
        assert!((kp.y - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_unexpected_shape_is_an_error() {
        let letterbox = Letterbox {
            scale: 1.0,
            pad_x: 0.0,
            pad_y: 0.0,
        };
        assert!(best_detection(&[1, 10, 4], &vec![0.0; 40], &letterbox, 640.0, 480.0, 0.5).is_err());
    }
}
