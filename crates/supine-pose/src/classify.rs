use crate::{KeypointSet, Landmark};

/// Default peak-to-peak range of normalized vertical coordinates below which
/// a body counts as lying down. 0.0-1.0 spans the image height.
///
/// A fixed heuristic with no calibration basis beyond the original design;
/// kept configurable rather than inlined.
pub const DEFAULT_LYING_RANGE: f32 = 0.2;

/// The eight landmarks whose vertical spread decides the classification
const CLASSIFIED: [Landmark; 8] = [
    Landmark::LeftShoulder,
    Landmark::RightShoulder,
    Landmark::LeftHip,
    Landmark::RightHip,
    Landmark::LeftKnee,
    Landmark::RightKnee,
    Landmark::LeftAnkle,
    Landmark::RightAnkle,
];

/// Classify a body as lying down.
///
/// An upright body spreads shoulders through ankles across the image height;
/// a horizontal body clusters them. The classification is "lying down" when
/// the peak-to-peak range of the eight vertical coordinates is strictly less
/// than `range_threshold` — a range of exactly the threshold is upright.
pub fn is_lying_down(keypoints: &KeypointSet, range_threshold: f32) -> bool {
    let mut min = f32::INFINITY;
    let mut max = f32::NEG_INFINITY;

    for landmark in CLASSIFIED {
        let y = keypoints.get(landmark).y;
        min = min.min(y);
        max = max.max(y);
    }

    (max - min) < range_threshold
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Keypoint, LANDMARK_COUNT};

    /// Build a keypoint set with every landmark at (0.5, y) for the given
    /// per-landmark vertical positions; unlisted landmarks sit at 0.5.
    fn keypoints_with(ys: &[(Landmark, f32)]) -> KeypointSet {
        let mut keypoints = [Keypoint {
            x: 0.5,
            y: 0.5,
            confidence: 1.0,
        }; LANDMARK_COUNT];
        for &(landmark, y) in ys {
            keypoints[usize::from(landmark)].y = y;
        }
        KeypointSet::new(keypoints)
    }

    #[test]
    fn test_flat_body_is_lying_down() {
        // All eight classified landmarks at y = 0.5: range 0 < 0.2
        let kps = keypoints_with(&[]);
        assert!(is_lying_down(&kps, DEFAULT_LYING_RANGE));
    }

    #[test]
    fn test_upright_body_is_not_lying_down() {
        // Shoulders at 0.1, ankles at 0.9: range 0.8
        let kps = keypoints_with(&[
            (Landmark::LeftShoulder, 0.1),
            (Landmark::RightShoulder, 0.1),
            (Landmark::LeftAnkle, 0.9),
            (Landmark::RightAnkle, 0.9),
        ]);
        assert!(!is_lying_down(&kps, DEFAULT_LYING_RANGE));
    }

    #[test]
    fn test_range_exactly_at_threshold_is_not_lying_down() {
        // Strict inequality: a range of exactly 0.2 is upright
        let kps = keypoints_with(&[
            (Landmark::LeftShoulder, 0.4),
            (Landmark::LeftAnkle, 0.6),
        ]);
        assert!(!is_lying_down(&kps, 0.2));
    }

    #[test]
    fn test_face_landmarks_are_ignored() {
        // A wildly displaced nose must not affect the classification
        let kps = keypoints_with(&[(Landmark::Nose, 0.0)]);
        assert!(is_lying_down(&kps, DEFAULT_LYING_RANGE));
    }
}
