/// Number of body landmarks in the COCO pose vocabulary
pub const LANDMARK_COUNT: usize = 17;

/// Named body landmarks, COCO order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Landmark {
    Nose = 0,
    LeftEye = 1,
    RightEye = 2,
    LeftEar = 3,
    RightEar = 4,
    LeftShoulder = 5,
    RightShoulder = 6,
    LeftElbow = 7,
    RightElbow = 8,
    LeftWrist = 9,
    RightWrist = 10,
    LeftHip = 11,
    RightHip = 12,
    LeftKnee = 13,
    RightKnee = 14,
    LeftAnkle = 15,
    RightAnkle = 16,
}

impl From<Landmark> for usize {
    fn from(landmark: Landmark) -> usize {
        landmark as usize
    }
}

/// One body landmark position in normalized image coordinates.
///
/// `x` spans the image width and `y` the image height, both in [0.0, 1.0].
/// `confidence` is the detector's visibility score for this landmark.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keypoint {
    pub x: f32,
    pub y: f32,
    pub confidence: f32,
}

/// The full set of landmarks for one detected body.
///
/// Produced once per analyzed frame and read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct KeypointSet {
    keypoints: [Keypoint; LANDMARK_COUNT],
}

impl KeypointSet {
    pub fn new(keypoints: [Keypoint; LANDMARK_COUNT]) -> Self {
        Self { keypoints }
    }

    /// Get a keypoint by its semantic landmark name.
    pub fn get(&self, landmark: Landmark) -> &Keypoint {
        &self.keypoints[usize::from(landmark)]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Keypoint> {
        self.keypoints.iter()
    }
}
