use std::fmt;
use supine_pose::PoseError;

#[derive(Debug)]
pub enum PipelineError {
    Pose(PoseError),
    Thread(std::io::Error),
    Closed,
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::Pose(err) => write!(f, "pose error: {err}"),
            PipelineError::Thread(err) => write!(f, "worker thread error: {err}"),
            PipelineError::Closed => write!(f, "analysis pipeline closed"),
        }
    }
}

impl std::error::Error for PipelineError {}

impl From<PoseError> for PipelineError {
    fn from(err: PoseError) -> Self {
        PipelineError::Pose(err)
    }
}
