use std::fmt;

#[derive(Debug)]
pub enum PoseError {
    ModelLoad(String),
    Inference(String),
}

impl fmt::Display for PoseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PoseError::ModelLoad(msg) => write!(f, "model load error: {msg}"),
            PoseError::Inference(msg) => write!(f, "inference error: {msg}"),
        }
    }
}

impl std::error::Error for PoseError {}
