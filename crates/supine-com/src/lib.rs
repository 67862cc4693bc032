pub mod error;
pub mod framing;
pub mod receiver;
pub mod sender;

pub use error::ComError;
pub use receiver::FrameReceiver;
pub use sender::{FrameListener, FrameSender};
