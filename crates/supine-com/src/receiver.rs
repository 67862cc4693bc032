use crate::{framing, ComError};
use tokio::net::{TcpStream, ToSocketAddrs};

/// The client-side reading end of the stream.
pub struct FrameReceiver {
    stream: TcpStream,
}

impl FrameReceiver {
    /// Connect to a camera server and return a FrameReceiver.
    pub async fn connect(addr: impl ToSocketAddrs) -> Result<Self, ComError> {
        let stream = TcpStream::connect(addr).await?;
        Ok(Self { stream })
    }

    /// Receive the next compressed frame buffer.
    ///
    /// Returns `ComError::ConnectionClosed` when the server closes the
    /// connection at a frame boundary (clean end of session), and
    /// `ComError::Truncated` when it closes mid-frame.
    pub async fn recv(&mut self) -> Result<Vec<u8>, ComError> {
        framing::read_frame(&mut self.stream).await
    }
}
