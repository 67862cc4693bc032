use crate::{framing, ComError};
use std::net::SocketAddr;
use tokio::net::{TcpListener, TcpStream, ToSocketAddrs};

/// A bound listener waiting for the single viewer connection.
///
/// `accept()` consumes the listener, so exactly one connection is ever
/// accepted for the session: once the viewer is connected there is nothing
/// left to accept on.
pub struct FrameListener {
    listener: TcpListener,
    local_addr: SocketAddr,
}

impl FrameListener {
    /// Bind a TCP listener on the given address.
    pub async fn bind(addr: impl ToSocketAddrs) -> Result<Self, ComError> {
        let listener = TcpListener::bind(addr).await?;
        let local_addr = listener.local_addr()?;
        Ok(Self {
            listener,
            local_addr,
        })
    }

    /// Return the local address the listener is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Accept the single viewer connection and return a `FrameSender`.
    ///
    /// The listener is dropped on return; no further connections are
    /// accepted for the lifetime of the session.
    pub async fn accept(self) -> Result<FrameSender, ComError> {
        let (stream, peer) = self.listener.accept().await?;
        log::info!("Viewer connected from {}", peer);
        Ok(FrameSender { stream, peer })
    }
}

/// The server-side writing end of the stream: one framed buffer per frame.
pub struct FrameSender {
    stream: TcpStream,
    peer: SocketAddr,
}

impl FrameSender {
    /// Send one compressed frame buffer.
    ///
    /// The write blocks until the OS accepts the bytes, so a slow network
    /// back-pressures the capture loop directly. A failed send (broken pipe)
    /// is fatal to the session; the caller terminates its loop.
    pub async fn send(&mut self, payload: &[u8]) -> Result<(), ComError> {
        framing::write_frame(&mut self.stream, payload).await
    }

    /// Return the address of the connected viewer.
    pub fn peer_addr(&self) -> SocketAddr {
        self.peer
    }
}
