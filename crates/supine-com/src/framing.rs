//! Length-prefixed framing for the video stream.
//!
//! One frame on the wire is a 4-byte unsigned big-endian length followed by
//! exactly that many payload bytes. There is a single implicit frame type
//! (a compressed image), no checksum, and no read-side size cap.

use crate::ComError;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Write one framed payload: 4-byte big-endian length prefix, then the bytes.
///
/// Payloads longer than `u32::MAX` cannot be represented on the wire and
/// return `ComError::FrameTooLarge`.
pub async fn write_frame<W>(writer: &mut W, payload: &[u8]) -> Result<(), ComError>
where
    W: AsyncWrite + Unpin,
{
    let len = u32::try_from(payload.len()).map_err(|_| ComError::FrameTooLarge(payload.len()))?;

    writer.write_all(&len.to_be_bytes()).await?;
    writer.write_all(payload).await?;
    writer.flush().await?;

    Ok(())
}

/// Read one framed payload.
///
/// Blocks until the 4-byte prefix and then the full payload are read.
/// A connection that closes cleanly before the first prefix byte returns
/// `ComError::ConnectionClosed` (end of session). A connection that closes
/// mid-prefix or mid-payload returns `ComError::Truncated`.
///
/// A zero-length prefix is legal and yields an empty payload; rejecting it
/// is the decoder's job, not the protocol's.
pub async fn read_frame<R>(reader: &mut R) -> Result<Vec<u8>, ComError>
where
    R: AsyncRead + Unpin,
{
    let mut prefix = [0u8; 4];

    // The first read distinguishes a clean close (0 bytes at a frame
    // boundary) from a truncated frame (EOF once any prefix byte arrived).
    let n = reader.read(&mut prefix).await?;
    if n == 0 {
        return Err(ComError::ConnectionClosed);
    }
    if n < prefix.len() {
        read_exact_or_truncated(reader, &mut prefix[n..]).await?;
    }

    let len = u32::from_be_bytes(prefix) as usize;
    let mut payload = vec![0u8; len];
    read_exact_or_truncated(reader, &mut payload).await?;

    Ok(payload)
}

async fn read_exact_or_truncated<R>(reader: &mut R, buf: &mut [u8]) -> Result<(), ComError>
where
    R: AsyncRead + Unpin,
{
    let expected = buf.len();
    reader.read_exact(buf).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::UnexpectedEof {
            ComError::Truncated { expected }
        } else {
            ComError::Io(e)
        }
    })?;
    Ok(())
}
