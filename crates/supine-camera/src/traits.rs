use crate::CameraError;
use supine_image::RgbFrame;

/// Async camera trait for frame capture.
///
/// Implementations provide a `recv` method that asynchronously returns
/// decoded `RgbFrame`s. A capture failure is fatal: the device is assumed
/// gone and the caller terminates its loop.
#[allow(async_fn_in_trait)]
pub trait Camera {
    /// Receive the next frame from the camera.
    async fn recv(&mut self) -> Result<RgbFrame, CameraError>;
}
