use crate::ImageError;

/// A decoded video frame: interleaved 8-bit RGB in row-major order.
///
/// The pixel buffer length is validated against the dimensions on
/// construction, so every `RgbFrame` holds exactly
/// `width * height * 3` bytes. Equality is pixel-exact.
#[derive(Clone, PartialEq, Eq)]
pub struct RgbFrame {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl std::fmt::Debug for RgbFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RgbFrame")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("data", &format!("<{} bytes>", self.data.len()))
            .finish()
    }
}

impl RgbFrame {
    /// Create a frame from an interleaved RGB buffer.
    ///
    /// Returns `ImageError::Size` if the buffer length does not match
    /// `width * height * 3`.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self, ImageError> {
        let expected = (width as usize) * (height as usize) * 3;
        if data.len() != expected {
            return Err(ImageError::Size {
                width,
                height,
                len: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Mutable access to the pixel buffer, for in-place annotation.
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }
}
