//! JPEG codec boundary for the supine pipeline.
//!
//! This crate wraps the `image` crate to move frames between their wire form
//! (JPEG bytes) and their decoded form (`RgbFrame`, HWC interleaved u8).
//! Whatever the JPEG carried, the decoded frame is always three-channel:
//! grayscale sources are expanded to RGB here so downstream stages never see
//! a single-channel image.

pub mod error;
pub mod frame;

pub use error::ImageError;
pub use frame::RgbFrame;

use crates_image::codecs::jpeg::JpegEncoder;
use crates_image::{DynamicImage, ExtendedColorType};

/// Decode a JPEG buffer into an `RgbFrame`.
///
/// Empty, corrupt, and truncated buffers return `ImageError::Decode`.
/// Grayscale images are expanded to three channels; RGBA and other color
/// types are converted to RGB.
pub fn decode_jpeg(data: &[u8]) -> Result<RgbFrame, ImageError> {
    if data.is_empty() {
        return Err(ImageError::Decode("empty buffer".to_string()));
    }

    let img = crates_image::load_from_memory(data)?;

    match img {
        DynamicImage::ImageRgb8(buf) => {
            let (width, height) = buf.dimensions();
            RgbFrame::new(width, height, buf.into_raw())
        }
        DynamicImage::ImageLuma8(buf) => {
            let (width, height) = buf.dimensions();
            let mut rgb = Vec::with_capacity(buf.len() * 3);
            for &luma in buf.as_raw() {
                rgb.extend_from_slice(&[luma, luma, luma]);
            }
            RgbFrame::new(width, height, rgb)
        }
        other => {
            let rgb = other.to_rgb8();
            let (width, height) = rgb.dimensions();
            RgbFrame::new(width, height, rgb.into_raw())
        }
    }
}

/// Encode an `RgbFrame` as JPEG at the given quality (1-100).
pub fn encode_jpeg(frame: &RgbFrame, quality: u8) -> Result<Vec<u8>, ImageError> {
    let mut buf = Vec::new();
    JpegEncoder::new_with_quality(&mut buf, quality)
        .encode(
            frame.data(),
            frame.width(),
            frame.height(),
            ExtendedColorType::Rgb8,
        )
        .map_err(|e| ImageError::Encode(e.to_string()))?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient_frame(width: u32, height: u32) -> RgbFrame {
        let mut data = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                data.push((x * 255 / width.max(1)) as u8);
                data.push((y * 255 / height.max(1)) as u8);
                data.push(128);
            }
        }
        RgbFrame::new(width, height, data).unwrap()
    }

    #[test]
    fn test_encode_decode_preserves_dimensions() {
        let frame = gradient_frame(64, 48);
        let jpeg = encode_jpeg(&frame, 90).expect("encode failed");
        let decoded = decode_jpeg(&jpeg).expect("decode failed");
        assert_eq!(decoded.width(), 64);
        assert_eq!(decoded.height(), 48);
        assert_eq!(decoded.data().len(), 64 * 48 * 3);
    }

    #[test]
    fn test_decode_empty_buffer_fails() {
        assert!(decode_jpeg(&[]).is_err());
    }

    #[test]
    fn test_decode_garbage_fails() {
        assert!(decode_jpeg(&[0xde, 0xad, 0xbe, 0xef]).is_err());
    }

    #[test]
    fn test_decode_truncated_jpeg_fails() {
        let frame = gradient_frame(32, 32);
        let jpeg = encode_jpeg(&frame, 90).unwrap();
        assert!(decode_jpeg(&jpeg[..jpeg.len() / 2]).is_err());
    }

    #[test]
    fn test_grayscale_expands_to_three_channels() {
        // Encode a grayscale JPEG directly through the image crate
        let mut jpeg = Vec::new();
        let luma: Vec<u8> = (0..16u32 * 16).map(|i| (i % 256) as u8).collect();
        JpegEncoder::new_with_quality(&mut jpeg, 90)
            .encode(&luma, 16, 16, ExtendedColorType::L8)
            .unwrap();

        let decoded = decode_jpeg(&jpeg).expect("decode failed");
        assert_eq!(decoded.data().len(), 16 * 16 * 3);
        // Every pixel has equal R, G, B
        for px in decoded.data().chunks_exact(3) {
            assert_eq!(px[0], px[1]);
            assert_eq!(px[1], px[2]);
        }
    }

    #[test]
    fn test_frame_rejects_wrong_buffer_length() {
        assert!(RgbFrame::new(4, 4, vec![0; 10]).is_err());
    }
}
