//! Owned frame buffer passed across the processing API.
//!
//! Every operation borrows its input frame and hands back a freshly
//! allocated one, so display and analysis variants never alias.

use image::{DynamicImage, Rgba, RgbaImage};

use crate::error::{ProcessingError, Result};

/// Rec.601 luma weights (the ones OpenCV uses for RGB to gray).
const LUMA_R: f64 = 0.299;
const LUMA_G: f64 = 0.587;
const LUMA_B: f64 = 0.114;

/// An RGBA, 8 bits per channel image.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pixels: RgbaImage,
}

impl Frame {
    /// Number of interleaved channels per pixel.
    pub const CHANNELS: u8 = 4;
    /// Bits per channel sample.
    pub const BIT_DEPTH: u8 = 8;

    /// Wrap an RGBA image, rejecting empty ones.
    pub fn new(pixels: RgbaImage) -> Result<Self> {
        if pixels.width() == 0 || pixels.height() == 0 {
            return Err(ProcessingError::InvalidImage(format!(
                "empty frame ({}x{})",
                pixels.width(),
                pixels.height()
            )));
        }
        Ok(Self { pixels })
    }

    /// Convert any decoded image to RGBA8.
    pub fn from_dynamic(image: &DynamicImage) -> Result<Self> {
        Self::new(image.to_rgba8())
    }

    /// Build a frame from a raw interleaved RGBA buffer.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * Self::CHANNELS as usize;
        if data.len() != expected {
            return Err(ProcessingError::InvalidImage(format!(
                "buffer holds {} bytes, {}x{} RGBA needs {}",
                data.len(),
                width,
                height,
                expected
            )));
        }
        let pixels = RgbaImage::from_raw(width, height, data).ok_or_else(|| {
            ProcessingError::InvalidImage(format!("cannot build {}x{} frame", width, height))
        })?;
        Self::new(pixels)
    }

    /// Frame filled with a single colour.
    pub fn filled(width: u32, height: u32, color: Rgba<u8>) -> Result<Self> {
        Self::new(RgbaImage::from_pixel(width, height, color))
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    pub fn channels(&self) -> u8 {
        Self::CHANNELS
    }

    pub fn bit_depth(&self) -> u8 {
        Self::BIT_DEPTH
    }

    /// Total pixel count.
    pub fn pixel_count(&self) -> u64 {
        self.width() as u64 * self.height() as u64
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba<u8>> {
        if x < self.width() && y < self.height() {
            Some(*self.pixels.get_pixel(x, y))
        } else {
            None
        }
    }

    /// Luma of the pixel at (x, y), alpha ignored. Caller guarantees bounds.
    pub(crate) fn luma_at(&self, x: u32, y: u32) -> f64 {
        luma(self.pixels.get_pixel(x, y))
    }

    pub fn as_rgba(&self) -> &RgbaImage {
        &self.pixels
    }

    pub(crate) fn as_rgba_mut(&mut self) -> &mut RgbaImage {
        &mut self.pixels
    }

    pub fn into_rgba(self) -> RgbaImage {
        self.pixels
    }
}

impl TryFrom<RgbaImage> for Frame {
    type Error = ProcessingError;

    fn try_from(pixels: RgbaImage) -> Result<Self> {
        Self::new(pixels)
    }
}

/// Rec.601 luma of an RGBA pixel in 0.0-255.0.
pub fn luma(pixel: &Rgba<u8>) -> f64 {
    let [r, g, b, _] = pixel.0;
    LUMA_R * r as f64 + LUMA_G * g as f64 + LUMA_B * b as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_frame_rejected() {
        let result = Frame::new(RgbaImage::new(0, 10));
        assert!(matches!(result, Err(ProcessingError::InvalidImage(_))));
    }

    #[test]
    fn test_raw_buffer_length_checked() {
        let result = Frame::from_raw(4, 4, vec![0u8; 10]);
        assert!(matches!(result, Err(ProcessingError::InvalidImage(_))));

        let frame = Frame::from_raw(4, 4, vec![0u8; 64]).unwrap();
        assert_eq!(frame.dimensions(), (4, 4));
        assert_eq!(frame.channels(), 4);
        assert_eq!(frame.bit_depth(), 8);
    }

    #[test]
    fn test_luma_weights() {
        assert!((luma(&Rgba([255, 255, 255, 0])) - 255.0).abs() < 1e-9);
        assert!((luma(&Rgba([100, 0, 0, 255])) - 29.9).abs() < 1e-9);
        assert_eq!(luma(&Rgba([0, 0, 0, 255])), 0.0);
    }

    #[test]
    fn test_pixel_out_of_bounds() {
        let frame = Frame::filled(3, 2, Rgba([1, 2, 3, 4])).unwrap();
        assert_eq!(frame.pixel(2, 1), Some(Rgba([1, 2, 3, 4])));
        assert_eq!(frame.pixel(3, 0), None);
    }
}
