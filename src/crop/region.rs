//! Crop rectangles: absolute pixel regions and fractional centered sizes.

use serde::{Deserialize, Serialize};

use crate::error::{ProcessingError, Result};
use crate::frame::Frame;

/// Rectangle in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    /// Create a region with a positive size.
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(ProcessingError::InvalidRegion(format!(
                "size {}x{} must be positive",
                width, height
            )));
        }
        Ok(Self { x, y, width, height })
    }

    /// Create a region from floating point scalars as they arrive from UI sliders.
    ///
    /// Non-finite or negative values fail; fractional values truncate toward zero.
    pub fn from_f32(x: f32, y: f32, width: f32, height: f32) -> Result<Self> {
        let to_px = |name: &str, v: f32| -> Result<u32> {
            if !v.is_finite() || v < 0.0 {
                return Err(ProcessingError::InvalidRegion(format!("{} is {}", name, v)));
            }
            if v >= u32::MAX as f32 {
                return Err(ProcessingError::InvalidRegion(format!("{} is out of range", name)));
            }
            Ok(v as u32)
        };
        Self::new(
            to_px("x", x)?,
            to_px("y", y)?,
            to_px("width", width)?,
            to_px("height", height)?,
        )
    }

    /// Region of the given size centered in a `frame_width` x `frame_height` frame.
    ///
    /// Offsets use truncating division, so an odd leftover pixel lands on
    /// the right/bottom side.
    pub fn centered(frame_width: u32, frame_height: u32, width: u32, height: u32) -> Result<Self> {
        let region = Self::new(0, 0, width, height)?;
        if width > frame_width || height > frame_height {
            return Err(ProcessingError::InvalidRegion(format!(
                "centered {}x{} crop exceeds {}x{} frame",
                width, height, frame_width, frame_height
            )));
        }
        Ok(Self {
            x: (frame_width - width) / 2,
            y: (frame_height - height) / 2,
            ..region
        })
    }

    /// One past the last column.
    pub fn right(&self) -> u64 {
        self.x as u64 + self.width as u64
    }

    /// One past the last row.
    pub fn bottom(&self) -> u64 {
        self.y as u64 + self.height as u64
    }

    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Check that the region lies within the frame.
    pub fn validate_for(&self, frame: &Frame) -> Result<()> {
        let (fw, fh) = frame.dimensions();
        if self.width == 0 || self.height == 0 {
            return Err(ProcessingError::InvalidRegion(format!(
                "size {}x{} must be positive",
                self.width, self.height
            )));
        }
        if self.right() > fw as u64 || self.bottom() > fh as u64 {
            return Err(ProcessingError::InvalidRegion(format!(
                "{}x{} at ({}, {}) exceeds {}x{} frame",
                self.width, self.height, self.x, self.y, fw, fh
            )));
        }
        Ok(())
    }
}

/// Centered crop expressed as fractions of the frame size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropSize {
    /// Crop width relative to the frame width, in (0, 1].
    pub width_fraction: f32,
    /// Crop height relative to the frame height, in (0, 1].
    pub height_fraction: f32,
}

impl CropSize {
    pub fn new(width_fraction: f32, height_fraction: f32) -> Result<Self> {
        let valid = |f: f32| f.is_finite() && f > 0.0 && f <= 1.0;
        if !valid(width_fraction) || !valid(height_fraction) {
            return Err(ProcessingError::InvalidRegion(format!(
                "crop fractions {} x {} must lie in (0, 1]",
                width_fraction, height_fraction
            )));
        }
        Ok(Self {
            width_fraction,
            height_fraction,
        })
    }

    /// Resolve to a centered pixel region, at least one pixel in each direction.
    pub fn region_for(&self, frame: &Frame) -> Result<Region> {
        let (fw, fh) = frame.dimensions();
        let width = ((fw as f64 * self.width_fraction as f64) as u32).max(1);
        let height = ((fh as f64 * self.height_fraction as f64) as u32).max(1);
        Region::centered(fw, fh, width, height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn frame(w: u32, h: u32) -> Frame {
        Frame::filled(w, h, Rgba([0, 0, 0, 255])).unwrap()
    }

    #[test]
    fn test_zero_size_rejected() {
        assert!(Region::new(0, 0, 0, 5).is_err());
        assert!(Region::new(0, 0, 5, 0).is_err());
    }

    #[test]
    fn test_from_f32() {
        let region = Region::from_f32(10.9, 2.0, 20.5, 4.0).unwrap();
        assert_eq!(region, Region { x: 10, y: 2, width: 20, height: 4 });

        assert!(Region::from_f32(-1.0, 0.0, 5.0, 5.0).is_err());
        assert!(Region::from_f32(0.0, 0.0, f32::NAN, 5.0).is_err());
        assert!(Region::from_f32(0.0, 0.0, 0.5, 5.0).is_err());
    }

    #[test]
    fn test_centered_truncates() {
        // 10 - 5 = 5 leftover columns, 5 / 2 = 2
        let region = Region::centered(10, 7, 5, 2).unwrap();
        assert_eq!(region.x, 2);
        assert_eq!(region.y, 2);
        assert_eq!((region.width, region.height), (5, 2));
    }

    #[test]
    fn test_centered_too_large() {
        assert!(Region::centered(10, 10, 11, 5).is_err());
        assert!(Region::centered(10, 10, 5, 11).is_err());
        assert!(Region::centered(10, 10, 10, 10).is_ok());
    }

    #[test]
    fn test_validate_bounds() {
        let f = frame(100, 50);
        assert!(Region::new(10, 10, 20, 20).unwrap().validate_for(&f).is_ok());
        assert!(Region::new(90, 0, 20, 20).unwrap().validate_for(&f).is_err());
        assert!(Region::new(0, 40, 20, 20).unwrap().validate_for(&f).is_err());
        assert!(Region::new(80, 30, 20, 20).unwrap().validate_for(&f).is_ok());
    }

    #[test]
    fn test_crop_size_fractions() {
        let f = frame(1920, 1080);
        let region = CropSize::new(0.05, 0.2).unwrap().region_for(&f).unwrap();
        assert_eq!((region.width, region.height), (96, 216));
        assert_eq!((region.x, region.y), (912, 432));

        assert!(CropSize::new(0.0, 0.2).is_err());
        assert!(CropSize::new(0.5, 1.5).is_err());
    }

    #[test]
    fn test_crop_size_minimum_one_pixel() {
        let f = frame(10, 10);
        let region = CropSize::new(0.01, 0.01).unwrap().region_for(&f).unwrap();
        assert_eq!((region.width, region.height), (1, 1));
    }
}
