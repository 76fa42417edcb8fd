//! Crop extraction for analysis and crop marking for display.

mod region;

pub use region::{CropSize, Region};

use image::imageops;

use crate::error::Result;
use crate::frame::Frame;
use crate::overlay::{self, OverlayStyle};

/// Copy the pixels inside `region` into a new frame.
pub fn extract_crop(frame: &Frame, region: Region) -> Result<Frame> {
    region.validate_for(frame)?;
    let view = imageops::crop_imm(frame.as_rgba(), region.x, region.y, region.width, region.height);
    Frame::new(view.to_image())
}

/// Copy of the full frame with `region` outlined in the default style.
pub fn display_crop(frame: &Frame, region: Region) -> Result<Frame> {
    display_crop_with_style(frame, region, &OverlayStyle::default())
}

/// Copy of the full frame with `region` outlined.
///
/// The outline sits outside the region, so the region's own pixels match
/// what [`extract_crop`] returns.
pub fn display_crop_with_style(frame: &Frame, region: Region, style: &OverlayStyle) -> Result<Frame> {
    region.validate_for(frame)?;
    let mut display = frame.clone();
    overlay::outline_rect(
        display.as_rgba_mut(),
        region.x,
        region.y,
        region.width,
        region.height,
        style.outline_width,
        style.outline_color.into(),
    );
    Ok(display)
}

/// Extract a `width` x `height` crop centered in the frame.
pub fn extract_centered(frame: &Frame, height: u32, width: u32) -> Result<Frame> {
    let region = Region::centered(frame.width(), frame.height(), width, height)?;
    extract_crop(frame, region)
}

/// Outline a `width` x `height` crop centered in the frame.
pub fn display_centered(frame: &Frame, height: u32, width: u32) -> Result<Frame> {
    let region = Region::centered(frame.width(), frame.height(), width, height)?;
    display_crop(frame, region)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProcessingError;
    use image::{Rgba, RgbaImage};

    fn gradient(w: u32, h: u32) -> Frame {
        Frame::new(RgbaImage::from_fn(w, h, |x, y| Rgba([x as u8, y as u8, 7, 255]))).unwrap()
    }

    #[test]
    fn test_extract_dimensions_and_content() {
        let frame = gradient(100, 50);
        let crop = extract_crop(&frame, Region::new(10, 10, 20, 20).unwrap()).unwrap();
        assert_eq!(crop.dimensions(), (20, 20));
        assert_eq!(crop.pixel(0, 0), Some(Rgba([10, 10, 7, 255])));
        assert_eq!(crop.pixel(19, 19), Some(Rgba([29, 29, 7, 255])));
    }

    #[test]
    fn test_extract_out_of_bounds() {
        let frame = gradient(100, 50);
        let result = extract_crop(&frame, Region::new(90, 0, 20, 20).unwrap());
        assert!(matches!(result, Err(ProcessingError::InvalidRegion(_))));
    }

    #[test]
    fn test_extract_does_not_mutate_input() {
        let frame = gradient(30, 30);
        let before = frame.clone();
        let _ = extract_crop(&frame, Region::new(1, 1, 5, 5).unwrap()).unwrap();
        let _ = display_crop(&frame, Region::new(1, 1, 5, 5).unwrap()).unwrap();
        assert_eq!(frame, before);
    }

    #[test]
    fn test_display_keeps_dimensions() {
        let frame = gradient(100, 50);
        let region = Region::new(10, 10, 20, 20).unwrap();
        let display = display_crop(&frame, region).unwrap();
        assert_eq!(display.dimensions(), frame.dimensions());

        // Region interior untouched, outline just outside it.
        assert_eq!(display.pixel(10, 10), frame.pixel(10, 10));
        assert_eq!(display.pixel(29, 29), frame.pixel(29, 29));
        assert_eq!(display.pixel(9, 9), Some(Rgba([0, 255, 0, 255])));
        assert_eq!(display.pixel(30, 30), Some(Rgba([0, 255, 0, 255])));
        assert_eq!(display.pixel(50, 5), frame.pixel(50, 5));
    }

    #[test]
    fn test_display_out_of_bounds() {
        let frame = gradient(100, 50);
        assert!(display_crop(&frame, Region::new(0, 40, 10, 20).unwrap()).is_err());
    }

    #[test]
    fn test_centered_variants() {
        let frame = gradient(100, 50);
        let crop = extract_centered(&frame, 10, 20).unwrap();
        assert_eq!(crop.dimensions(), (20, 10));
        assert_eq!(crop.pixel(0, 0), Some(Rgba([40, 20, 7, 255])));

        let display = display_centered(&frame, 10, 20).unwrap();
        assert_eq!(display.dimensions(), (100, 50));

        assert!(extract_centered(&frame, 60, 20).is_err());
        assert!(display_centered(&frame, 10, 101).is_err());
        assert!(extract_centered(&frame, 0, 20).is_err());
    }
}
