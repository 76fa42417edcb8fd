//! Fixed border around display images.

use crate::frame::Frame;
use crate::overlay::{self, OverlayStyle};

/// Copy of `frame` with the default red border painted over its edge pixels.
///
/// Edge pixels are overwritten, so repeated application does not grow the border.
pub fn red_border(frame: &Frame) -> Frame {
    draw_border(frame, &OverlayStyle::default())
}

/// Copy of `frame` with a border in the style's colour and width.
pub fn draw_border(frame: &Frame, style: &OverlayStyle) -> Frame {
    let mut bordered = frame.clone();
    overlay::inset_border(bordered.as_rgba_mut(), style.border_width, style.border_color.into());
    bordered
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const GRAY: Rgba<u8> = Rgba([80, 80, 80, 255]);

    #[test]
    fn test_border_pixels() {
        let frame = Frame::filled(10, 8, GRAY).unwrap();
        let bordered = red_border(&frame);
        assert_eq!(bordered.dimensions(), (10, 8));

        assert_eq!(bordered.pixel(0, 0), Some(RED));
        assert_eq!(bordered.pixel(1, 4), Some(RED));
        assert_eq!(bordered.pixel(9, 7), Some(RED));
        assert_eq!(bordered.pixel(5, 6), Some(RED));
        assert_eq!(bordered.pixel(2, 2), Some(GRAY));
        assert_eq!(bordered.pixel(7, 5), Some(GRAY));
    }

    #[test]
    fn test_border_is_idempotent() {
        let frame = Frame::filled(12, 12, GRAY).unwrap();
        let once = red_border(&frame);
        let twice = red_border(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_custom_width() {
        let style = OverlayStyle {
            border_width: 0,
            ..OverlayStyle::default()
        };
        let frame = Frame::filled(4, 4, GRAY).unwrap();
        assert_eq!(draw_border(&frame, &style), frame);
    }
}
