//! Overlay drawing shared by the crop outline, calibration ticks and border.

use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;
use serde::{Deserialize, Serialize};

/// 8-bit RGBA colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RgbaColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl RgbaColor {
    pub const RED: Self = Self::opaque(255, 0, 0);
    pub const GREEN: Self = Self::opaque(0, 255, 0);
    pub const BLUE: Self = Self::opaque(0, 0, 255);
    pub const WHITE: Self = Self::opaque(255, 255, 255);

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

impl From<RgbaColor> for Rgba<u8> {
    fn from(c: RgbaColor) -> Self {
        Rgba([c.r, c.g, c.b, c.a])
    }
}

/// Colours, widths and tick spacing used by every annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayStyle {
    /// Border painted by the border annotator.
    pub border_color: RgbaColor,
    /// Border width in pixels.
    pub border_width: u32,
    /// Outline marking the crop region on the display frame.
    pub outline_color: RgbaColor,
    /// Outline width in pixels, drawn outside the region.
    pub outline_width: u32,
    /// Calibration tick colour.
    pub tick_color: RgbaColor,
    /// Spacing of minor ticks in nm.
    pub tick_interval_nm: f64,
    /// Spacing of major ticks in nm.
    pub major_tick_interval_nm: f64,
    /// Minor tick length as a fraction of the frame height.
    pub tick_length: f32,
    /// Major tick length as a fraction of the frame height.
    pub major_tick_length: f32,
    /// Marker for the lower reference line.
    pub lower_marker_color: RgbaColor,
    /// Marker for the upper reference line.
    pub upper_marker_color: RgbaColor,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            border_color: RgbaColor::RED,
            border_width: 2,
            outline_color: RgbaColor::GREEN,
            outline_width: 2,
            tick_color: RgbaColor::WHITE,
            tick_interval_nm: 10.0,
            major_tick_interval_nm: 50.0,
            tick_length: 0.15,
            major_tick_length: 0.3,
            lower_marker_color: RgbaColor::BLUE,
            upper_marker_color: RgbaColor::RED,
        }
    }
}

/// Fill a rectangle, clipped to the canvas. Zero-sized rectangles are skipped.
pub(crate) fn fill_rect(canvas: &mut RgbaImage, x: i64, y: i64, width: u32, height: u32, color: Rgba<u8>) {
    fill_span(canvas, x, y, x + width as i64, y + height as i64, color);
}

/// Fill the half-open box `[x0, x1) x [y0, y1)`, clipped to the canvas.
fn fill_span(canvas: &mut RgbaImage, x0: i64, y0: i64, x1: i64, y1: i64, color: Rgba<u8>) {
    let (cw, ch) = canvas.dimensions();
    let (x0, y0) = (x0.max(0), y0.max(0));
    let (x1, y1) = (x1.min(cw as i64), y1.min(ch as i64));
    if x1 <= x0 || y1 <= y0 {
        return;
    }
    let rect = Rect::at(x0 as i32, y0 as i32).of_size((x1 - x0) as u32, (y1 - y0) as u32);
    draw_filled_rect_mut(canvas, rect, color);
}

/// Draw a frame of `thickness` pixels around the rectangle, entirely outside it.
pub(crate) fn outline_rect(
    canvas: &mut RgbaImage,
    x: u32,
    y: u32,
    width: u32,
    height: u32,
    thickness: u32,
    color: Rgba<u8>,
) {
    let (x, y, t) = (x as i64, y as i64, thickness as i64);
    let (right, bottom) = (x + width as i64, y + height as i64);

    fill_span(canvas, x - t, y - t, right + t, y, color);
    fill_span(canvas, x - t, bottom, right + t, bottom + t, color);
    fill_span(canvas, x - t, y, x, bottom, color);
    fill_span(canvas, right, y, right + t, bottom, color);
}

/// Paint the outermost `thickness` pixels of the canvas.
pub(crate) fn inset_border(canvas: &mut RgbaImage, thickness: u32, color: Rgba<u8>) {
    let (w, h) = canvas.dimensions();
    let tx = thickness.min(w);
    let ty = thickness.min(h);

    fill_rect(canvas, 0, 0, w, ty, color);
    fill_rect(canvas, 0, h as i64 - ty as i64, w, ty, color);
    fill_rect(canvas, 0, 0, tx, h, color);
    fill_rect(canvas, w as i64 - tx as i64, 0, tx, h, color);
}

/// Vertical line one pixel wide rising `length` pixels from the bottom edge.
pub(crate) fn bottom_tick(canvas: &mut RgbaImage, column: u32, length: u32, color: Rgba<u8>) {
    let h = canvas.height();
    let length = length.clamp(1, h);
    fill_rect(canvas, column as i64, (h - length) as i64, 1, length, color);
}
