//! Wavelength calibration: column to nm mapping and calibration overlays.

mod map;

pub use map::{
    calibrate_profile, round_to_nearest, CalibrationMap, CalibrationRange, ReferencePoint,
    SpectrumSample,
};

use crate::error::{ProcessingError, Result};
use crate::frame::Frame;
use crate::overlay::{self, OverlayStyle};

/// Upper bound on ticks drawn per frame.
const MAX_TICKS: usize = 4096;

/// Annotate a copy of `frame` with wavelength ticks, column 0 at
/// `lower_nm` and the last column at `upper_nm`.
pub fn display_calibration(frame: &Frame, lower_nm: f64, upper_nm: f64) -> Result<Frame> {
    display_calibration_with_style(frame, lower_nm, upper_nm, &OverlayStyle::default())
}

pub fn display_calibration_with_style(
    frame: &Frame,
    lower_nm: f64,
    upper_nm: f64,
    style: &OverlayStyle,
) -> Result<Frame> {
    let range = CalibrationRange::new(lower_nm, upper_nm)?;
    let map = CalibrationMap::from_range(range, frame.width())?;

    let interval = style.tick_interval_nm;
    if !(interval.is_finite() && interval > 0.0) {
        return Err(ProcessingError::InvalidCalibration(format!(
            "tick interval {} nm must be positive",
            interval
        )));
    }

    let mut annotated = frame.clone();
    let height = frame.height() as f32;
    let minor_len = (style.tick_length * height).round() as u32;
    let major_len = (style.major_tick_length * height).round() as u32;
    let last_column = (frame.width() - 1) as f64;

    let first = (range.lower_nm / interval).ceil() * interval;
    let steps = ((range.upper_nm - first) / interval).floor();
    let count = if steps >= 0.0 {
        steps.min((MAX_TICKS - 1) as f64) as usize + 1
    } else {
        0
    };

    for k in 0..count {
        let nm = first + k as f64 * interval;
        if nm > range.upper_nm {
            break;
        }
        let column = map.column_at(nm).round().clamp(0.0, last_column) as u32;
        let length = if is_major(nm, style.major_tick_interval_nm, interval) {
            major_len
        } else {
            minor_len
        };
        overlay::bottom_tick(annotated.as_rgba_mut(), column, length, style.tick_color.into());
    }

    log::trace!("Drew {} calibration ticks over {:.1}-{:.1} nm", count, lower_nm, upper_nm);
    Ok(annotated)
}

fn is_major(nm: f64, major_interval: f64, minor_interval: f64) -> bool {
    if !(major_interval.is_finite() && major_interval > 0.0) {
        return false;
    }
    (round_to_nearest(nm, major_interval) - nm).abs() < minor_interval * 1e-6
}

/// Mark the two reference positions (fractions of the width) with full-height lines.
pub fn display_reference_markers(frame: &Frame, lower_position: f64, upper_position: f64) -> Result<Frame> {
    display_reference_markers_with_style(frame, lower_position, upper_position, &OverlayStyle::default())
}

pub fn display_reference_markers_with_style(
    frame: &Frame,
    lower_position: f64,
    upper_position: f64,
    style: &OverlayStyle,
) -> Result<Frame> {
    for position in [lower_position, upper_position] {
        if !(0.0..=1.0).contains(&position) {
            return Err(ProcessingError::InvalidCalibration(format!(
                "reference position {} must lie in [0, 1]",
                position
            )));
        }
    }

    let mut annotated = frame.clone();
    let (width, height) = frame.dimensions();
    let last_column = (width - 1) as f64;

    for (position, color) in [
        (lower_position, style.lower_marker_color),
        (upper_position, style.upper_marker_color),
    ] {
        let column = (position * last_column).round() as i64;
        overlay::fill_rect(annotated.as_rgba_mut(), column, 0, 1, height, color.into());
    }

    Ok(annotated)
}
