//! Two-point linear mapping between pixel columns and wavelengths.

use serde::{Deserialize, Serialize};

use crate::error::{ProcessingError, Result};
use crate::spectrum::IntensityProfile;

/// Wavelength bounds in nm, strictly increasing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationRange {
    pub lower_nm: f64,
    pub upper_nm: f64,
}

impl CalibrationRange {
    pub fn new(lower_nm: f64, upper_nm: f64) -> Result<Self> {
        if !lower_nm.is_finite() || !upper_nm.is_finite() {
            return Err(ProcessingError::InvalidCalibration(format!(
                "bounds must be finite ({} .. {})",
                lower_nm, upper_nm
            )));
        }
        if upper_nm <= lower_nm {
            return Err(ProcessingError::InvalidCalibration(format!(
                "upper bound {} nm must exceed lower bound {} nm",
                upper_nm, lower_nm
            )));
        }
        Ok(Self { lower_nm, upper_nm })
    }

    pub fn span(&self) -> f64 {
        self.upper_nm - self.lower_nm
    }
}

/// A pixel column with a known wavelength.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferencePoint {
    pub column: f64,
    pub nm: f64,
}

/// Linear column to wavelength map through two reference points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationMap {
    lower: ReferencePoint,
    upper: ReferencePoint,
    width: u32,
}

impl CalibrationMap {
    /// Map for a `width`-column crop from two reference points.
    pub fn new(lower: ReferencePoint, upper: ReferencePoint, width: u32) -> Result<Self> {
        CalibrationRange::new(lower.nm, upper.nm)?;
        if width == 0 {
            return Err(ProcessingError::InvalidCalibration("crop has no columns".to_string()));
        }
        if !lower.column.is_finite() || !upper.column.is_finite() {
            return Err(ProcessingError::InvalidCalibration(
                "reference columns must be finite".to_string(),
            ));
        }
        if (upper.column - lower.column).abs() < f64::EPSILON {
            return Err(ProcessingError::InvalidCalibration(format!(
                "reference columns coincide at {}",
                lower.column
            )));
        }
        Ok(Self { lower, upper, width })
    }

    /// Column 0 maps to the lower bound, column `width - 1` to the upper bound.
    pub fn from_range(range: CalibrationRange, width: u32) -> Result<Self> {
        if width < 2 {
            return Err(ProcessingError::InvalidCalibration(format!(
                "{} column crop cannot hold two reference columns",
                width
            )));
        }
        Self::new(
            ReferencePoint { column: 0.0, nm: range.lower_nm },
            ReferencePoint {
                column: (width - 1) as f64,
                nm: range.upper_nm,
            },
            width,
        )
    }

    /// Map from two known emission lines seen at fractional positions of the crop width.
    pub fn from_reference_positions(
        lower_nm: f64,
        lower_position: f64,
        upper_nm: f64,
        upper_position: f64,
        width: u32,
    ) -> Result<Self> {
        if width < 2 {
            return Err(ProcessingError::InvalidCalibration(format!(
                "{} column crop cannot hold two reference columns",
                width
            )));
        }
        let last = (width - 1) as f64;
        Self::new(
            ReferencePoint {
                column: lower_position * last,
                nm: lower_nm,
            },
            ReferencePoint {
                column: upper_position * last,
                nm: upper_nm,
            },
            width,
        )
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn reference_points(&self) -> (ReferencePoint, ReferencePoint) {
        (self.lower, self.upper)
    }

    /// Wavelength change per column.
    pub fn nm_per_column(&self) -> f64 {
        (self.upper.nm - self.lower.nm) / (self.upper.column - self.lower.column)
    }

    /// Wavelength at a (possibly fractional) column, extrapolating past the references.
    pub fn nm_at(&self, column: f64) -> f64 {
        self.lower.nm + (column - self.lower.column) * self.nm_per_column()
    }

    /// Column showing the given wavelength.
    pub fn column_at(&self, nm: f64) -> f64 {
        self.lower.column + (nm - self.lower.nm) / self.nm_per_column()
    }

    /// Wavelengths at the first and last columns.
    pub fn spectral_extent(&self) -> (f64, f64) {
        (self.nm_at(0.0), self.nm_at((self.width - 1) as f64))
    }
}

/// One point of a calibrated spectrum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpectrumSample {
    pub wavelength_nm: f64,
    pub intensity: f64,
}

/// Attach a wavelength to every column of the profile.
pub fn calibrate_profile(profile: &IntensityProfile, map: &CalibrationMap) -> Vec<SpectrumSample> {
    profile
        .values()
        .iter()
        .enumerate()
        .map(|(column, &intensity)| SpectrumSample {
            wavelength_nm: map.nm_at(column as f64),
            intensity,
        })
        .collect()
}

/// Round `value` to the nearest multiple of `step`.
pub fn round_to_nearest(value: f64, step: f64) -> f64 {
    (value / step).round() * step
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_validation() {
        assert!(CalibrationRange::new(400.0, 700.0).is_ok());
        assert!(CalibrationRange::new(700.0, 400.0).is_err());
        assert!(CalibrationRange::new(500.0, 500.0).is_err());
        assert!(CalibrationRange::new(f64::NAN, 500.0).is_err());
    }

    #[test]
    fn test_range_endpoints() {
        let map = CalibrationMap::from_range(CalibrationRange::new(400.0, 700.0).unwrap(), 300).unwrap();
        assert!((map.nm_at(0.0) - 400.0).abs() < 1e-9);
        assert!((map.nm_at(299.0) - 700.0).abs() < 1e-9);
        assert!((map.nm_at(149.0) - 549.4983).abs() < 1e-3);
    }

    #[test]
    fn test_monotonic() {
        let map = CalibrationMap::from_range(CalibrationRange::new(380.0, 720.0).unwrap(), 64).unwrap();
        let values: Vec<f64> = (0..64).map(|c| map.nm_at(c as f64)).collect();
        assert!(values.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_single_column_rejected() {
        let range = CalibrationRange::new(400.0, 700.0).unwrap();
        assert!(CalibrationMap::from_range(range, 1).is_err());
    }

    #[test]
    fn test_coinciding_columns_rejected() {
        let result = CalibrationMap::from_reference_positions(437.0, 0.5, 612.0, 0.5, 100);
        assert!(matches!(result, Err(ProcessingError::InvalidCalibration(_))));
    }

    #[test]
    fn test_reference_position_extent() {
        let map = CalibrationMap::from_reference_positions(437.0, 0.2, 612.0, 0.8, 101).unwrap();
        let (left, right) = map.spectral_extent();
        assert!((left - 378.6667).abs() < 1e-3);
        assert!((right - 670.3333).abs() < 1e-3);
        assert!((map.nm_at(20.0) - 437.0).abs() < 1e-9);
        assert!((map.nm_at(80.0) - 612.0).abs() < 1e-9);
    }

    #[test]
    fn test_column_at_inverts_nm_at() {
        let map = CalibrationMap::from_reference_positions(437.0, 0.2, 612.0, 0.8, 500).unwrap();
        for column in [0.0, 17.5, 250.0, 499.0] {
            assert!((map.column_at(map.nm_at(column)) - column).abs() < 1e-9);
        }
    }

    #[test]
    fn test_calibrate_profile() {
        let map = CalibrationMap::from_range(CalibrationRange::new(400.0, 500.0).unwrap(), 3).unwrap();
        let samples = calibrate_profile(&IntensityProfile::new(vec![1.0, 2.0, 3.0]), &map);
        assert_eq!(samples.len(), 3);
        assert!((samples[1].wavelength_nm - 450.0).abs() < 1e-9);
        assert_eq!(samples[2].intensity, 3.0);
    }

    #[test]
    fn test_round_to_nearest() {
        assert_eq!(round_to_nearest(437.0, 10.0), 440.0);
        assert_eq!(round_to_nearest(0.123, 0.05), 0.1);
    }
}
