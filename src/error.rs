//! Error types shared by the processing modules.

use thiserror::Error;

/// Errors returned by crop, calibration, histogram and frame operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProcessingError {
    /// Region outside the frame bounds or with a non-positive size.
    #[error("Invalid region: {0}")]
    InvalidRegion(String),

    /// Wavelength bounds not strictly increasing, or coinciding reference columns.
    #[error("Invalid calibration: {0}")]
    InvalidCalibration(String),

    /// Empty or malformed pixel buffer.
    #[error("Invalid image: {0}")]
    InvalidImage(String),

    #[error("Invalid histogram configuration: {0}")]
    InvalidHistogram(String),
}

pub type Result<T> = std::result::Result<T, ProcessingError>;
