//! Spectrometer image pipeline
//!
//! Turns camera frames of a diffraction spectrum into calibrated intensity curves:
//! - Crop extraction and crop marking on the full frame
//! - Column intensity profiles
//! - Two-point wavelength calibration with tick overlays
//! - Intensity histograms and display borders
//! - A live processing session with persisted settings

pub mod border;
pub mod calibration;
pub mod config;
pub mod crop;
pub mod error;
pub mod export;
pub mod frame;
pub mod histogram;
pub mod overlay;
pub mod processor;
pub mod spectrum;

pub use error::{ProcessingError, Result};
pub use frame::Frame;
