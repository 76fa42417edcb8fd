//! Export of spectra, histograms and annotated frames.

use serde::Serialize;
use std::path::Path;

use crate::calibration::SpectrumSample;
use crate::frame::Frame;
use crate::histogram::Histogram;
use crate::spectrum::IntensityProfile;

/// Spectrum document written by [`SpectrumExporter::export_spectrum_json`].
#[derive(Debug, Serialize)]
struct SpectrumDocument<'a> {
    /// Wavelengths at the first and last columns, when calibrated.
    spectral_extent: Option<(f64, f64)>,
    profile: &'a [f64],
    samples: &'a [SpectrumSample],
}

/// Writes processing results to disk.
pub struct SpectrumExporter;

impl SpectrumExporter {
    /// Export the column profile and its calibrated samples as JSON.
    pub fn export_spectrum_json(
        profile: &IntensityProfile,
        samples: &[SpectrumSample],
        spectral_extent: Option<(f64, f64)>,
        path: &Path,
    ) -> std::io::Result<()> {
        let doc = SpectrumDocument {
            spectral_extent,
            profile: profile.values(),
            samples,
        };
        let json = serde_json::to_string_pretty(&doc)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

        std::fs::write(path, json)
    }

    /// Export histogram counts as JSON.
    pub fn export_histogram_json(histogram: &Histogram, path: &Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(histogram)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

        std::fs::write(path, json)
    }

    /// Export a frame as 8-bit RGBA PNG.
    pub fn export_frame_png(frame: &Frame, path: &Path) -> std::io::Result<()> {
        frame
            .as_rgba()
            .save_with_format(path, image::ImageFormat::Png)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::histogram::{HistogramBuilder, HistogramConfig};
    use image::Rgba;

    #[test]
    fn test_export_spectrum_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spectrum.json");
        let profile = IntensityProfile::new(vec![1.0, 2.0]);
        let samples = vec![
            SpectrumSample { wavelength_nm: 400.0, intensity: 1.0 },
            SpectrumSample { wavelength_nm: 700.0, intensity: 2.0 },
        ];
        SpectrumExporter::export_spectrum_json(&profile, &samples, Some((400.0, 700.0)), &path).unwrap();

        let value: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["profile"].as_array().unwrap().len(), 2);
        assert_eq!(value["samples"][1]["wavelength_nm"], 700.0);
    }

    #[test]
    fn test_export_histogram_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("histogram.json");
        let frame = Frame::filled(4, 4, Rgba([0, 0, 0, 255])).unwrap();
        let hist = HistogramBuilder::new(HistogramConfig::default()).unwrap().build(&frame);
        SpectrumExporter::export_histogram_json(&hist, &path).unwrap();

        let back: Histogram = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(back.counts()[0], 16);
    }

    #[test]
    fn test_export_frame_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.png");
        let frame = Frame::filled(6, 3, Rgba([1, 2, 3, 255])).unwrap();
        SpectrumExporter::export_frame_png(&frame, &path).unwrap();

        let loaded = image::open(&path).unwrap();
        assert_eq!(Frame::from_dynamic(&loaded).unwrap(), frame);
    }
}
