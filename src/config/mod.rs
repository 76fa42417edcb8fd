//! Persisted spectrometer settings.
//!
//! Crop size and calibration survive restarts. Values that were never
//! stored (or were stored out of range) fall back to the defaults below.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::calibration::CalibrationMap;
use crate::crop::CropSize;
use crate::error::Result;
use crate::histogram::HistogramConfig;
use crate::overlay::OverlayStyle;

const DEFAULT_CROP_WIDTH: f32 = 0.05;
const DEFAULT_CROP_HEIGHT: f32 = 0.2;
/// Mercury line.
const DEFAULT_LOWER_NM: f32 = 437.0;
/// Europium line.
const DEFAULT_UPPER_NM: f32 = 612.0;
const DEFAULT_LOWER_NM_POSITION: f32 = 0.2;
const DEFAULT_UPPER_NM_POSITION: f32 = 0.8;
const DEFAULT_ANALYSIS_INTERVAL: u32 = 10;

/// Smallest stored crop fractions still taken as set by the user.
const MIN_STORED_CROP_WIDTH: f32 = 0.01;
const MIN_STORED_CROP_HEIGHT: f32 = 0.1;

/// Widest border or outline kept from a settings file, in pixels.
pub const MAX_OVERLAY_WIDTH: u32 = 64;

/// Clamp a reference line position to the crop, `[0, 1]`. NaN maps to 0.
pub fn clamp_position(position: f32) -> f32 {
    if position.is_nan() {
        0.0
    } else {
        position.clamp(0.0, 1.0)
    }
}

fn default_crop_width() -> f32 {
    DEFAULT_CROP_WIDTH
}

fn default_crop_height() -> f32 {
    DEFAULT_CROP_HEIGHT
}

fn default_lower_nm() -> f32 {
    DEFAULT_LOWER_NM
}

fn default_upper_nm() -> f32 {
    DEFAULT_UPPER_NM
}

fn default_lower_nm_position() -> f32 {
    DEFAULT_LOWER_NM_POSITION
}

fn default_upper_nm_position() -> f32 {
    DEFAULT_UPPER_NM_POSITION
}

fn default_analysis_interval() -> u32 {
    DEFAULT_ANALYSIS_INTERVAL
}

/// User settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename = "SpectrometerSettings")]
pub struct Settings {
    /// Crop width as a fraction of the frame width.
    #[serde(default = "default_crop_width")]
    pub crop_width: f32,
    /// Crop height as a fraction of the frame height.
    #[serde(default = "default_crop_height")]
    pub crop_height: f32,
    /// Wavelength of the lower reference line.
    #[serde(default = "default_lower_nm")]
    pub lower_nm: f32,
    /// Wavelength of the upper reference line.
    #[serde(default = "default_upper_nm")]
    pub upper_nm: f32,
    /// Where the lower reference line sits, as a fraction of the crop width.
    #[serde(default = "default_lower_nm_position")]
    pub lower_nm_position: f32,
    /// Where the upper reference line sits, as a fraction of the crop width.
    #[serde(default = "default_upper_nm_position")]
    pub upper_nm_position: f32,
    /// Analyse every n-th frame.
    #[serde(default = "default_analysis_interval")]
    pub analysis_interval: u32,
    #[serde(default)]
    pub overlay: OverlayStyle,
    #[serde(default)]
    pub histogram: HistogramConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            crop_width: DEFAULT_CROP_WIDTH,
            crop_height: DEFAULT_CROP_HEIGHT,
            lower_nm: DEFAULT_LOWER_NM,
            upper_nm: DEFAULT_UPPER_NM,
            lower_nm_position: DEFAULT_LOWER_NM_POSITION,
            upper_nm_position: DEFAULT_UPPER_NM_POSITION,
            analysis_interval: DEFAULT_ANALYSIS_INTERVAL,
            overlay: OverlayStyle::default(),
            histogram: HistogramConfig::default(),
        }
    }
}

impl Settings {
    /// Replace unset or out-of-range values with defaults.
    pub fn sanitize(&mut self) {
        if !(self.crop_width > MIN_STORED_CROP_WIDTH) {
            self.crop_width = DEFAULT_CROP_WIDTH;
        }
        if !(self.crop_height > MIN_STORED_CROP_HEIGHT) {
            self.crop_height = DEFAULT_CROP_HEIGHT;
        }
        if !(self.lower_nm > 0.0) {
            self.lower_nm = DEFAULT_LOWER_NM;
        }
        if !(self.upper_nm > 0.0) {
            self.upper_nm = DEFAULT_UPPER_NM;
        }
        if !(self.lower_nm_position > 0.0) {
            self.lower_nm_position = DEFAULT_LOWER_NM_POSITION;
        }
        if !(self.upper_nm_position > 0.0) {
            self.upper_nm_position = DEFAULT_UPPER_NM_POSITION;
        }
        self.lower_nm_position = clamp_position(self.lower_nm_position);
        self.upper_nm_position = clamp_position(self.upper_nm_position);
        self.overlay.border_width = self.overlay.border_width.min(MAX_OVERLAY_WIDTH);
        self.overlay.outline_width = self.overlay.outline_width.min(MAX_OVERLAY_WIDTH);
        self.analysis_interval = self.analysis_interval.max(1);
    }

    /// Centered crop described by the stored fractions.
    pub fn crop_size(&self) -> Result<CropSize> {
        CropSize::new(self.crop_width, self.crop_height)
    }

    /// Column to wavelength map for a crop `width` columns wide.
    pub fn calibration_map(&self, width: u32) -> Result<CalibrationMap> {
        CalibrationMap::from_reference_positions(
            self.lower_nm as f64,
            self.lower_nm_position as f64,
            self.upper_nm as f64,
            self.upper_nm_position as f64,
            width,
        )
    }

    /// Load settings; `.json` files are parsed as JSON, anything else as XML.
    pub fn load_from_file(path: &Path) -> std::result::Result<Self, SettingsError> {
        let contents = fs::read_to_string(path).map_err(SettingsError::Io)?;
        let mut settings: Self = if is_json(path) {
            serde_json::from_str(&contents).map_err(SettingsError::JsonParse)?
        } else {
            quick_xml::de::from_str(&contents).map_err(SettingsError::XmlParse)?
        };
        settings.sanitize();
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Save settings, choosing the format from the extension like [`Settings::load_from_file`].
    pub fn save_to_file(&self, path: &Path) -> std::result::Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(SettingsError::Io)?;
            }
        }

        let contents = if is_json(path) {
            serde_json::to_string_pretty(self).map_err(SettingsError::JsonWrite)?
        } else {
            let xml = quick_xml::se::to_string(self).map_err(SettingsError::XmlWrite)?;
            format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n{}", xml)
        };

        fs::write(path, contents).map_err(SettingsError::Io)?;
        log::debug!("Saved settings to {}", path.display());
        Ok(())
    }

    /// Settings file in the platform config directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut p| {
            p.push("Spectrometer");
            p.push("settings.json");
            p
        })
    }

    /// Load from the default path, falling back to defaults.
    pub fn load() -> Self {
        let Some(path) = Self::default_path() else {
            return Self::default();
        };

        if !path.exists() {
            return Self::default();
        }

        match Self::load_from_file(&path) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Ignoring unreadable settings {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save to the default path.
    pub fn save(&self) -> std::result::Result<(), SettingsError> {
        let path = Self::default_path().ok_or(SettingsError::NoConfigDir)?;
        self.save_to_file(&path)
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().map(|e| e == "json").unwrap_or(false)
}

/// Settings-related errors
#[derive(Debug)]
pub enum SettingsError {
    Io(std::io::Error),
    JsonParse(serde_json::Error),
    JsonWrite(serde_json::Error),
    XmlParse(quick_xml::DeError),
    XmlWrite(quick_xml::SeError),
    NoConfigDir,
}

impl std::fmt::Display for SettingsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SettingsError::Io(e) => write!(f, "IO error: {}", e),
            SettingsError::JsonParse(e) => write!(f, "JSON parse error: {}", e),
            SettingsError::JsonWrite(e) => write!(f, "JSON write error: {}", e),
            SettingsError::XmlParse(e) => write!(f, "XML parse error: {}", e),
            SettingsError::XmlWrite(e) => write!(f, "XML write error: {}", e),
            SettingsError::NoConfigDir => write!(f, "Could not find config directory"),
        }
    }
}

impl std::error::Error for SettingsError {}
