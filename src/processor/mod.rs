//! Live frame processing session.
//!
//! Feeds camera frames through crop, reduction, histogram and calibration,
//! and fans the results out to subscribers. Analysis runs only on every
//! `analysis_interval`-th frame; the display image is refreshed every time.

use crossbeam_channel::{Receiver, Sender, TrySendError};
use std::path::PathBuf;
use std::sync::Arc;

use crate::border;
use crate::calibration::{self, SpectrumSample};
use crate::crop;
use crate::error::{ProcessingError, Result};
use crate::config::{self, Settings};
use crate::frame::Frame;
use crate::histogram::{Histogram, HistogramBuilder};
use crate::spectrum::{self, IntensityProfile};

/// Output of one analysed frame.
#[derive(Debug, Clone)]
pub struct Analysis {
    /// Annotated analysis crop (reference markers while calibrating, border).
    pub crop: Frame,
    pub profile: IntensityProfile,
    pub histogram: Histogram,
    /// Profile with wavelengths attached, empty when the calibration is unusable.
    pub spectrum: Vec<SpectrumSample>,
    /// Wavelengths at the first and last crop columns.
    pub spectral_extent: Option<(f64, f64)>,
}

/// Snapshot published after each processed frame.
#[derive(Debug, Clone)]
pub struct ProcessedFrame {
    /// Sequence number of the frame, starting at 1.
    pub sequence: u64,
    /// Full frame with the crop region outlined.
    pub display: Frame,
    /// Most recent analysis; may stem from an earlier frame.
    pub analysis: Option<Arc<Analysis>>,
    /// Whether `analysis` was computed from this frame.
    pub analysed: bool,
}

/// Handle returned by [`FrameProcessor::subscribe`].
pub struct Subscription {
    pub id: u64,
    pub receiver: Receiver<Arc<ProcessedFrame>>,
}

struct Subscriber {
    id: u64,
    sender: Sender<Arc<ProcessedFrame>>,
}

/// Stateful processing session.
pub struct FrameProcessor {
    settings: Settings,
    settings_path: Option<PathBuf>,
    /// Keep analysing the held frame instead of incoming ones.
    pub freeze: bool,
    /// Draw reference markers on the analysis crop.
    pub calibrating: bool,
    source: Option<Frame>,
    frame_count: u64,
    countdown: u32,
    analysis: Option<Arc<Analysis>>,
    latest: Option<Arc<ProcessedFrame>>,
    subscribers: Vec<Subscriber>,
    next_subscriber_id: u64,
}

impl FrameProcessor {
    pub fn new(mut settings: Settings) -> Self {
        settings.sanitize();
        Self {
            settings,
            settings_path: None,
            freeze: false,
            calibrating: false,
            source: None,
            frame_count: 0,
            countdown: 0,
            analysis: None,
            latest: None,
            subscribers: Vec::new(),
            next_subscriber_id: 1,
        }
    }

    /// Persist every settings change to `path`.
    pub fn with_settings_path(mut self, path: PathBuf) -> Self {
        self.settings_path = Some(path);
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Latest published snapshot.
    pub fn latest(&self) -> Option<Arc<ProcessedFrame>> {
        self.latest.clone()
    }

    /// Process one incoming frame and publish the result.
    pub fn process(&mut self, frame: Frame) -> Result<Arc<ProcessedFrame>> {
        // A frozen session without a held frame holds the first one it sees.
        if !self.freeze || self.source.is_none() {
            self.source = Some(frame);
        }
        self.frame_count += 1;
        let Some(source) = self.source.as_ref() else {
            return Err(ProcessingError::InvalidImage("no source frame held".to_string()));
        };

        let region = self.settings.crop_size()?.region_for(source)?;
        let display = crop::display_crop_with_style(source, region, &self.settings.overlay)?;

        let analysed = self.countdown == 0;
        if analysed {
            self.countdown = self.settings.analysis_interval.max(1);
            let analysis = analyse(&self.settings, self.calibrating, self.frame_count, source, region)?;
            self.analysis = Some(Arc::new(analysis));
        }
        self.countdown -= 1;

        let processed = Arc::new(ProcessedFrame {
            sequence: self.frame_count,
            display,
            analysis: self.analysis.clone(),
            analysed,
        });
        self.latest = Some(processed.clone());
        self.publish(&processed);
        Ok(processed)
    }

    /// Register a subscriber. Each receives at most one pending snapshot;
    /// snapshots arriving while one is pending are dropped for that subscriber.
    pub fn subscribe(&mut self) -> Subscription {
        let (sender, receiver) = crossbeam_channel::bounded(1);
        let id = self.next_subscriber_id;
        self.next_subscriber_id += 1;
        self.subscribers.push(Subscriber { id, sender });
        Subscription { id, receiver }
    }

    pub fn unsubscribe(&mut self, id: u64) {
        self.subscribers.retain(|s| s.id != id);
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    fn publish(&mut self, processed: &Arc<ProcessedFrame>) {
        self.subscribers.retain(|s| match s.sender.try_send(processed.clone()) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                log::trace!("Subscriber {} busy, dropping frame {}", s.id, processed.sequence);
                true
            }
            Err(TrySendError::Disconnected(_)) => {
                log::debug!("Subscriber {} disconnected", s.id);
                false
            }
        });
    }

    pub fn set_crop_width(&mut self, width: f32) {
        self.settings.crop_width = width;
        self.persist();
    }

    pub fn set_crop_height(&mut self, height: f32) {
        self.settings.crop_height = height;
        self.persist();
    }

    pub fn set_lower_nm(&mut self, nm: f32) {
        self.settings.lower_nm = nm;
        self.persist();
    }

    pub fn set_upper_nm(&mut self, nm: f32) {
        self.settings.upper_nm = nm;
        self.persist();
    }

    pub fn set_lower_nm_position(&mut self, position: f32) {
        self.settings.lower_nm_position = config::clamp_position(position);
        self.persist();
    }

    pub fn set_upper_nm_position(&mut self, position: f32) {
        self.settings.upper_nm_position = config::clamp_position(position);
        self.persist();
    }

    fn persist(&self) {
        if let Some(path) = &self.settings_path {
            if let Err(e) = self.settings.save_to_file(path) {
                log::warn!("Failed to save settings: {}", e);
            }
        }
    }
}

fn analyse(
    settings: &Settings,
    calibrating: bool,
    sequence: u64,
    source: &Frame,
    region: crop::Region,
) -> Result<Analysis> {
    let extracted = crop::extract_crop(source, region)?;
    let profile = spectrum::reduce(&extracted);
    let histogram = HistogramBuilder::new(settings.histogram)?.build(&extracted);

    let (spectrum, spectral_extent) = match settings.calibration_map(extracted.width()) {
        Ok(map) => (calibration::calibrate_profile(&profile, &map), Some(map.spectral_extent())),
        Err(e) => {
            log::debug!("Spectrum left uncalibrated: {}", e);
            (Vec::new(), None)
        }
    };

    let lower = settings.lower_nm_position as f64;
    let upper = settings.upper_nm_position as f64;
    let annotated = if calibrating && (lower > 0.0 || upper > 0.0) {
        calibration::display_reference_markers_with_style(&extracted, lower, upper, &settings.overlay)?
    } else {
        extracted
    };
    let crop = border::draw_border(&annotated, &settings.overlay);

    log::debug!(
        "Analysed frame {}: {}x{} crop, peak column {:?}",
        sequence,
        region.width,
        region.height,
        profile.peak_column()
    );

    Ok(Analysis {
        crop,
        profile,
        histogram,
        spectrum,
        spectral_extent,
    })
}
