//! Intensity histograms over whole frames.

use serde::{Deserialize, Serialize};

use crate::error::{ProcessingError, Result};
use crate::frame::{luma, Frame};

/// Number of distinct 8-bit sample values.
const SAMPLE_LEVELS: u32 = 256;

/// Which sample values feed the histogram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum HistogramChannel {
    /// Rec.601 luma rounded to 8 bits, one sample per pixel.
    #[default]
    Luminance,
    Red,
    Green,
    Blue,
    /// Red, green and blue pooled, three samples per pixel.
    Rgb,
}

impl HistogramChannel {
    /// Samples contributed by each pixel.
    pub fn samples_per_pixel(&self) -> u64 {
        match self {
            HistogramChannel::Rgb => 3,
            _ => 1,
        }
    }
}

/// Histogram layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistogramConfig {
    /// Bucket count, 1 to 256.
    pub buckets: u32,
    pub channel: HistogramChannel,
}

impl Default for HistogramConfig {
    fn default() -> Self {
        Self {
            buckets: SAMPLE_LEVELS,
            channel: HistogramChannel::Luminance,
        }
    }
}

/// Bucket counts, lowest intensity first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Histogram {
    counts: Vec<u64>,
}

impl Histogram {
    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    pub fn into_counts(self) -> Vec<u64> {
        self.counts
    }

    /// Number of samples counted.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Relative frequencies summing to 1.0 (all zero for an empty histogram).
    pub fn normalized(&self) -> Vec<f64> {
        let total = self.total();
        if total == 0 {
            return vec![0.0; self.counts.len()];
        }
        self.counts.iter().map(|&c| c as f64 / total as f64).collect()
    }
}

/// Builds histograms with a fixed configuration.
#[derive(Debug, Clone)]
pub struct HistogramBuilder {
    config: HistogramConfig,
}

impl HistogramBuilder {
    pub fn new(config: HistogramConfig) -> Result<Self> {
        if config.buckets == 0 || config.buckets > SAMPLE_LEVELS {
            return Err(ProcessingError::InvalidHistogram(format!(
                "bucket count {} must be between 1 and {}",
                config.buckets, SAMPLE_LEVELS
            )));
        }
        Ok(Self { config })
    }

    pub fn config(&self) -> &HistogramConfig {
        &self.config
    }

    #[inline]
    fn bucket(&self, value: u8) -> usize {
        (value as u32 * self.config.buckets / SAMPLE_LEVELS) as usize
    }

    pub fn build(&self, frame: &Frame) -> Histogram {
        let mut counts = vec![0u64; self.config.buckets as usize];

        for pixel in frame.as_rgba().pixels() {
            let [r, g, b, _] = pixel.0;
            match self.config.channel {
                HistogramChannel::Luminance => {
                    let value = luma(pixel).round().clamp(0.0, 255.0) as u8;
                    counts[self.bucket(value)] += 1;
                }
                HistogramChannel::Red => counts[self.bucket(r)] += 1,
                HistogramChannel::Green => counts[self.bucket(g)] += 1,
                HistogramChannel::Blue => counts[self.bucket(b)] += 1,
                HistogramChannel::Rgb => {
                    counts[self.bucket(r)] += 1;
                    counts[self.bucket(g)] += 1;
                    counts[self.bucket(b)] += 1;
                }
            }
        }

        Histogram { counts }
    }
}

/// 256-bucket luma histogram of the whole frame.
pub fn histogram(frame: &Frame) -> Vec<u64> {
    HistogramBuilder {
        config: HistogramConfig::default(),
    }
    .build(frame)
    .into_counts()
}
