//! Column intensity profiles.
//!
//! The analysis crop holds a horizontal spectral band; averaging each
//! column's luma over the band height gives one intensity per column.

use serde::{Deserialize, Serialize};

use crate::frame::Frame;

/// Mean luma per pixel column, left to right.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntensityProfile {
    values: Vec<f64>,
}

impl IntensityProfile {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn into_values(self) -> Vec<f64> {
        self.values
    }

    /// Largest intensity, `None` for an empty profile.
    pub fn max(&self) -> Option<f64> {
        self.values.iter().copied().reduce(f64::max)
    }

    /// Column of the largest intensity (first one on ties).
    pub fn peak_column(&self) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (i, &v) in self.values.iter().enumerate() {
            match best {
                Some((_, b)) if v <= b => {}
                _ => best = Some((i, v)),
            }
        }
        best.map(|(i, _)| i)
    }

    /// Profile scaled so the peak is 1.0. A flat zero profile stays zero.
    pub fn normalized(&self) -> Self {
        match self.max() {
            Some(max) if max > 0.0 => Self::new(self.values.iter().map(|v| v / max).collect()),
            _ => self.clone(),
        }
    }
}

/// Reduce a crop to its column intensity profile.
pub fn reduce(crop: &Frame) -> IntensityProfile {
    let (width, height) = crop.dimensions();
    let mut sums = vec![0.0f64; width as usize];

    for y in 0..height {
        for (x, sum) in sums.iter_mut().enumerate() {
            *sum += crop.luma_at(x as u32, y);
        }
    }

    let rows = height as f64;
    IntensityProfile::new(sums.into_iter().map(|s| s / rows).collect())
}
