//! How much a stego carrier differs from its cover.

use std::fmt::{Display, Formatter};

use crate::media::{Carrier, SampleRange};
use crate::result::Result;
use crate::StegoError;

const HISTOGRAM_BINS: usize = 100;

/// Verdict derived from the PSNR, thresholds differ for images and audio
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rating {
    Excellent,
    VeryGood,
    Good,
    Acceptable,
    Poor,
}

impl Rating {
    pub fn of(psnr: f64, range: SampleRange) -> Self {
        if range == SampleRange::IMAGE {
            match psnr {
                p if p > 35.0 => Rating::Good,
                p if p > 25.0 => Rating::Acceptable,
                _ => Rating::Poor,
            }
        } else {
            match psnr {
                p if p > 70.0 => Rating::Excellent,
                p if p > 50.0 => Rating::VeryGood,
                p if p > 30.0 => Rating::Good,
                p if p > 20.0 => Rating::Acceptable,
                _ => Rating::Poor,
            }
        }
    }
}

impl Display for Rating {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Rating::Excellent => "excellent",
            Rating::VeryGood => "very good",
            Rating::Good => "good",
            Rating::Acceptable => "acceptable",
            Rating::Poor => "poor",
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Distortion {
    pub mse: f64,
    /// dB, infinite for identical carriers
    pub psnr: f64,
    /// dB, infinite for identical carriers
    pub snr: f64,
    /// Pearson correlation of both sample histograms
    pub histogram_correlation: f64,
    pub rating: Rating,
}

impl Distortion {
    /// compares two planes of the same shape, the peak for PSNR is the maximum of the sample range
    pub fn between(original: &Carrier, stego: &Carrier) -> Result<Self> {
        if original.shape() != stego.shape() {
            return Err(StegoError::InvalidParameter {
                name: "stego",
                reason: format!(
                    "a {} plane cannot be compared with a {} plane",
                    stego.shape(),
                    original.shape()
                ),
            });
        }

        let range = original.range();
        let mse = mse(original.samples(), stego.samples());
        let psnr = psnr(mse, range.max);

        Ok(Self {
            mse,
            psnr,
            snr: snr(original.samples(), stego.samples()),
            histogram_correlation: histogram_correlation(original.samples(), stego.samples()),
            rating: Rating::of(psnr, range),
        })
    }
}

pub fn mse(a: &[f64], b: &[f64]) -> f64 {
    if a.is_empty() {
        return 0.0;
    }

    a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum::<f64>() / a.len() as f64
}

pub fn psnr(mse: f64, peak: f64) -> f64 {
    if mse == 0.0 {
        return f64::INFINITY;
    }

    10.0 * (peak * peak / mse).log10()
}

/// signal power of `original` over the power of the difference
pub fn snr(original: &[f64], stego: &[f64]) -> f64 {
    let signal: f64 = original.iter().map(|x| x * x).sum();
    let noise: f64 = original.iter().zip(stego).map(|(x, y)| (x - y).powi(2)).sum();
    if noise == 0.0 {
        return f64::INFINITY;
    }

    10.0 * (signal / noise).log10()
}

/// Pearson correlation of the histograms of both sample sets over their common value range
pub fn histogram_correlation(a: &[f64], b: &[f64]) -> f64 {
    let (min, max) = a
        .iter()
        .chain(b)
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(*v), hi.max(*v))
        });
    if max <= min {
        return if a == b { 1.0 } else { 0.0 };
    }

    let histogram = |values: &[f64]| {
        let mut bins = [0.0f64; HISTOGRAM_BINS];
        for v in values {
            let bin = ((v - min) / (max - min) * HISTOGRAM_BINS as f64) as usize;
            bins[bin.min(HISTOGRAM_BINS - 1)] += 1.0;
        }
        bins
    };
    let (ha, hb) = (histogram(a), histogram(b));

    let mean = |h: &[f64]| h.iter().sum::<f64>() / h.len() as f64;
    let (ma, mb) = (mean(&ha), mean(&hb));
    let covariance: f64 = ha.iter().zip(&hb).map(|(x, y)| (x - ma) * (y - mb)).sum();
    let spread = |h: &[f64], m: f64| h.iter().map(|x| (x - m).powi(2)).sum::<f64>().sqrt();
    let denominator = spread(&ha, ma) * spread(&hb, mb);
    if denominator == 0.0 {
        return if ha == hb { 1.0 } else { 0.0 };
    }

    covariance / denominator
}
