use std::fmt::{Display, Formatter};
use std::ops::Range;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::result::Result;
use crate::StegoError;

/// width and height of a sample plane, audio planes have a height of 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    pub width: usize,
    pub height: usize,
}

impl Shape {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    pub fn len(&self) -> usize {
        self.width * self.height
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Display for Shape {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// valid value range of the samples of a medium
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleRange {
    pub min: f64,
    pub max: f64,
}

impl SampleRange {
    pub const IMAGE: SampleRange = SampleRange {
        min: 0.0,
        max: 255.0,
    };
    pub const AUDIO: SampleRange = SampleRange {
        min: i16::MIN as f64,
        max: i16::MAX as f64,
    };

    /// clamps `value` into the range
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }

    /// Scales `value` towards the middle of the range, so it keeps a distance of at least
    /// `margin` to both ends. A margin of half the range or more collapses it to the middle.
    pub fn squeeze(&self, value: f64, margin: f64) -> f64 {
        let middle = (self.min + self.max) / 2.0;
        let half = (self.max - self.min) / 2.0;
        let factor = ((half - margin) / half).max(0.0);

        middle + (self.clamp(value) - middle) * factor
    }
}

/// Rectangle of samples of a plane, rows and columns are half open
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub rows: Range<usize>,
    pub cols: Range<usize>,
}

impl Region {
    pub fn new(rows: Range<usize>, cols: Range<usize>) -> Self {
        Self { rows, cols }
    }

    /// every sample of a plane of `shape`
    pub fn whole(shape: Shape) -> Self {
        Self::new(0..shape.height, 0..shape.width)
    }

    /// row-major sample indices of the region, cut off at the borders of `shape`
    fn indices(&self, shape: Shape) -> impl Iterator<Item = usize> {
        let width = shape.width;
        let rows = self.rows.start.min(shape.height)..self.rows.end.min(shape.height);
        let cols = self.cols.start.min(width)..self.cols.end.min(width);

        rows.flat_map(move |row| cols.clone().map(move |col| row * width + col))
    }
}

/// A single plane of samples taken from a media, the thing all transforms operate on.
///
/// Samples are stored row-major as `f64`, so transforms can move them freely.
/// Only when written back into a media they get rounded and clamped to [`SampleRange`].
#[derive(Debug, Clone, PartialEq)]
pub struct Carrier {
    shape: Shape,
    samples: Vec<f64>,
    range: SampleRange,
}

impl Carrier {
    pub fn new(shape: Shape, samples: Vec<f64>, range: SampleRange) -> Result<Self> {
        if samples.len() != shape.len() {
            return Err(StegoError::InvalidParameter {
                name: "samples",
                reason: format!(
                    "{} samples do not form a {shape} plane",
                    samples.len()
                ),
            });
        }

        Ok(Self {
            shape,
            samples,
            range,
        })
    }

    /// builds an image plane by evaluating `f(row, col)` for every pixel
    pub fn from_fn<F>(shape: Shape, range: SampleRange, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> f64,
    {
        let mut samples = Vec::with_capacity(shape.len());
        for row in 0..shape.height {
            for col in 0..shape.width {
                samples.push(f(row, col));
            }
        }

        Self {
            shape,
            samples,
            range,
        }
    }

    /// a single row plane of audio samples
    pub fn audio(samples: Vec<f64>) -> Self {
        Self {
            shape: Shape::new(samples.len(), 1),
            samples,
            range: SampleRange::AUDIO,
        }
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn range(&self) -> SampleRange {
        self.range
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    pub fn samples_mut(&mut self) -> &mut [f64] {
        &mut self.samples
    }

    pub fn into_samples(self) -> Vec<f64> {
        self.samples
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.samples[row * self.shape.width + col]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.samples[row * self.shape.width + col] = value;
    }

    /// Copy of the carrier as it would look after being stored,
    /// every sample rounded to an integer inside the sample range.
    pub fn rounded(&self) -> Self {
        Self {
            shape: self.shape,
            samples: self
                .samples
                .iter()
                .map(|s| self.range.clamp(s.round()))
                .collect(),
            range: self.range,
        }
    }

    /// copy of the samples inside `region`, row-major
    pub fn region(&self, region: &Region) -> Vec<f64> {
        region
            .indices(self.shape)
            .map(|i| self.samples[i])
            .collect()
    }

    /// overwrites the samples inside `region` with a copy taken by [`Carrier::region`]
    pub fn set_region(&mut self, region: &Region, values: &[f64]) {
        for (i, v) in region.indices(self.shape).zip(values) {
            self.samples[i] = *v;
        }
    }

    /// rounds and clamps the samples inside `region` the way storage does
    pub fn store_region(&mut self, region: &Region) {
        for i in region.indices(self.shape) {
            self.samples[i] = self.range.clamp(self.samples[i].round());
        }
    }

    /// moves the samples inside `region` at least `margin` away from the range limits
    pub fn squeeze_region(&mut self, region: &Region, margin: f64) {
        for i in region.indices(self.shape) {
            self.samples[i] = self.range.squeeze(self.samples[i], margin);
        }
    }
}

/// Selects the plane of a media that carries the message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    /// ITU-R BT.601 luma of an image, written back by shifting R, G and B, clipped colors excluded
    Luma,
    Red,
    Green,
    Blue,
    /// one channel of an interleaved WAV file
    Audio(usize),
}

impl Channel {
    pub fn is_audio(&self) -> bool {
        matches!(self, Channel::Audio(_))
    }
}

impl Display for Channel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Channel::Luma => write!(f, "luma"),
            Channel::Red => write!(f, "red"),
            Channel::Green => write!(f, "green"),
            Channel::Blue => write!(f, "blue"),
            Channel::Audio(i) => write!(f, "audio:{i}"),
        }
    }
}

impl FromStr for Channel {
    type Err = StegoError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim().to_lowercase();
        match s.as_str() {
            "luma" | "y" | "gray" | "grey" => Ok(Channel::Luma),
            "red" | "r" => Ok(Channel::Red),
            "green" | "g" => Ok(Channel::Green),
            "blue" | "b" => Ok(Channel::Blue),
            "audio" => Ok(Channel::Audio(0)),
            other => other
                .strip_prefix("audio:")
                .and_then(|i| i.parse::<usize>().ok())
                .map(Channel::Audio)
                .ok_or_else(|| StegoError::InvalidParameter {
                    name: "channel",
                    reason: format!("`{other}` is not one of luma, red, green, blue, audio:<n>"),
                }),
        }
    }
}
