//! Embedding parameters, the knobs that encoder and decoder have to agree on.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::media::Channel;
use crate::result::Result;
use crate::StegoError;

/// decoding never looks at more positions than this, unless configured otherwise
pub const DEFAULT_MAX_POSITIONS: usize = 50_000;

/// LBP neighbourhoods, a code has one bit per point
pub const MAX_TEXTURE_POINTS: usize = 64;
pub const MAX_TEXTURE_RADIUS: usize = 16;

/// The transform a message is hidden in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Variant {
    /// 8x8 block DCT of an image plane
    #[serde(rename = "dct")]
    BlockDct,
    /// magnitudes of the global 2D DFT of an image plane
    #[serde(rename = "dft")]
    Dft,
    /// largest singular value of image blocks
    #[serde(rename = "svd")]
    Svd,
    /// Haar detail coefficients of an image plane
    #[serde(rename = "wavelet")]
    Wavelet,
    /// raw pixels on a sparse grid, analysed with local binary patterns
    #[serde(rename = "lbp")]
    Texture,
    /// block DCT of audio samples
    #[serde(rename = "audio-dct")]
    AudioDct,
    /// Haar detail coefficients of audio samples
    #[serde(rename = "audio-wavelet")]
    AudioWavelet,
}

impl Variant {
    pub const ALL: [Variant; 7] = [
        Variant::BlockDct,
        Variant::Dft,
        Variant::Svd,
        Variant::Wavelet,
        Variant::Texture,
        Variant::AudioDct,
        Variant::AudioWavelet,
    ];

    pub fn is_audio(&self) -> bool {
        matches!(self, Variant::AudioDct | Variant::AudioWavelet)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Variant::BlockDct => "dct",
            Variant::Dft => "dft",
            Variant::Svd => "svd",
            Variant::Wavelet => "wavelet",
            Variant::Texture => "lbp",
            Variant::AudioDct => "audio-dct",
            Variant::AudioWavelet => "audio-wavelet",
        }
    }
}

impl Display for Variant {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Variant {
    type Err = StegoError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "dct" | "block-dct" => Ok(Variant::BlockDct),
            "dft" | "fft" => Ok(Variant::Dft),
            "svd" => Ok(Variant::Svd),
            "wavelet" | "dwt" => Ok(Variant::Wavelet),
            "lbp" | "texture" => Ok(Variant::Texture),
            "audio-dct" | "audio_dct" => Ok(Variant::AudioDct),
            "audio-wavelet" | "audio_wavelet" => Ok(Variant::AudioWavelet),
            other => Err(StegoError::InvalidParameter {
                name: "variant",
                reason: format!("unknown method `{other}`"),
            }),
        }
    }
}

/// Everything encoder and decoder need to find the same coefficients.
///
/// Not every field matters for every [`Variant`], see [`EmbeddingParams::for_variant`]
/// for the defaults that are used per variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingParams {
    pub variant: Variant,
    /// quantization step, larger is more robust and more visible
    pub step: f64,
    pub channel: Channel,
    /// edge length of square image blocks, or length of audio blocks
    pub block_size: usize,
    /// a margin of `dimension / border_divisor` is skipped on each side, `0` disables it
    pub border_divisor: usize,
    /// (row, col) of the DCT coefficient inside an image block
    pub coefficient: (usize, usize),
    /// DCT indices inside an audio block, used in rotation
    pub audio_coefficients: Vec<usize>,
    /// the DFT band spans `[dimension / band_divisor, dimension - dimension / band_divisor)`
    pub band_divisor: usize,
    pub wavelet_level: usize,
    /// (rows, cols) distance between two used positions
    pub stride: (usize, usize),
    pub texture_radius: usize,
    pub texture_points: usize,
    /// upper bound of positions inspected while decoding
    pub max_positions: usize,
    /// steps tried by the fallback decoder when the configured one yields nothing plausible
    pub candidate_steps: Vec<f64>,
}

impl Default for EmbeddingParams {
    fn default() -> Self {
        Self::for_variant(Variant::BlockDct)
    }
}

impl EmbeddingParams {
    /// defaults as they work well for each variant
    pub fn for_variant(variant: Variant) -> Self {
        let base = Self {
            variant,
            step: 10.0,
            channel: Channel::Blue,
            block_size: 8,
            border_divisor: 0,
            coefficient: (4, 5),
            audio_coefficients: vec![80, 128, 192, 256],
            band_divisor: 4,
            wavelet_level: 1,
            stride: (1, 1),
            texture_radius: 3,
            texture_points: 24,
            max_positions: DEFAULT_MAX_POSITIONS,
            candidate_steps: vec![1.0, 5.0, 10.0, 15.0, 20.0, 25.0],
        };

        match variant {
            Variant::BlockDct => Self {
                channel: Channel::Luma,
                border_divisor: 16,
                ..base
            },
            Variant::Dft => Self {
                candidate_steps: vec![1.0, 1.5, 2.0, 3.0, 5.0, 8.0, 10.0, 12.0, 15.0, 20.0],
                ..base
            },
            Variant::Svd => Self {
                border_divisor: 16,
                ..base
            },
            Variant::Wavelet => Self {
                step: 30.0,
                candidate_steps: vec![1.0, 5.0, 10.0, 15.0, 20.0, 25.0, 30.0],
                ..base
            },
            Variant::Texture => Self {
                border_divisor: 8,
                stride: (2, 4),
                ..base
            },
            Variant::AudioDct => Self {
                step: 50.0,
                channel: Channel::Audio(0),
                block_size: 1024,
                candidate_steps: vec![10.0, 25.0, 50.0, 75.0, 100.0, 150.0, 200.0],
                ..base
            },
            Variant::AudioWavelet => Self {
                step: 50.0,
                channel: Channel::Audio(0),
                stride: (1, 4),
                candidate_steps: vec![10.0, 25.0, 50.0, 75.0, 100.0, 150.0, 200.0],
                ..base
            },
        }
    }

    pub fn with_step(mut self, step: f64) -> Self {
        self.step = step;
        self
    }

    pub fn with_channel(mut self, channel: Channel) -> Self {
        self.channel = channel;
        self
    }

    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size;
        self
    }

    pub fn with_border_divisor(mut self, border_divisor: usize) -> Self {
        self.border_divisor = border_divisor;
        self
    }

    pub fn with_coefficient(mut self, row: usize, col: usize) -> Self {
        self.coefficient = (row, col);
        self
    }

    pub fn with_audio_coefficients(mut self, indices: Vec<usize>) -> Self {
        self.audio_coefficients = indices;
        self
    }

    pub fn with_band_divisor(mut self, band_divisor: usize) -> Self {
        self.band_divisor = band_divisor;
        self
    }

    pub fn with_wavelet_level(mut self, level: usize) -> Self {
        self.wavelet_level = level;
        self
    }

    pub fn with_stride(mut self, rows: usize, cols: usize) -> Self {
        self.stride = (rows, cols);
        self
    }

    pub fn with_texture(mut self, radius: usize, points: usize) -> Self {
        self.texture_radius = radius;
        self.texture_points = points;
        self
    }

    pub fn with_max_positions(mut self, max_positions: usize) -> Self {
        self.max_positions = max_positions;
        self
    }

    pub fn with_candidate_steps(mut self, steps: Vec<f64>) -> Self {
        self.candidate_steps = steps;
        self
    }

    /// Rejects parameters no carrier could work with.
    /// Geometry that merely does not fit a given carrier shows up as zero capacity instead.
    pub fn validate(&self) -> Result<()> {
        fn invalid(name: &'static str, reason: impl Into<String>) -> Result<()> {
            Err(StegoError::InvalidParameter {
                name,
                reason: reason.into(),
            })
        }

        if !self.step.is_finite() || self.step <= 0.0 {
            return invalid("step", format!("must be a positive number, got {}", self.step));
        }
        if let Some(s) = self
            .candidate_steps
            .iter()
            .find(|s| !s.is_finite() || **s <= 0.0)
        {
            return invalid(
                "candidate_steps",
                format!("must all be positive numbers, got {s}"),
            );
        }
        if self.variant.is_audio() != self.channel.is_audio() {
            return invalid(
                "channel",
                format!("channel {} cannot be used with {}", self.channel, self.variant),
            );
        }
        if self.stride.0 == 0 || self.stride.1 == 0 {
            return invalid("stride", "must be at least 1 in both directions");
        }

        match self.variant {
            Variant::BlockDct | Variant::Svd if self.block_size < 2 => {
                invalid("block_size", "blocks need to be at least 2x2")
            }
            Variant::BlockDct
                if self.coefficient.0 >= self.block_size
                    || self.coefficient.1 >= self.block_size =>
            {
                invalid(
                    "coefficient",
                    format!(
                        "{:?} lies outside of a {} block",
                        self.coefficient, self.block_size
                    ),
                )
            }
            Variant::Dft if self.band_divisor < 2 => {
                invalid("band_divisor", "must be at least 2")
            }
            Variant::Wavelet | Variant::AudioWavelet
                if self.wavelet_level == 0 || self.wavelet_level > 16 =>
            {
                invalid("wavelet_level", "must be within 1..=16")
            }
            Variant::Texture if !(1..=MAX_TEXTURE_RADIUS).contains(&self.texture_radius) => {
                invalid(
                    "texture_radius",
                    format!("must be within 1..={MAX_TEXTURE_RADIUS}"),
                )
            }
            Variant::Texture if !(1..=MAX_TEXTURE_POINTS).contains(&self.texture_points) => {
                invalid(
                    "texture_points",
                    format!("must be within 1..={MAX_TEXTURE_POINTS}"),
                )
            }
            Variant::AudioDct if self.audio_coefficients.is_empty() => {
                invalid("audio_coefficients", "at least one index is required")
            }
            Variant::AudioDct => match self
                .audio_coefficients
                .iter()
                .find(|i| **i >= self.block_size)
            {
                Some(i) => invalid(
                    "audio_coefficients",
                    format!("index {i} lies outside of a {} block", self.block_size),
                ),
                None => Ok(()),
            },
            _ => Ok(()),
        }
    }
}
