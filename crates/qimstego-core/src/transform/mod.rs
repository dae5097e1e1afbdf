//! Transforms that expose the coefficients bits are hidden in.
//!
//! Every transform works on *units*, a block, a single pixel or the whole plane.
//! The encoder transforms a unit forward once, modulates all bits that fall into it
//! and transforms it back. The decoder only needs the forward direction.

use enum_dispatch::enum_dispatch;

pub mod audio;
pub mod dct;
pub mod dft;
pub mod svd;
pub mod texture;
pub mod wavelet;

pub use audio::{AudioDctAdapter, AudioWaveletAdapter};
pub use dct::BlockDctAdapter;
pub use dft::DftAdapter;
pub use svd::SvdAdapter;
pub use texture::TextureAdapter;
pub use wavelet::WaveletAdapter;

use crate::media::{Carrier, Region, SampleRange, Shape};
use crate::modulator::{read_bit, write_bit, DEFAULT_TOLERANCE};
use crate::params::{EmbeddingParams, Variant};
use crate::positions::Position;
use crate::result::Result;
use crate::StegoError;

/// the part of a carrier one forward transform covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Unit {
    pub row: usize,
    pub col: usize,
}

impl Unit {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    pub(crate) fn degenerate(&self) -> StegoError {
        StegoError::DegenerateTransformUnit {
            row: self.row,
            col: self.col,
        }
    }

    pub(crate) fn out_of_bounds(&self, shape: Shape) -> StegoError {
        StegoError::InvalidParameter {
            name: "unit",
            reason: format!("({}, {}) lies outside of a {shape} carrier", self.row, self.col),
        }
    }
}

/// Maps carrier samples to coefficients and back.
#[enum_dispatch]
pub trait TransformAdapter {
    /// the unit that contains `position`
    fn unit_of(&self, shape: Shape, position: Position) -> Unit;

    /// Coefficients of `unit`.
    /// Fails with [`StegoError::DegenerateTransformUnit`] if the unit cannot carry bits.
    fn forward(&self, carrier: &Carrier, unit: Unit) -> Result<Vec<f64>>;

    /// Writes (modified) coefficients of `unit` back into the carrier.
    /// `coefficients` must originate from [`TransformAdapter::forward`] of the unchanged unit.
    fn inverse(&self, carrier: &mut Carrier, unit: Unit, coefficients: &[f64]) -> Result<()>;

    /// the samples [`TransformAdapter::inverse`] of `unit` may change
    fn footprint(&self, shape: Shape, _unit: Unit) -> Region {
        Region::whole(shape)
    }

    /// index into the unit coefficients that carries the bit of `position`,
    /// `position_index` is the index of `position` in the position list
    fn target_index(&self, shape: Shape, position: Position, position_index: usize) -> usize;

    /// Writes `bit` into `coefficients[index]`.
    /// Implementations may shift the result by whole steps to respect domain constraints.
    fn embed_bit(&self, coefficients: &mut [f64], index: usize, bit: bool, step: f64) {
        if let Some(c) = coefficients.get_mut(index) {
            *c = write_bit(*c, bit, step);
        }
    }

    fn extract_bit(&self, coefficients: &[f64], index: usize, step: f64) -> bool {
        coefficients
            .get(index)
            .is_some_and(|c| read_bit(*c, step, DEFAULT_TOLERANCE))
    }
}

/// All available transforms, dispatches statically to the selected one
#[enum_dispatch(TransformAdapter)]
#[derive(Debug, Clone)]
pub enum Adapter {
    BlockDctAdapter,
    DftAdapter,
    SvdAdapter,
    WaveletAdapter,
    TextureAdapter,
    AudioDctAdapter,
    AudioWaveletAdapter,
}

impl Adapter {
    /// the adapter for `params.variant`, configured by `params`
    pub fn for_params(params: &EmbeddingParams) -> Self {
        match params.variant {
            Variant::BlockDct => BlockDctAdapter::new(params.block_size, params.coefficient).into(),
            Variant::Dft => DftAdapter::new().into(),
            Variant::Svd => SvdAdapter::new(params.block_size).into(),
            Variant::Wavelet => WaveletAdapter::new(params.wavelet_level).into(),
            Variant::Texture => TextureAdapter::new(SampleRange::IMAGE).into(),
            Variant::AudioDct => {
                AudioDctAdapter::new(params.block_size, params.audio_coefficients.clone()).into()
            }
            Variant::AudioWavelet => AudioWaveletAdapter::new(params.wavelet_level).into(),
        }
    }
}

#[cfg(test)]
pub(crate) mod test_utils {
    use super::*;

    /// a textured plane with values in `60..=200`, never clips when modulated
    pub fn textured(shape: Shape) -> Carrier {
        Carrier::from_fn(shape, SampleRange::IMAGE, |r, c| {
            let (r, c) = (r as f64, c as f64);
            let noise = ((r * 12.9898 + c * 78.233).sin() * 43_758.545).fract() * 10.0;
            (128.0 + 40.0 * (r / 5.0).sin() * (c / 7.0).cos() + noise).clamp(60.0, 200.0)
        })
    }

    /// writes one bit per position and reads all of them back, like the encoder does
    pub fn assert_bits_survive(
        adapter: &Adapter,
        carrier: &Carrier,
        positions: &[Position],
        step: f64,
    ) {
        let shape = carrier.shape();
        let bits: Vec<bool> = (0..positions.len()).map(|i| i % 3 == 0).collect();
        let mut stego = carrier.clone();

        for (i, (p, bit)) in positions.iter().zip(&bits).enumerate() {
            let unit = adapter.unit_of(shape, *p);
            let mut coefficients = adapter.forward(&stego, unit).unwrap();
            adapter.embed_bit(&mut coefficients, adapter.target_index(shape, *p, i), *bit, step);
            adapter.inverse(&mut stego, unit, &coefficients).unwrap();
        }

        let stego = stego.rounded();
        for (i, (p, bit)) in positions.iter().zip(&bits).enumerate() {
            let coefficients = adapter.forward(&stego, adapter.unit_of(shape, *p)).unwrap();
            assert_eq!(
                adapter.extract_bit(&coefficients, adapter.target_index(shape, *p, i), step),
                *bit,
                "bit {i} at {p:?}"
            );
        }
    }
}
