use super::dct::DctBasis;
use super::wavelet::{haar_forward_levels, haar_inverse_levels};
use super::{TransformAdapter, Unit};
use crate::media::{Carrier, Region, Shape};
use crate::positions::{cropped, Position};
use crate::result::Result;

/// DCT of consecutive blocks of samples, one bit per block.
///
/// The carrying coefficient rotates through `indices` from block to block.
#[derive(Debug, Clone)]
pub struct AudioDctAdapter {
    basis: DctBasis,
    indices: Vec<usize>,
}

impl AudioDctAdapter {
    pub fn new(block_size: usize, indices: Vec<usize>) -> Self {
        Self {
            basis: DctBasis::new(block_size),
            indices,
        }
    }

    fn block_range(&self, carrier: &Carrier, unit: Unit) -> Result<std::ops::Range<usize>> {
        let n = self.basis.len();
        let start = unit.col * n;
        if n == 0 || start + n > carrier.samples().len() {
            return Err(unit.out_of_bounds(carrier.shape()));
        }

        Ok(start..start + n)
    }
}

impl TransformAdapter for AudioDctAdapter {
    fn unit_of(&self, _shape: Shape, position: Position) -> Unit {
        Unit::new(0, position.col)
    }

    fn forward(&self, carrier: &Carrier, unit: Unit) -> Result<Vec<f64>> {
        let range = self.block_range(carrier, unit)?;

        Ok(self.basis.forward(&carrier.samples()[range]))
    }

    fn inverse(&self, carrier: &mut Carrier, unit: Unit, coefficients: &[f64]) -> Result<()> {
        let range = self.block_range(carrier, unit)?;
        let samples = self.basis.inverse(coefficients);
        carrier.samples_mut()[range].copy_from_slice(&samples);

        Ok(())
    }

    fn footprint(&self, _shape: Shape, unit: Unit) -> Region {
        let n = self.basis.len();

        Region::new(0..1, unit.col * n..(unit.col + 1) * n)
    }

    fn target_index(&self, _shape: Shape, _position: Position, position_index: usize) -> usize {
        if self.indices.is_empty() {
            return 0;
        }

        self.indices[position_index % self.indices.len()]
    }
}

/// Detail band of a multi level 1D Haar transform over the whole channel.
#[derive(Debug, Clone)]
pub struct AudioWaveletAdapter {
    level: usize,
}

impl AudioWaveletAdapter {
    pub fn new(level: usize) -> Self {
        Self { level }
    }
}

impl TransformAdapter for AudioWaveletAdapter {
    fn unit_of(&self, _shape: Shape, _position: Position) -> Unit {
        Unit::new(0, 0)
    }

    fn forward(&self, carrier: &Carrier, unit: Unit) -> Result<Vec<f64>> {
        let Some(len) = cropped(carrier.samples().len(), self.level) else {
            return Err(unit.degenerate());
        };
        let mut coefficients = carrier.samples()[..len].to_vec();
        haar_forward_levels(&mut coefficients, self.level);

        Ok(coefficients)
    }

    fn inverse(&self, carrier: &mut Carrier, unit: Unit, coefficients: &[f64]) -> Result<()> {
        let len = coefficients.len();
        if cropped(carrier.samples().len(), self.level) != Some(len) {
            return Err(unit.out_of_bounds(carrier.shape()));
        }
        let mut samples = coefficients.to_vec();
        haar_inverse_levels(&mut samples, self.level);
        carrier.samples_mut()[..len].copy_from_slice(&samples);

        Ok(())
    }

    fn target_index(&self, _shape: Shape, position: Position, _position_index: usize) -> usize {
        position.col
    }
}
