use nalgebra::DMatrix;

use super::dct::{block_region, read_block, write_block};
use super::{TransformAdapter, Unit};
use crate::media::{Carrier, Region, Shape};
use crate::modulator::write_bit;
use crate::positions::Position;
use crate::result::Result;

/// blocks with a largest singular value below this carry no structure to modulate
const DEGENERATE_THRESHOLD: f64 = 1e-9;

/// The largest singular value of every image block.
///
/// Coefficients are the singular values in descending order, the bit sits in the first one.
#[derive(Debug, Clone)]
pub struct SvdAdapter {
    block_size: usize,
}

impl SvdAdapter {
    pub fn new(block_size: usize) -> Self {
        Self { block_size }
    }

    fn decompose(&self, carrier: &Carrier, unit: Unit) -> Result<Decomposition> {
        let n = self.block_size;
        let block = read_block(carrier, unit, n)?;
        let svd = DMatrix::from_row_slice(n, n, &block).svd(true, true);
        let (Some(u), Some(v_t)) = (svd.u, svd.v_t) else {
            return Err(unit.degenerate());
        };

        let mut order: Vec<usize> = (0..svd.singular_values.len()).collect();
        order.sort_by(|a, b| {
            svd.singular_values[*b]
                .total_cmp(&svd.singular_values[*a])
                .then(a.cmp(b))
        });

        Ok(Decomposition {
            u,
            sigma: svd.singular_values.iter().copied().collect(),
            v_t,
            order,
        })
    }
}

struct Decomposition {
    u: DMatrix<f64>,
    sigma: Vec<f64>,
    v_t: DMatrix<f64>,
    /// indices into `sigma`, largest value first
    order: Vec<usize>,
}

impl TransformAdapter for SvdAdapter {
    fn unit_of(&self, _shape: Shape, position: Position) -> Unit {
        Unit::new(position.row, position.col)
    }

    fn forward(&self, carrier: &Carrier, unit: Unit) -> Result<Vec<f64>> {
        let d = self.decompose(carrier, unit)?;
        let sorted: Vec<f64> = d.order.iter().map(|i| d.sigma[*i]).collect();

        match sorted.first() {
            Some(largest) if *largest >= DEGENERATE_THRESHOLD => Ok(sorted),
            _ => Err(unit.degenerate()),
        }
    }

    fn inverse(&self, carrier: &mut Carrier, unit: Unit, coefficients: &[f64]) -> Result<()> {
        let d = self.decompose(carrier, unit)?;
        let mut sigma = d.sigma;
        for (value, i) in coefficients.iter().zip(&d.order) {
            sigma[*i] = *value;
        }

        let n = self.block_size;
        let restored = &d.u * DMatrix::from_diagonal(&nalgebra::DVector::from_vec(sigma)) * &d.v_t;
        // nalgebra is column-major, blocks are row-major
        let block: Vec<f64> = (0..n)
            .flat_map(|r| (0..n).map(move |c| (r, c)))
            .map(|(r, c)| restored[(r, c)])
            .collect();

        write_block(carrier, unit, n, &block)
    }

    fn footprint(&self, _shape: Shape, unit: Unit) -> Region {
        block_region(unit, self.block_size)
    }

    fn target_index(&self, _shape: Shape, _position: Position, _position_index: usize) -> usize {
        0
    }

    /// keeps the modulated value positive and the largest, so it is found again when decoding
    fn embed_bit(&self, coefficients: &mut [f64], index: usize, bit: bool, step: f64) {
        let Some(current) = coefficients.get(index).copied() else {
            return;
        };
        let floor = coefficients.get(index + 1).copied().unwrap_or(0.0) + step / 4.0;

        let mut value = write_bit(current, bit, step);
        while value <= 0.0 || value < floor {
            value += step;
        }
        coefficients[index] = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::SampleRange;
    use crate::params::{EmbeddingParams, Variant};
    use crate::positions::enumerate;
    use crate::transform::test_utils::{assert_bits_survive, textured};
    use crate::transform::Adapter;
    use crate::StegoError;

    #[test]
    fn should_sort_singular_values_descending() {
        let carrier = textured(Shape::new(16, 16));
        let sigma = SvdAdapter::new(8)
            .forward(&carrier, Unit::new(0, 8))
            .unwrap();

        assert_eq!(sigma.len(), 8);
        assert!(sigma.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn should_reconstruct_untouched_blocks() {
        let carrier = textured(Shape::new(16, 16));
        let adapter = SvdAdapter::new(8);
        let sigma = adapter.forward(&carrier, Unit::new(8, 0)).unwrap();
        let mut copy = carrier.clone();
        adapter.inverse(&mut copy, Unit::new(8, 0), &sigma).unwrap();

        for (a, b) in carrier.samples().iter().zip(copy.samples()) {
            assert!((a - b).abs() < 1e-6);
        }
    }

    #[test]
    fn should_report_all_zero_blocks_as_degenerate() {
        let carrier = Carrier::from_fn(Shape::new(16, 16), SampleRange::IMAGE, |r, _| {
            if r < 8 {
                0.0
            } else {
                50.0
            }
        });

        assert!(matches!(
            SvdAdapter::new(8).forward(&carrier, Unit::new(0, 8)),
            Err(StegoError::DegenerateTransformUnit { row: 0, col: 8 })
        ));
        assert!(SvdAdapter::new(8).forward(&carrier, Unit::new(8, 8)).is_ok());
    }

    #[test]
    fn should_keep_the_first_value_dominant() {
        let adapter = SvdAdapter::new(8);
        let mut sigma = vec![3.0, 2.9, 1.0];
        adapter.embed_bit(&mut sigma, 0, false, 10.0);

        assert_eq!(sigma[0], 10.0);

        let mut sigma = vec![41.0, 39.0, 1.0];
        adapter.embed_bit(&mut sigma, 0, false, 10.0);
        assert_eq!(sigma[0], 50.0, "40 would not be above 39 + 2.5");
    }

    #[test]
    fn should_carry_bits_through_rounding() {
        let params = EmbeddingParams::for_variant(Variant::Svd);
        let carrier = textured(Shape::new(64, 64));
        let positions = enumerate(carrier.shape(), &params);

        assert_bits_survive(&Adapter::for_params(&params), &carrier, &positions, params.step);
    }
}
