//! Orthonormal Haar wavelet, multi level.
//!
//! After one 2D level the plane holds the approximation top left, the vertical
//! detail top right and the horizontal detail bottom left, where bits are hidden.

use std::f64::consts::FRAC_1_SQRT_2;

use super::{TransformAdapter, Unit};
use crate::media::{Carrier, Shape};
use crate::positions::{cropped, Position};
use crate::result::Result;

/// one Haar step over `data`, averages into the first half and details into the second
pub(crate) fn haar_forward(data: &mut [f64]) {
    let half = data.len() / 2;
    let mut out = vec![0.0; half * 2];
    for i in 0..half {
        let (a, b) = (data[2 * i], data[2 * i + 1]);
        out[i] = (a + b) * FRAC_1_SQRT_2;
        out[half + i] = (a - b) * FRAC_1_SQRT_2;
    }
    data[..half * 2].copy_from_slice(&out);
}

pub(crate) fn haar_inverse(data: &mut [f64]) {
    let half = data.len() / 2;
    let mut out = vec![0.0; half * 2];
    for i in 0..half {
        let (a, d) = (data[i], data[half + i]);
        out[2 * i] = (a + d) * FRAC_1_SQRT_2;
        out[2 * i + 1] = (a - d) * FRAC_1_SQRT_2;
    }
    data[..half * 2].copy_from_slice(&out);
}

/// `levels` Haar steps, each on the approximation of the previous one
pub(crate) fn haar_forward_levels(data: &mut [f64], levels: usize) {
    for level in 0..levels {
        let len = data.len() >> level;
        haar_forward(&mut data[..len]);
    }
}

pub(crate) fn haar_inverse_levels(data: &mut [f64], levels: usize) {
    for level in (0..levels).rev() {
        let len = data.len() >> level;
        haar_inverse(&mut data[..len]);
    }
}

/// applies `step` to the rows and then the columns of the top left `rows x cols` region
fn separable<F>(
    plane: &mut [f64],
    width: usize,
    rows: usize,
    cols: usize,
    rows_first: bool,
    step: F,
) where
    F: Fn(&mut [f64]),
{
    let apply_rows = |plane: &mut [f64]| {
        for row in 0..rows {
            step(&mut plane[row * width..row * width + cols]);
        }
    };
    let apply_cols = |plane: &mut [f64]| {
        let mut column = vec![0.0; rows];
        for col in 0..cols {
            for (row, v) in column.iter_mut().enumerate() {
                *v = plane[row * width + col];
            }
            step(&mut column);
            for (row, v) in column.iter().enumerate() {
                plane[row * width + col] = *v;
            }
        }
    };

    if rows_first {
        apply_rows(plane);
        apply_cols(plane);
    } else {
        apply_cols(plane);
        apply_rows(plane);
    }
}

/// Horizontal detail coefficients of a multi level 2D Haar transform.
///
/// The plane is cropped to a multiple of `2^level` in both directions,
/// samples outside of it are left alone.
#[derive(Debug, Clone)]
pub struct WaveletAdapter {
    level: usize,
}

impl WaveletAdapter {
    pub fn new(level: usize) -> Self {
        Self { level }
    }

    fn cropped_shape(&self, shape: Shape) -> Option<Shape> {
        Some(Shape::new(
            cropped(shape.width, self.level)?,
            cropped(shape.height, self.level)?,
        ))
    }
}

impl TransformAdapter for WaveletAdapter {
    fn unit_of(&self, _shape: Shape, _position: Position) -> Unit {
        Unit::new(0, 0)
    }

    fn forward(&self, carrier: &Carrier, unit: Unit) -> Result<Vec<f64>> {
        let shape = carrier.shape();
        let Some(inner) = self.cropped_shape(shape) else {
            return Err(unit.degenerate());
        };

        let mut plane: Vec<f64> = (0..inner.height)
            .flat_map(|row| carrier.samples()[row * shape.width..][..inner.width].iter().copied())
            .collect();
        for level in 0..self.level {
            let (rows, cols) = (inner.height >> level, inner.width >> level);
            separable(&mut plane, inner.width, rows, cols, true, haar_forward);
        }

        Ok(plane)
    }

    fn inverse(&self, carrier: &mut Carrier, unit: Unit, coefficients: &[f64]) -> Result<()> {
        let shape = carrier.shape();
        let Some(inner) = self.cropped_shape(shape) else {
            return Err(unit.degenerate());
        };
        if coefficients.len() != inner.len() {
            return Err(unit.out_of_bounds(shape));
        }

        let mut plane = coefficients.to_vec();
        for level in (0..self.level).rev() {
            let (rows, cols) = (inner.height >> level, inner.width >> level);
            separable(&mut plane, inner.width, rows, cols, false, haar_inverse);
        }

        for (row, values) in plane.chunks_exact(inner.width).enumerate() {
            carrier.samples_mut()[row * shape.width..][..inner.width].copy_from_slice(values);
        }

        Ok(())
    }

    fn target_index(&self, shape: Shape, position: Position, _position_index: usize) -> usize {
        let width = cropped(shape.width, self.level).unwrap_or(0);

        position.row * width + position.col
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

    #[test]
    fn should_split_into_average_and_detail() {
        let mut data = [4.0, 2.0, 5.0, 5.0];
        haar_forward(&mut data);

        let s = std::f64::consts::SQRT_2;
        for (a, b) in data.iter().zip([6.0 / s, 10.0 / s, 2.0 / s, 0.0]) {
            assert!((a - b).abs() < 1e-12);
        }

        haar_inverse(&mut data);
        for (a, b) in data.iter().zip([4.0, 2.0, 5.0, 5.0]) {
            assert!((a - b).abs() < 1e-12);
        }
    }

    #[test]
    fn should_invert_multiple_levels() {
        let original: Vec<f64> = (0..32).map(|i| ((i * 7) % 13) as f64).collect();
        let mut data = original.clone();
        haar_forward_levels(&mut data, 3);
        haar_inverse_levels(&mut data, 3);

        for (a, b) in data.iter().zip(&original) {
            assert!((a - b).abs() < 1e-9);
        }
    }

    #[test]
    fn should_leave_the_cropped_border_alone() {
        let carrier = textured(Shape::new(19, 17));
        let adapter = WaveletAdapter::new(2);
        let mut coefficients = adapter.forward(&carrier, Unit::new(0, 0)).unwrap();
        assert_eq!(coefficients.len(), 16 * 16);

        // the level 2 approximation of the top left 4x4 block
        coefficients[0] += 3.0;
        let mut stego = carrier.clone();
        adapter.inverse(&mut stego, Unit::new(0, 0), &coefficients).unwrap();

        assert_eq!(stego.get(16, 3), carrier.get(16, 3));
        assert_eq!(stego.get(3, 18), carrier.get(3, 18));
        assert_ne!(stego.get(3, 3), carrier.get(3, 3));
    }

    #[test]
    fn should_find_no_structure_in_flat_planes() {
        let carrier = Carrier::from_fn(Shape::new(8, 8), SampleRange::IMAGE, |_, _| 90.0);
        let coefficients = WaveletAdapter::new(1).forward(&carrier, Unit::new(0, 0)).unwrap();

        assert!(coefficients[4 * 8..].iter().all(|c| c.abs() < 1e-9));
        assert!((coefficients[0] - 180.0).abs() < 1e-9);
    }

    #[test]
    fn should_carry_bits_through_rounding() {
        for level in [1, 2] {
            let params = EmbeddingParams::for_variant(Variant::Wavelet).with_wavelet_level(level);
            let carrier = textured(Shape::new(48, 40));
            let positions = enumerate(carrier.shape(), &params);

            assert_bits_survive(&Adapter::for_params(&params), &carrier, &positions, params.step);
        }
    }
}
