//! Magnitudes of the global 2D DFT.
//!
//! Coordinates are fftshift-ed, the zero frequency sits at `(height / 2, width / 2)`.
//! The spectrum is scaled by `1 / sqrt(width * height)` so that a change of a
//! magnitude maps to a change of the same energy in the sample domain.

use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

use super::{TransformAdapter, Unit};
use crate::media::{Carrier, Shape};
use crate::positions::Position;
use crate::result::Result;

#[derive(Debug, Clone, Default)]
pub struct DftAdapter;

impl DftAdapter {
    pub fn new() -> Self {
        Self
    }
}

/// shifted index `s` of a dimension of length `n` to the frequency index
#[inline]
fn unshift(s: usize, n: usize) -> usize {
    (s + n - n / 2) % n
}

#[inline]
fn shift(k: usize, n: usize) -> usize {
    (k + n / 2) % n
}

/// Position of the frequency whose coefficient is the complex conjugate of the one at `p`.
/// Both share the same magnitude for real valued carriers.
pub fn conjugate(shape: Shape, p: Position) -> Position {
    let mirror = |s: usize, n: usize| shift((n - unshift(s, n)) % n, n);

    Position::new(mirror(p.row, shape.height), mirror(p.col, shape.width))
}

/// orthonormal 2D DFT in unshifted, row-major order
fn spectrum(carrier: &Carrier) -> Vec<Complex<f64>> {
    let shape = carrier.shape();
    let mut data: Vec<Complex<f64>> = carrier
        .samples()
        .iter()
        .map(|s| Complex::new(*s, 0.0))
        .collect();
    transform_2d(&mut data, shape, false);

    data
}

fn transform_2d(data: &mut [Complex<f64>], shape: Shape, inverse: bool) {
    let (width, height) = (shape.width, shape.height);
    let mut planner = FftPlanner::<f64>::new();
    let (rows, cols) = if inverse {
        (planner.plan_fft_inverse(width), planner.plan_fft_inverse(height))
    } else {
        (planner.plan_fft_forward(width), planner.plan_fft_forward(height))
    };

    rows.process(data);

    let mut column = vec![Complex::new(0.0, 0.0); height];
    for col in 0..width {
        for (row, v) in column.iter_mut().enumerate() {
            *v = data[row * width + col];
        }
        cols.process(&mut column);
        for (row, v) in column.iter().enumerate() {
            data[row * width + col] = *v;
        }
    }

    let scale = 1.0 / (shape.len() as f64).sqrt();
    data.iter_mut().for_each(|v| *v *= scale);
}

impl TransformAdapter for DftAdapter {
    fn unit_of(&self, _shape: Shape, _position: Position) -> Unit {
        Unit::new(0, 0)
    }

    fn forward(&self, carrier: &Carrier, unit: Unit) -> Result<Vec<f64>> {
        let shape = carrier.shape();
        if shape.is_empty() {
            return Err(unit.degenerate());
        }
        let spectrum = spectrum(carrier);

        let mut magnitudes = Vec::with_capacity(shape.len());
        for row in 0..shape.height {
            let k_row = unshift(row, shape.height);
            for col in 0..shape.width {
                magnitudes.push(spectrum[k_row * shape.width + unshift(col, shape.width)].norm());
            }
        }

        Ok(magnitudes)
    }

    fn inverse(&self, carrier: &mut Carrier, unit: Unit, magnitudes: &[f64]) -> Result<()> {
        let shape = carrier.shape();
        if magnitudes.len() != shape.len() {
            return Err(unit.out_of_bounds(shape));
        }
        let mut spectrum = spectrum(carrier);
        let index =
            |p: Position| unshift(p.row, shape.height) * shape.width + unshift(p.col, shape.width);

        let changed: Vec<(Position, f64)> = (0..shape.height)
            .flat_map(|row| (0..shape.width).map(move |col| Position::new(row, col)))
            .map(|p| (p, magnitudes[p.row * shape.width + p.col]))
            .filter(|(p, magnitude)| *magnitude != spectrum[index(*p)].norm())
            .collect();

        for (p, magnitude) in changed {
            let k = index(p);
            let value = Complex::from_polar(magnitude, spectrum[k].arg());
            spectrum[k] = value;
            spectrum[index(conjugate(shape, p))] = value.conj();
        }

        transform_2d(&mut spectrum, shape, true);
        for (s, v) in carrier.samples_mut().iter_mut().zip(&spectrum) {
            *s = v.re;
        }

        Ok(())
    }

    fn target_index(&self, shape: Shape, position: Position, _position_index: usize) -> usize {
        position.row * shape.width + position.col
    }
}
