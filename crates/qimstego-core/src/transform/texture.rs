//! Pixel domain embedding on a sparse grid, plus local binary patterns to describe
//! how much texture there is to hide the changes in.

use std::f64::consts::PI;

use serde::Serialize;

use super::{TransformAdapter, Unit};
use crate::media::{Carrier, Region, SampleRange, Shape};
use crate::modulator::write_bit;
use crate::positions::Position;
use crate::result::Result;

/// Every unit is a single sample, its only coefficient is the sample itself.
#[derive(Debug, Clone)]
pub struct TextureAdapter {
    range: SampleRange,
}

impl TextureAdapter {
    pub fn new(range: SampleRange) -> Self {
        Self { range }
    }
}

impl TransformAdapter for TextureAdapter {
    fn unit_of(&self, _shape: Shape, position: Position) -> Unit {
        Unit::new(position.row, position.col)
    }

    fn forward(&self, carrier: &Carrier, unit: Unit) -> Result<Vec<f64>> {
        let shape = carrier.shape();
        if unit.row >= shape.height || unit.col >= shape.width {
            return Err(unit.out_of_bounds(shape));
        }

        Ok(vec![carrier.get(unit.row, unit.col)])
    }

    fn inverse(&self, carrier: &mut Carrier, unit: Unit, coefficients: &[f64]) -> Result<()> {
        let shape = carrier.shape();
        match coefficients.first() {
            Some(value) if unit.row < shape.height && unit.col < shape.width => {
                carrier.set(unit.row, unit.col, *value);
                Ok(())
            }
            _ => Err(unit.out_of_bounds(shape)),
        }
    }

    fn footprint(&self, _shape: Shape, unit: Unit) -> Region {
        Region::new(unit.row..unit.row + 1, unit.col..unit.col + 1)
    }

    fn target_index(&self, _shape: Shape, _position: Position, _position_index: usize) -> usize {
        0
    }

    /// whole steps keep the value inside the sample range, storage would clip it otherwise
    fn embed_bit(&self, coefficients: &mut [f64], index: usize, bit: bool, step: f64) {
        let Some(c) = coefficients.get_mut(index) else {
            return;
        };

        let mut value = write_bit(*c, bit, step);
        while value > self.range.max {
            value -= step;
        }
        while value < self.range.min {
            value += step;
        }
        *c = value;
    }
}

/// Rotation invariant uniform LBP code of every sample.
///
/// `points` neighbours are sampled bilinearly on a circle of `radius`. Uniform patterns,
/// with at most two 0/1 transitions, get the number of set bits as code, all others `points + 1`.
pub fn local_binary_pattern(plane: &Carrier, radius: usize, points: usize) -> Vec<u32> {
    let shape = plane.shape();
    let offsets: Vec<(f64, f64)> = (0..points)
        .map(|p| {
            let angle = 2.0 * PI * p as f64 / points as f64;
            (-(radius as f64) * angle.sin(), radius as f64 * angle.cos())
        })
        .collect();

    let sample = |row: f64, col: f64| -> f64 {
        let row = row.clamp(0.0, (shape.height - 1) as f64);
        let col = col.clamp(0.0, (shape.width - 1) as f64);
        let (r0, c0) = (row.floor() as usize, col.floor() as usize);
        let (r1, c1) = ((r0 + 1).min(shape.height - 1), (c0 + 1).min(shape.width - 1));
        let (fr, fc) = (row - r0 as f64, col - c0 as f64);

        plane.get(r0, c0) * (1.0 - fr) * (1.0 - fc)
            + plane.get(r0, c1) * (1.0 - fr) * fc
            + plane.get(r1, c0) * fr * (1.0 - fc)
            + plane.get(r1, c1) * fr * fc
    };

    let mut codes = Vec::with_capacity(shape.len());
    let mut bits = vec![false; points];
    for row in 0..shape.height {
        for col in 0..shape.width {
            let center = plane.get(row, col);
            for (bit, (dr, dc)) in bits.iter_mut().zip(&offsets) {
                // tiny tolerance against interpolation noise on flat areas
                *bit = sample(row as f64 + dr, col as f64 + dc) >= center - 1e-9;
            }

            let transitions = (0..points)
                .filter(|i| bits[*i] != bits[(i + 1) % points])
                .count();
            let code = if transitions <= 2 {
                bits.iter().filter(|b| **b).count()
            } else {
                points + 1
            };
            codes.push(code as u32);
        }
    }

    codes
}

/// Texture summary of a plane, reported alongside the capacity of the texture method.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextureProfile {
    pub radius: usize,
    pub points: usize,
    /// share of samples with a uniform pattern, flat and edge like areas
    pub uniform_ratio: f64,
    /// normalized histogram over the codes `0..=points + 1`
    pub histogram: Vec<f64>,
}

impl TextureProfile {
    pub fn of(plane: &Carrier, radius: usize, points: usize) -> Self {
        let codes = local_binary_pattern(plane, radius, points);
        let mut histogram = vec![0.0; points + 2];
        for code in &codes {
            histogram[*code as usize] += 1.0;
        }
        let total = codes.len().max(1) as f64;
        histogram.iter_mut().for_each(|h| *h /= total);

        Self {
            radius,
            points,
            uniform_ratio: 1.0 - histogram[points + 1],
            histogram,
        }
    }
}
