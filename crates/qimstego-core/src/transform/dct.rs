use std::f64::consts::PI;

use super::{TransformAdapter, Unit};
use crate::media::{Carrier, Region, Shape};
use crate::positions::Position;
use crate::result::Result;

/// Orthonormal DCT-II basis of a fixed length, `table[k * n + i]` is basis `k` at sample `i`.
#[derive(Debug, Clone)]
pub struct DctBasis {
    n: usize,
    table: Vec<f64>,
}

impl DctBasis {
    pub fn new(n: usize) -> Self {
        let mut table = Vec::with_capacity(n * n);
        for k in 0..n {
            let alpha = if k == 0 {
                (1.0 / n as f64).sqrt()
            } else {
                (2.0 / n as f64).sqrt()
            };
            for i in 0..n {
                table.push(alpha * (PI * (2 * i + 1) as f64 * k as f64 / (2 * n) as f64).cos());
            }
        }

        Self { n, table }
    }

    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    pub fn forward(&self, input: &[f64]) -> Vec<f64> {
        self.table
            .chunks_exact(self.n.max(1))
            .map(|basis| basis.iter().zip(input).map(|(b, x)| b * x).sum())
            .collect()
    }

    pub fn inverse(&self, coefficients: &[f64]) -> Vec<f64> {
        let mut out = vec![0.0; self.n];
        for (basis, c) in self.table.chunks_exact(self.n.max(1)).zip(coefficients) {
            for (o, b) in out.iter_mut().zip(basis) {
                *o += b * c;
            }
        }

        out
    }

    /// separable 2D transform of a row-major `n x n` block
    pub fn forward_2d(&self, block: &[f64]) -> Vec<f64> {
        self.separable(block, |line| self.forward(line))
    }

    pub fn inverse_2d(&self, coefficients: &[f64]) -> Vec<f64> {
        self.separable(coefficients, |line| self.inverse(line))
    }

    fn separable<F>(&self, block: &[f64], transform: F) -> Vec<f64>
    where
        F: Fn(&[f64]) -> Vec<f64>,
    {
        let n = self.n;
        let mut rows: Vec<f64> = block.chunks_exact(n).flat_map(&transform).collect();

        let mut column = vec![0.0; n];
        for col in 0..n {
            for (row, v) in column.iter_mut().enumerate() {
                *v = rows[row * n + col];
            }
            for (row, v) in transform(&column).into_iter().enumerate() {
                rows[row * n + col] = v;
            }
        }

        rows
    }
}

/// One coefficient of the 2D DCT of every image block.
#[derive(Debug, Clone)]
pub struct BlockDctAdapter {
    basis: DctBasis,
    coefficient: (usize, usize),
}

impl BlockDctAdapter {
    pub fn new(block_size: usize, coefficient: (usize, usize)) -> Self {
        Self {
            basis: DctBasis::new(block_size),
            coefficient,
        }
    }
}

impl TransformAdapter for BlockDctAdapter {
    fn unit_of(&self, _shape: Shape, position: Position) -> Unit {
        Unit::new(position.row, position.col)
    }

    fn forward(&self, carrier: &Carrier, unit: Unit) -> Result<Vec<f64>> {
        let block = read_block(carrier, unit, self.basis.len())?;

        Ok(self.basis.forward_2d(&block))
    }

    fn inverse(&self, carrier: &mut Carrier, unit: Unit, coefficients: &[f64]) -> Result<()> {
        let block = self.basis.inverse_2d(coefficients);

        write_block(carrier, unit, self.basis.len(), &block)
    }

    fn footprint(&self, _shape: Shape, unit: Unit) -> Region {
        block_region(unit, self.basis.len())
    }

    fn target_index(&self, _shape: Shape, _position: Position, _position_index: usize) -> usize {
        self.coefficient.0 * self.basis.len() + self.coefficient.1
    }
}

pub(crate) fn block_region(unit: Unit, n: usize) -> Region {
    Region::new(unit.row..unit.row + n, unit.col..unit.col + n)
}

/// copies the `n x n` block with its top left corner at `unit`, row-major
pub(crate) fn read_block(carrier: &Carrier, unit: Unit, n: usize) -> Result<Vec<f64>> {
    let shape = carrier.shape();
    if n == 0 || unit.row + n > shape.height || unit.col + n > shape.width {
        return Err(unit.out_of_bounds(shape));
    }

    Ok((unit.row..unit.row + n)
        .flat_map(|row| {
            let start = row * shape.width + unit.col;
            carrier.samples()[start..start + n].iter().copied()
        })
        .collect())
}

pub(crate) fn write_block(
    carrier: &mut Carrier,
    unit: Unit,
    n: usize,
    block: &[f64],
) -> Result<()> {
    let shape = carrier.shape();
    if n == 0
        || unit.row + n > shape.height
        || unit.col + n > shape.width
        || block.len() != n * n
    {
        return Err(unit.out_of_bounds(shape));
    }

    for (row, values) in block.chunks_exact(n).enumerate() {
        let start = (unit.row + row) * shape.width + unit.col;
        carrier.samples_mut()[start..start + n].copy_from_slice(values);
    }

    Ok(())
}
