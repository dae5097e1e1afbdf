//! Deterministic enumeration of the coefficient positions a message is written to.
//!
//! The list only depends on the carrier shape and the parameters, never on the samples,
//! so the decoder finds the very same positions on a stego carrier.

use crate::media::Shape;
use crate::params::{EmbeddingParams, Variant};
use crate::transform::dft;

/// Where a bit lives. For block domains the top left sample of the block,
/// for all other domains the coefficient coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// ordered, duplicate free positions, one bit each
pub type PositionList = Vec<Position>;

/// all embedding positions of a carrier of `shape`, in embedding order
pub fn enumerate(shape: Shape, params: &EmbeddingParams) -> PositionList {
    if shape.is_empty() {
        return PositionList::new();
    }
    let stride = (params.stride.0.max(1), params.stride.1.max(1));

    match params.variant {
        Variant::BlockDct | Variant::Svd => blocks(shape, params.block_size, params.border_divisor),
        Variant::Dft => dft_band(shape, params.band_divisor),
        Variant::Wavelet => wavelet_detail(shape, params.wavelet_level, stride),
        Variant::Texture => {
            let (top, bottom) = span(shape.height, params.border_divisor);
            let (left, right) = span(shape.width, params.border_divisor);

            (top..bottom)
                .step_by(stride.0)
                .flat_map(|row| {
                    (left..right)
                        .step_by(stride.1)
                        .map(move |col| Position::new(row, col))
                })
                .collect()
        }
        Variant::AudioDct => {
            if params.block_size == 0 {
                return PositionList::new();
            }
            (0..shape.len() / params.block_size)
                .map(|block| Position::new(0, block))
                .collect()
        }
        Variant::AudioWavelet => {
            let Some(len) = cropped(shape.len(), params.wavelet_level) else {
                return PositionList::new();
            };
            let level = params.wavelet_level.max(1);
            ((len >> level)..(len >> (level - 1)))
                .step_by(stride.1)
                .map(|col| Position::new(0, col))
                .collect()
        }
    }
}

/// number of bits a carrier of `shape` can hold, including the terminator
pub fn capacity(shape: Shape, params: &EmbeddingParams) -> usize {
    enumerate(shape, params).len()
}

/// the usable `[start, end)` range of a dimension after removing the margin on both sides
fn span(dim: usize, border_divisor: usize) -> (usize, usize) {
    let margin = dim.checked_div(border_divisor).unwrap_or(0);

    (margin, dim.saturating_sub(margin))
}

/// `len` cropped to a multiple of `2^level`, `None` if nothing is left
pub(crate) fn cropped(len: usize, level: usize) -> Option<usize> {
    let factor = 1usize.checked_shl(u32::try_from(level).ok()?)?;
    let len = len - len % factor;

    (len >= factor).then_some(len)
}

fn blocks(shape: Shape, block_size: usize, border_divisor: usize) -> PositionList {
    if block_size == 0 {
        return PositionList::new();
    }
    let origins = |dim: usize| {
        let (start, end) = span(dim, border_divisor);
        (start..end)
            .step_by(block_size)
            .take_while(move |o| o + block_size <= end)
    };

    origins(shape.height)
        .flat_map(|row| origins(shape.width).map(move |col| Position::new(row, col)))
        .collect()
}

fn dft_band(shape: Shape, band_divisor: usize) -> PositionList {
    let (top, bottom) = (
        shape.height.checked_div(band_divisor).unwrap_or(0),
        shape.height - shape.height.checked_div(band_divisor).unwrap_or(0),
    );
    let (left, right) = (
        shape.width.checked_div(band_divisor).unwrap_or(0),
        shape.width - shape.width.checked_div(band_divisor).unwrap_or(0),
    );
    let in_band = |p: Position| (top..bottom).contains(&p.row) && (left..right).contains(&p.col);
    let center = Position::new(shape.height / 2, shape.width / 2);

    let mut positions = PositionList::new();
    for row in top..bottom {
        for col in left..right {
            let p = Position::new(row, col);
            let twin = dft::conjugate(shape, p);
            if p == center || p == twin {
                continue;
            }
            // the twin magnitude follows along, only one of them carries a bit
            if in_band(twin) && twin < p {
                continue;
            }
            positions.push(p);
        }
    }

    positions
}

fn wavelet_detail(shape: Shape, level: usize, stride: (usize, usize)) -> PositionList {
    let (Some(height), Some(width)) = (cropped(shape.height, level), cropped(shape.width, level))
    else {
        return PositionList::new();
    };
    let (rows, cols) = (height >> level, width >> level);

    (rows..2 * rows)
        .step_by(stride.0)
        .flat_map(|row| {
            (0..cols)
                .step_by(stride.1)
                .map(move |col| Position::new(row, col))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn should_tile_blocks_inside_the_margin() {
        let params = EmbeddingParams::for_variant(Variant::BlockDct);
        let positions = enumerate(Shape::new(64, 64), &params);

        assert_eq!(positions.len(), 49);
        assert_eq!(positions[0], Position::new(4, 4));
        assert_eq!(positions[1], Position::new(4, 12));
        assert_eq!(positions[7], Position::new(12, 4));
        assert_eq!(positions[48], Position::new(52, 52));

        assert_eq!(capacity(Shape::new(80, 80), &params), 64);
    }

    #[test]
    fn should_be_deterministic() {
        for variant in Variant::ALL {
            let params = EmbeddingParams::for_variant(variant);
            let shape = if variant.is_audio() {
                Shape::new(8192, 1)
            } else {
                Shape::new(96, 64)
            };

            assert_eq!(
                enumerate(shape, &params),
                enumerate(shape, &params),
                "{variant}"
            );
        }
    }

    #[test]
    fn should_never_repeat_a_position() {
        for variant in Variant::ALL {
            let params = EmbeddingParams::for_variant(variant);
            let shape = if variant.is_audio() {
                Shape::new(4096, 1)
            } else {
                Shape::new(64, 48)
            };
            let positions = enumerate(shape, &params);
            let unique: HashSet<_> = positions.iter().collect();

            assert_eq!(unique.len(), positions.len(), "{variant}");
            assert!(!positions.is_empty(), "{variant}");
        }
    }

    #[test]
    fn should_use_each_dft_magnitude_pair_once() {
        let shape = Shape::new(32, 32);
        let params = EmbeddingParams::for_variant(Variant::Dft);
        let positions = enumerate(shape, &params);
        let set: HashSet<_> = positions.iter().copied().collect();

        assert!(!set.contains(&Position::new(16, 16)), "DC is never used");
        for p in &positions {
            assert!((8..24).contains(&p.row) && (8..24).contains(&p.col));
            let twin = dft::conjugate(shape, *p);
            assert_ne!(twin, *p);
            assert!(!set.contains(&twin), "{p:?} and {twin:?} are a pair");
        }
        // the inner 15x15 square without DC forms 112 pairs, the 31 points of the
        // first band row and column have their twins outside of the band
        assert_eq!(positions.len(), 112 + 31);
    }

    #[test]
    fn should_place_texture_positions_on_the_stride_grid() {
        let params = EmbeddingParams::for_variant(Variant::Texture);
        let positions = enumerate(Shape::new(64, 64), &params);

        // margin 8, rows 8..56 every 2nd, cols 8..56 every 4th
        assert_eq!(positions.len(), 24 * 12);
        assert_eq!(positions[0], Position::new(8, 8));
        assert_eq!(positions[1], Position::new(8, 12));
        assert_eq!(positions[12], Position::new(10, 8));
    }

    #[test]
    fn should_use_the_horizontal_detail_quadrant() {
        let params = EmbeddingParams::for_variant(Variant::Wavelet);
        let positions = enumerate(Shape::new(65, 33), &params);

        // cropped to 64x32, level 1 detail rows 16..32, cols 0..32
        assert_eq!(positions.len(), 16 * 32);
        assert_eq!(positions[0], Position::new(16, 0));
        assert_eq!(positions.last(), Some(&Position::new(31, 31)));

        let level2 = enumerate(Shape::new(64, 32), &params.clone().with_wavelet_level(2));
        assert_eq!(level2.len(), 8 * 16);
        assert_eq!(level2[0], Position::new(8, 0));
    }

    #[test]
    fn should_count_audio_positions() {
        let dct = EmbeddingParams::for_variant(Variant::AudioDct);
        assert_eq!(capacity(Shape::new(5000, 1), &dct), 4);

        let wavelet = EmbeddingParams::for_variant(Variant::AudioWavelet);
        let positions = enumerate(Shape::new(1001, 1), &wavelet);
        // cropped to 1000, detail band 500..1000 every 4th
        assert_eq!(positions.len(), 125);
        assert_eq!(positions[0], Position::new(0, 500));
        assert_eq!(positions[1], Position::new(0, 504));
    }

    #[test]
    fn should_yield_nothing_for_tiny_carriers() {
        let params = EmbeddingParams::for_variant(Variant::BlockDct);
        assert!(enumerate(Shape::new(7, 7), &params).is_empty());
        assert!(enumerate(Shape::new(0, 0), &params).is_empty());
        assert_eq!(
            capacity(
                Shape::new(100, 1),
                &EmbeddingParams::for_variant(Variant::AudioDct)
            ),
            0
        );
    }
}
