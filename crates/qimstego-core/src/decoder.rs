use log::{debug, trace};

use crate::media::Carrier;
use crate::message::{bits_to_text, TERMINATOR};
use crate::params::EmbeddingParams;
use crate::positions::enumerate;
use crate::result::Result;
use crate::transform::{Adapter, TransformAdapter, Unit};

/// What a decoding pass found in a carrier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub text: String,
    /// a terminator was found on a byte boundary
    pub terminated: bool,
    pub bits_read: usize,
}

/// Reads the message hidden with `params`.
///
/// Only invalid parameters fail. A carrier without a message yields an empty or
/// garbled text, see [`crate::message::is_plausible`].
pub fn decode(carrier: &Carrier, params: &EmbeddingParams) -> Result<String> {
    params.validate()?;

    Ok(decode_with(
        carrier,
        params,
        &Adapter::for_params(params),
        params.max_positions,
    ))
}

/// reads at most `max_positions` bits, stops early at the terminator
pub fn decode_with<A: TransformAdapter>(
    carrier: &Carrier,
    params: &EmbeddingParams,
    adapter: &A,
    max_positions: usize,
) -> String {
    decode_detailed(carrier, params, adapter, max_positions).text
}

pub fn decode_detailed<A: TransformAdapter>(
    carrier: &Carrier,
    params: &EmbeddingParams,
    adapter: &A,
    max_positions: usize,
) -> Extraction {
    let shape = carrier.shape();
    let mut positions = enumerate(shape, params);
    positions.truncate(max_positions);

    let mut bits: Vec<bool> = Vec::with_capacity(positions.len());
    let mut cached: Option<(Unit, Option<Vec<f64>>)> = None;
    for (i, position) in positions.iter().enumerate() {
        let unit = adapter.unit_of(shape, *position);
        if cached.as_ref().map(|(u, _)| *u) != Some(unit) {
            let coefficients = adapter
                .forward(carrier, unit)
                .map_err(|e| debug!("skipping unit at ({}, {}): {e}", unit.row, unit.col))
                .ok();
            cached = Some((unit, coefficients));
        }
        let Some((_, Some(coefficients))) = &cached else {
            continue;
        };

        bits.push(adapter.extract_bit(
            coefficients,
            adapter.target_index(shape, *position, i),
            params.step,
        ));

        if bits.len() % 8 == 0 && bits[bits.len() - 8..] == TERMINATOR {
            trace!("terminator found after {} bits", bits.len());
            return Extraction {
                text: bits_to_text(&bits[..bits.len() - 8]),
                terminated: true,
                bits_read: bits.len(),
            };
        }
    }

    Extraction {
        text: bits_to_text(&bits),
        terminated: false,
        bits_read: bits.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::encode;
    use crate::media::{SampleRange, Shape};
    use crate::params::Variant;

    fn cover() -> Carrier {
        Carrier::from_fn(Shape::new(64, 64), SampleRange::IMAGE, |r, c| {
            110.0 + ((r * 13 + c * 7) % 31) as f64
        })
    }

    #[test]
    fn should_stop_at_the_terminator() {
        let params = EmbeddingParams::for_variant(Variant::BlockDct);
        let stego = encode(&cover(), "Hi", &params).unwrap().rounded();
        let extraction = decode_detailed(&stego, &params, &Adapter::for_params(&params), 1000);

        assert_eq!(
            extraction,
            Extraction {
                text: "Hi".to_string(),
                terminated: true,
                bits_read: 24,
            }
        );
    }

    #[test]
    fn should_yield_nothing_for_flat_carriers() {
        let flat = Carrier::from_fn(Shape::new(64, 64), SampleRange::IMAGE, |_, _| 128.0);
        for variant in [Variant::BlockDct, Variant::Dft, Variant::Wavelet] {
            let params = EmbeddingParams::for_variant(variant);
            let extraction = decode_detailed(&flat, &params, &Adapter::for_params(&params), 1000);

            assert_eq!(extraction.text, "", "{variant}");
            assert!(extraction.terminated, "{variant}");
        }
    }

    #[test]
    fn should_respect_max_positions() {
        let params = EmbeddingParams::for_variant(Variant::BlockDct);
        let stego = encode(&cover(), "Hello", &params).unwrap().rounded();
        let extraction = decode_detailed(&stego, &params, &Adapter::for_params(&params), 12);

        assert_eq!(extraction.bits_read, 12);
        assert!(!extraction.terminated);
        assert!(extraction.text.starts_with('H'));
    }

    #[test]
    fn should_reject_invalid_params() {
        let params = EmbeddingParams::default().with_step(-3.0);

        assert!(decode(&cover(), &params).is_err());
    }
}
