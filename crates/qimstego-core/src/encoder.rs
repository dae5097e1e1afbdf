use log::debug;

use crate::media::Carrier;
use crate::message::Message;
use crate::params::EmbeddingParams;
use crate::positions::enumerate;
use crate::result::Result;
use crate::transform::{Adapter, TransformAdapter, Unit};
use crate::StegoError;

/// how often a unit gets squeezed further before the encoder gives up on it
const MAX_SQUEEZES: u32 = 4;

/// whole steps added to the modulated coefficients when the rounded unit lost a bit
const STEP_OFFSETS: [f64; 3] = [0.0, 1.0, 2.0];

/// Hides `message` in a copy of `carrier` with the transform selected by `params.variant`.
pub fn encode(carrier: &Carrier, message: &str, params: &EmbeddingParams) -> Result<Carrier> {
    encode_with(carrier, message, params, &Adapter::for_params(params))
}

/// Hides `message` in a copy of `carrier`, the carrier itself stays untouched.
///
/// Fails with [`StegoError::CapacityExceeded`] before anything is written when the
/// message plus terminator needs more bits than there are positions. Degenerate
/// transform units are skipped and do not consume a bit, if that makes the message
/// run out of positions it fails the same way.
pub fn encode_with<A: TransformAdapter>(
    carrier: &Carrier,
    message: &str,
    params: &EmbeddingParams,
    adapter: &A,
) -> Result<Carrier> {
    let message = Message::new(message)?;
    params.validate()?;

    let shape = carrier.shape();
    let bits = message.to_bitstream();
    let positions = enumerate(shape, params);
    if bits.len() > positions.len() {
        return Err(StegoError::CapacityExceeded {
            required: bits.len(),
            available: positions.len(),
        });
    }
    debug!(
        "hiding {} bits in {} positions ({}, step {})",
        bits.len(),
        positions.len(),
        params.variant,
        params.step
    );

    let mut stego = carrier.clone();
    let mut written = 0;
    let mut start = 0;
    while written < bits.len() && start < positions.len() {
        let unit = adapter.unit_of(shape, positions[start]);
        let end = positions[start..]
            .iter()
            .position(|p| adapter.unit_of(shape, *p) != unit)
            .map_or(positions.len(), |offset| start + offset);
        let count = (end - start).min(bits.len() - written);
        let slots: Vec<(usize, bool)> = (start..start + count)
            .map(|i| {
                let index = adapter.target_index(shape, positions[i], i);
                (index, bits[written + i - start])
            })
            .collect();

        match embed_unit(adapter, &mut stego, unit, &slots, params.step) {
            Ok(()) => written += count,
            Err(StegoError::DegenerateTransformUnit { row, col }) => {
                debug!("skipping degenerate unit at ({row}, {col})");
            }
            Err(e) => return Err(e),
        }
        start = end;
    }

    if written < bits.len() {
        return Err(StegoError::CapacityExceeded {
            required: bits.len(),
            available: written,
        });
    }

    Ok(stego)
}

/// Writes `(coefficient index, bit)` pairs into `unit` and stores it like a media would.
///
/// When storage destroys a bit the modulated coefficients are moved up by whole steps,
/// which keeps the bits but rounds differently. Samples clipped at the range limits are
/// handled by squeezing the unit towards the middle of the range by one step, then two,
/// four and eight steps, before the unit is given up.
fn embed_unit<A: TransformAdapter>(
    adapter: &A,
    stego: &mut Carrier,
    unit: Unit,
    slots: &[(usize, bool)],
    step: f64,
) -> Result<()> {
    let region = adapter.footprint(stego.shape(), unit);
    let cover = stego.region(&region);

    for attempt in 0..=MAX_SQUEEZES {
        if attempt > 0 {
            let margin = step * f64::from(1u32 << (attempt - 1));
            debug!(
                "squeezing unit at ({}, {}) by {margin} to keep its bits",
                unit.row, unit.col
            );
            stego.set_region(&region, &cover);
            stego.squeeze_region(&region, margin);
        }

        let coefficients = match adapter.forward(stego, unit) {
            Ok(coefficients) => coefficients,
            Err(e @ StegoError::DegenerateTransformUnit { .. }) if attempt == 0 => return Err(e),
            Err(StegoError::DegenerateTransformUnit { .. }) => continue,
            Err(e) => return Err(e),
        };
        let unmodulated = stego.region(&region);

        for offset in STEP_OFFSETS {
            stego.set_region(&region, &unmodulated);
            let mut modulated = coefficients.clone();
            for (index, bit) in slots {
                adapter.embed_bit(&mut modulated, *index, *bit, step);
                if let Some(c) = modulated.get_mut(*index) {
                    *c += offset * step;
                }
            }
            adapter.inverse(stego, unit, &modulated)?;
            stego.store_region(&region);

            if survives(adapter, stego, unit, slots, step) {
                return Ok(());
            }
        }
    }

    stego.set_region(&region, &cover);
    Err(StegoError::UnstableTransformUnit {
        row: unit.row,
        col: unit.col,
    })
}

/// reads the unit back like the decoder would
fn survives<A: TransformAdapter>(
    adapter: &A,
    stego: &Carrier,
    unit: Unit,
    slots: &[(usize, bool)],
    step: f64,
) -> bool {
    adapter.forward(stego, unit).is_ok_and(|coefficients| {
        slots
            .iter()
            .all(|(index, bit)| adapter.extract_bit(&coefficients, *index, step) == *bit)
    })
}
