//! Quantization index modulation, one bit per coefficient.
//!
//! A `0` forces a coefficient onto the lattice `step * k`, a `1` onto the
//! interleaved lattice `step * k + step / 2`.

/// Half width of the band around the half lattice that still reads as `1`.
/// Absorbs the drift of a transform round trip and of integer sample storage.
pub const DEFAULT_TOLERANCE: f64 = 0.25;

/// moves `coefficient` onto the lattice that represents `bit`
#[inline]
pub fn write_bit(coefficient: f64, bit: bool, step: f64) -> f64 {
    let base = step * (coefficient / step).round();
    if bit {
        base + step / 2.0
    } else {
        base
    }
}

/// reads the bit represented by the lattice `coefficient` is closest to
#[inline]
pub fn read_bit(coefficient: f64, step: f64, tolerance: f64) -> bool {
    let r = (coefficient / step).rem_euclid(1.0);
    (tolerance..=1.0 - tolerance).contains(&r)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const EPSILON: f64 = 1e-9;

    /// distance of `x` to the nearest multiple of `step`, relative to `step`
    fn lattice_distance(x: f64, step: f64) -> f64 {
        let r = (x / step).rem_euclid(1.0);
        r.min(1.0 - r)
    }

    #[test]
    fn should_round_to_nearest_multiple_for_zero() {
        assert_eq!(write_bit(23.0, false, 10.0), 20.0);
        assert_eq!(write_bit(26.0, false, 10.0), 30.0);
        assert_eq!(write_bit(-26.0, false, 10.0), -30.0);
    }

    #[test]
    fn should_add_half_step_for_one() {
        assert_eq!(write_bit(23.0, true, 10.0), 25.0);
        assert_eq!(write_bit(26.0, true, 10.0), 35.0);
        assert_eq!(write_bit(-26.0, true, 10.0), -25.0);
    }

    #[test]
    fn should_read_with_tolerance_band() {
        assert!(!read_bit(20.0, 10.0, DEFAULT_TOLERANCE));
        assert!(!read_bit(22.4, 10.0, DEFAULT_TOLERANCE));
        assert!(read_bit(22.5, 10.0, DEFAULT_TOLERANCE));
        assert!(read_bit(27.5, 10.0, DEFAULT_TOLERANCE));
        assert!(!read_bit(27.6, 10.0, DEFAULT_TOLERANCE));
        assert!(read_bit(-25.0, 10.0, DEFAULT_TOLERANCE));
        assert!(!read_bit(-20.0, 10.0, DEFAULT_TOLERANCE));
    }

    proptest! {
        #[test]
        fn zero_is_congruent_to_zero(c in -1.0e5f64..1.0e5, step in 0.5f64..100.0) {
            let written = write_bit(c, false, step);
            prop_assert!(lattice_distance(written, step) < EPSILON);
        }

        #[test]
        fn one_is_congruent_to_half_step(c in -1.0e5f64..1.0e5, step in 0.5f64..100.0) {
            let written = write_bit(c, true, step);
            prop_assert!(lattice_distance(written - step / 2.0, step) < EPSILON);
        }

        #[test]
        fn written_bits_survive_small_drift(
            c in -1.0e4f64..1.0e4,
            step in 1.0f64..100.0,
            bit in any::<bool>(),
            drift in -0.2f64..0.2,
        ) {
            let written = write_bit(c, bit, step) + drift * step;
            prop_assert_eq!(read_bit(written, step, DEFAULT_TOLERANCE), bit);
        }
    }
}
