use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use qimstego_core::media::{Carrier, SampleRange, Shape};
use qimstego_core::message::{bits_to_text, is_plausible};
use qimstego_core::{decoder, EmbeddingParams, Variant};

#[test]
fn should_reject_random_bytes_as_messages() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let runs = 10_000;

    let accepted = (0..runs)
        .filter(|_| {
            let bytes: Vec<u8> = (0..64).map(|_| rng.gen()).collect();
            is_plausible(&String::from_utf8_lossy(&bytes))
        })
        .count();

    assert!(accepted * 100 < runs, "{accepted} of {runs} random strings looked like text");
}

#[test]
fn should_reject_short_random_strings() {
    let mut rng = StdRng::seed_from_u64(16);
    let runs = 10_000;

    // about one in 400 strings of 16 random bytes has 12 or more printable characters
    let accepted = (0..runs)
        .filter(|_| {
            let bytes: [u8; 16] = rng.gen();
            is_plausible(&String::from_utf8_lossy(&bytes))
        })
        .count();

    assert!(accepted * 100 < runs, "{accepted} of {runs} random strings looked like text");
}

#[test]
fn should_reject_random_bitstreams_as_messages() {
    let mut rng = StdRng::seed_from_u64(42);

    let accepted = (0..1_000)
        .filter(|_| {
            let bits: Vec<bool> = (0..512).map(|_| rng.gen()).collect();
            is_plausible(&bits_to_text(&bits))
        })
        .count();

    assert!(accepted < 10, "{accepted}");
}

#[test]
fn should_decode_noise_without_panicking() {
    let mut rng = StdRng::seed_from_u64(7);
    let shape = Shape::new(64, 64);

    for variant in [Variant::BlockDct, Variant::Svd, Variant::Texture] {
        let noise = Carrier::from_fn(shape, SampleRange::IMAGE, |_, _| {
            rng.gen_range(0..=255) as f64
        });
        let params = EmbeddingParams::for_variant(variant);

        // whatever comes out, it is bounded by the number of positions
        let text = decoder::decode(&noise, &params).unwrap();
        assert!(text.chars().count() <= 64 * 64 / 8, "{variant}");
    }
}
