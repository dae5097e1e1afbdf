use criterion::{criterion_group, criterion_main, Criterion};
use qimstego_core::decoder::decode;
use qimstego_core::encoder::encode;
use qimstego_core::media::Carrier;
use qimstego_core::{EmbeddingParams, Variant};

pub fn audio_decoding(c: &mut Criterion) {
    let tone = Carrier::audio(
        (0..441_000)
            .map(|i| {
                let t = i as f64 / 44_100.0;
                (8_000.0 * (2.0 * std::f64::consts::PI * 440.0 * t).sin()).round()
            })
            .collect(),
    );

    for variant in [Variant::AudioDct, Variant::AudioWavelet] {
        let params = EmbeddingParams::for_variant(variant);
        let stego = encode(&tone, "Hello World!", &params)
            .expect("Cannot hide secret message")
            .rounded();

        c.bench_function(&format!("Audio Decoding {variant}"), |b| {
            b.iter(|| decode(&stego, &params).expect("Cannot unveil secret message"))
        });
    }
}

criterion_group!(benches, audio_decoding);
criterion_main!(benches);
