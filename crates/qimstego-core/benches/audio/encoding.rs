use criterion::{criterion_group, criterion_main, Criterion};
use qimstego_core::encoder::encode;
use qimstego_core::media::Carrier;
use qimstego_core::{EmbeddingParams, Variant};

pub fn audio_encoding(c: &mut Criterion) {
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
        c.bench_function(&format!("Audio Encoding {variant}"), |b| {
            b.iter(|| encode(&tone, "Hello World!", &params).expect("Cannot hide secret message"))
        });
    }
}

criterion_group!(benches, audio_encoding);
criterion_main!(benches);
