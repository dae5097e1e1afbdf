use criterion::{criterion_group, criterion_main, Criterion};
use qimstego_core::decoder::decode;
use qimstego_core::encoder::encode;
use qimstego_core::media::{Carrier, SampleRange, Shape};
use qimstego_core::{EmbeddingParams, Variant};

pub fn image_decoding(c: &mut Criterion) {
    let cover = Carrier::from_fn(Shape::new(256, 256), SampleRange::IMAGE, |row, col| {
        (128.0 + 40.0 * (row as f64 / 5.0).sin() * (col as f64 / 7.0).cos()).round()
    });

    for variant in [Variant::BlockDct, Variant::Dft, Variant::Svd, Variant::Wavelet] {
        let params = EmbeddingParams::for_variant(variant);
        let stego = encode(&cover, "Hello World!", &params)
            .expect("Cannot hide secret message")
            .rounded();

        c.bench_function(&format!("Image Decoding {variant}"), |b| {
            b.iter(|| decode(&stego, &params).expect("Cannot unveil secret message"))
        });
    }
}

criterion_group!(benches, image_decoding);
criterion_main!(benches);
