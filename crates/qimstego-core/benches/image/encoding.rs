use criterion::{criterion_group, criterion_main, Criterion};
use qimstego_core::encoder::encode;
use qimstego_core::media::{Carrier, SampleRange, Shape};
use qimstego_core::{EmbeddingParams, Variant};

fn cover() -> Carrier {
    Carrier::from_fn(Shape::new(256, 256), SampleRange::IMAGE, |r, c| {
        (128.0 + 40.0 * (r as f64 / 5.0).sin() * (c as f64 / 7.0).cos()).round()
    })
}

pub fn image_encoding(c: &mut Criterion) {
    let cover = cover();
    let secret_message = "Hello World!";

    for variant in [Variant::BlockDct, Variant::Dft, Variant::Svd, Variant::Wavelet] {
        let params = EmbeddingParams::for_variant(variant);
        c.bench_function(&format!("Image Encoding {variant}"), |b| {
            b.iter(|| encode(&cover, secret_message, &params).expect("Cannot hide secret message"))
        });
    }
}

criterion_group!(benches, image_encoding);
criterion_main!(benches);
