//! # QIM Stego Core API
//!
//! Hides short text messages in the transform domain of PNG/BMP images and
//! 16-bit WAV audio by quantization index modulation. The methods are listed in [`Variant`]:
//! - block DCT, global DFT, block SVD, Haar wavelet and raw texture positions for images
//! - block DCT and Haar wavelet for audio
//!
//! Encoder and decoder have to agree on the same [`EmbeddingParams`], nothing but the
//! message itself is stored in the carrier.
//!
//! # Usage Examples
//!
//! ## Hide a message inside an image
//!
//! ```rust
//! use image::{Rgba, RgbaImage};
//! use tempfile::tempdir;
//!
//! let temp_dir = tempdir().expect("Failed to create temporary directory");
//! let cover = temp_dir.path().join("cover.png");
//! RgbaImage::from_fn(128, 128, |x, y| {
//!     Rgba([(x % 200) as u8, 90, (80 + (x * 3 + y * 5) % 90) as u8, 255])
//! })
//! .save(&cover)
//! .expect("Failed to write cover image");
//!
//! qimstego_core::api::hide::prepare()
//!     .with_message("Hello, World!")
//!     .with_params(qimstego_core::EmbeddingParams::for_variant(qimstego_core::Variant::Svd))
//!     .with_image(&cover)
//!     .with_output(temp_dir.path().join("image-with-a-message.png"))
//!     .execute()
//!     .expect("Failed to hide message in image");
//! ```
//!
//! ## Unveil a message from a carrier in memory
//!
//! ```rust
//! use qimstego_core::media::{Carrier, SampleRange, Shape};
//! use qimstego_core::{decoder, encoder, EmbeddingParams};
//!
//! let cover = Carrier::from_fn(Shape::new(64, 64), SampleRange::IMAGE, |r, c| {
//!     (100 + (r * 7 + c * 3) % 50) as f64
//! });
//! let params = EmbeddingParams::default().with_step(10.0);
//!
//! let stego = encoder::encode(&cover, "Hi", &params).expect("Failed to hide message");
//! let message = decoder::decode(&stego.rounded(), &params).expect("Failed to unveil message");
//!
//! assert_eq!(message, "Hi");
//! ```

#![warn(
    // clippy::unwrap_used,
    // clippy::expect_used,
// clippy::cast_lossless,
// clippy::cognitive_complexity,
// clippy::get_unwrap,
// clippy::match_bool,
// clippy::option_if_let_else,
// clippy::redundant_closure,
    clippy::redundant_else,
// clippy::use_self,
)]

pub mod api;
pub mod commands;
pub mod decoder;
pub mod encoder;
pub mod fallback;
pub mod media;
pub mod modulator;
pub mod positions;
pub mod quality;
pub mod settings;
pub mod transform;

pub mod message;
pub use message::Message;

pub mod params;
pub use params::{EmbeddingParams, Variant};

pub mod error;
pub use error::StegoError;

pub mod result;
pub use result::Result;

pub use media::{Carrier, Channel, Media, Persist, SampleRange, Shape};
pub use settings::Settings;
pub use transform::{Adapter, TransformAdapter};
