use std::path::Path;

use log::debug;
use serde::Serialize;

use crate::media::{Channel, Media, Shape};
use crate::params::{EmbeddingParams, Variant};
use crate::positions::capacity as position_count;
use crate::quality::Distortion;
use crate::transform::texture::TextureProfile;
use crate::{Result, StegoError};

/// hides `message` in `cover` and writes the result to `output`
pub fn hide(cover: &Path, output: &Path, message: &str, params: &EmbeddingParams) -> Result<()> {
    crate::api::hide::prepare()
        .with_params(params.clone())
        .with_message(message)
        .with_image(cover)
        .with_output(output)
        .execute()
}

/// reads the message hidden in `stego_media`, empty when there is none
pub fn unveil(stego_media: &Path, params: &EmbeddingParams, use_fallback: bool) -> Result<String> {
    crate::api::unveil::prepare()
        .with_params(params.clone())
        .use_fallback(use_fallback)
        .from_secret_file(stego_media)
        .execute()
}

/// How much text a cover can take with the given parameters
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CapacityReport {
    pub variant: Variant,
    pub channel: Channel,
    pub width: usize,
    pub height: usize,
    /// number of embedding positions, one bit each
    pub positions: usize,
    /// UTF-8 bytes that fit next to the terminator
    pub message_bytes: usize,
    /// only for the texture method
    #[serde(skip_serializing_if = "Option::is_none")]
    pub texture: Option<TextureProfile>,
}

impl CapacityReport {
    pub fn shape(&self) -> Shape {
        Shape::new(self.width, self.height)
    }
}

pub fn capacity(cover: &Path, params: &EmbeddingParams) -> Result<CapacityReport> {
    params.validate()?;
    let media = Media::from_file(cover)?;
    let carrier = media.carrier(params.channel)?;
    let shape = carrier.shape();
    let positions = position_count(shape, params);
    debug!("{positions} positions for {} in a {shape} plane", params.variant);

    let texture = (params.variant == Variant::Texture)
        .then(|| TextureProfile::of(&carrier, params.texture_radius, params.texture_points));

    Ok(CapacityReport {
        variant: params.variant,
        channel: params.channel,
        width: shape.width,
        height: shape.height,
        positions,
        message_bytes: (positions / 8).saturating_sub(1),
        texture,
    })
}

/// distortion of one channel between a cover and its stego version
pub fn compare(original: &Path, stego_media: &Path, channel: Channel) -> Result<Distortion> {
    let original = Media::from_file(original)?;
    let stego_media = Media::from_file(stego_media)?;
    if original.shape() != stego_media.shape() {
        return Err(StegoError::InvalidParameter {
            name: "stego",
            reason: format!(
                "media of size {} cannot be compared with {}",
                stego_media.shape(),
                original.shape()
            ),
        });
    }

    Distortion::between(&original.carrier(channel)?, &stego_media.carrier(channel)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use tempfile::tempdir;

    fn cover(dir: &Path, size: u32) -> std::path::PathBuf {
        let file = dir.join(format!("cover-{size}.png"));
        RgbaImage::from_fn(size, size, |x, y| {
            Rgba([(100 + (x * 5 + y * 3) % 50) as u8, (110 + (x ^ y) % 40) as u8, 130, 255])
        })
        .save(&file)
        .unwrap();

        file
    }

    #[test]
    fn should_report_capacity_of_a_cover() {
        let dir = tempdir().unwrap();
        let report = capacity(&cover(dir.path(), 80), &EmbeddingParams::default()).unwrap();

        assert_eq!(report.positions, 64);
        assert_eq!(report.message_bytes, 7);
        assert_eq!(report.shape(), Shape::new(80, 80));
        assert_eq!(report.channel, Channel::Luma);
        assert!(report.texture.is_none());
    }

    #[test]
    fn should_profile_texture_for_the_texture_method() {
        let dir = tempdir().unwrap();
        let params = EmbeddingParams::for_variant(Variant::Texture);
        let report = capacity(&cover(dir.path(), 64), &params).unwrap();

        let profile = report.texture.expect("texture profile");
        assert_eq!(profile.histogram.len(), params.texture_points + 2);
        assert!(report.positions > 0);
    }

    #[test]
    fn should_hide_unveil_and_compare() {
        let dir = tempdir().unwrap();
        let cover = cover(dir.path(), 80);
        let stego = dir.path().join("stego.png");
        let params = EmbeddingParams::default();

        hide(&cover, &stego, "Seven!!", &params).unwrap();
        assert_eq!(unveil(&stego, &params, false).unwrap(), "Seven!!");

        let distortion = compare(&cover, &stego, Channel::Luma).unwrap();
        assert!(distortion.mse > 0.0);
        assert!(distortion.psnr > 25.0, "{}", distortion.psnr);
    }

    #[test]
    fn should_refuse_comparing_different_sizes() {
        let dir = tempdir().unwrap();

        assert!(matches!(
            compare(&cover(dir.path(), 64), &cover(dir.path(), 80), Channel::Blue),
            Err(StegoError::InvalidParameter { name: "stego", .. })
        ));
    }
}
