use std::fs::File;
use std::io::{BufWriter, Seek, Write};
use std::path::Path;

pub use hound::{WavReader, WavSpec, WavWriter};
use image::ImageFormat;
pub use image::RgbaImage;
use log::{debug, error};

use crate::decoder::decode;
use crate::encoder::encode;
use crate::error::StegoError;
use crate::fallback::recover;
use crate::params::EmbeddingParams;
use crate::result::Result;
use crate::transform::Adapter;

use super::{Carrier, Channel, Persist, SampleRange, Shape};

pub type WavAudio = (WavSpec, Vec<i16>);

/// ITU-R BT.601, sums up to one so a luma delta can be added to R, G and B alike
const LUMA_WEIGHTS: [f64; 3] = [0.299, 0.587, 0.114];

/// a media container for steganography
#[derive(Debug)]
pub enum Media {
    Image(RgbaImage),
    Audio(WavAudio),
}

impl Media {
    pub fn from_image(img: RgbaImage) -> Self {
        Self::Image(img)
    }

    pub fn from_audio(audio: WavAudio) -> Self {
        Self::Audio(audio)
    }

    pub fn from_file(f: &Path) -> Result<Self> {
        let ext = f
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .ok_or(StegoError::UnsupportedMedia)?;

        match ext.as_str() {
            "png" | "bmp" | "jpg" | "jpeg" => Ok(Self::Image(
                image::open(f)
                    .map_err(|e| match e {
                        image::ImageError::IoError(source) => StegoError::ReadError { source },
                        _ => StegoError::InvalidImageMedia,
                    })?
                    .to_rgba8(),
            )),
            "wav" => {
                let mut reader = WavReader::open(f).map_err(|e| match e {
                    hound::Error::IoError(source) => StegoError::ReadError { source },
                    _ => StegoError::InvalidAudioMedia,
                })?;
                let spec = reader.spec();
                if spec.bits_per_sample != 16
                    || spec.sample_format != hound::SampleFormat::Int
                    || spec.channels == 0
                {
                    error!("Only 16 bit PCM audio is supported, got {spec:?}");
                    return Err(StegoError::InvalidAudioMedia);
                }
                let samples = reader
                    .samples::<i16>()
                    .collect::<std::result::Result<Vec<i16>, _>>()
                    .map_err(|_e| StegoError::InvalidAudioMedia)?;

                Ok(Self::Audio((spec, samples)))
            }
            _ => Err(StegoError::UnsupportedMedia),
        }
    }

    /// dimensions of a single channel plane
    pub fn shape(&self) -> Shape {
        match self {
            Media::Image(i) => Shape::new(i.width() as usize, i.height() as usize),
            Media::Audio((spec, samples)) => {
                Shape::new(samples.len() / usize::from(spec.channels.max(1)), 1)
            }
        }
    }

    pub fn channels(&self) -> Vec<Channel> {
        match self {
            Media::Image(_) => vec![Channel::Luma, Channel::Red, Channel::Green, Channel::Blue],
            Media::Audio((spec, _)) => (0..usize::from(spec.channels))
                .map(Channel::Audio)
                .collect(),
        }
    }

    /// the samples of `channel` as a plane to transform
    pub fn carrier(&self, channel: Channel) -> Result<Carrier> {
        let shape = self.shape();
        match (self, channel) {
            (Media::Image(i), Channel::Luma) => Carrier::new(
                shape,
                i.pixels()
                    .map(|p| {
                        LUMA_WEIGHTS
                            .iter()
                            .zip(p.0)
                            .map(|(w, v)| w * f64::from(v))
                            .sum()
                    })
                    .collect(),
                SampleRange::IMAGE,
            ),
            (Media::Image(i), Channel::Red | Channel::Green | Channel::Blue) => {
                let c = color_index(channel);
                Carrier::new(
                    shape,
                    i.pixels().map(|p| f64::from(p.0[c])).collect(),
                    SampleRange::IMAGE,
                )
            }
            (Media::Audio((spec, samples)), Channel::Audio(index))
                if index < usize::from(spec.channels) =>
            {
                Ok(Carrier::audio(
                    samples
                        .iter()
                        .skip(index)
                        .step_by(usize::from(spec.channels))
                        .take(shape.width)
                        .map(|s| f64::from(*s))
                        .collect(),
                ))
            }
            _ => Err(StegoError::ChannelNotAvailable(channel.to_string())),
        }
    }

    /// Writes a (modified) plane back into `channel`, rounded and clamped to the sample type.
    pub fn apply(&mut self, channel: Channel, carrier: &Carrier) -> Result<()> {
        if carrier.shape() != self.shape() {
            return Err(StegoError::InvalidParameter {
                name: "carrier",
                reason: format!(
                    "a {} plane does not fit a {} media",
                    carrier.shape(),
                    self.shape()
                ),
            });
        }

        match (self, channel) {
            (Media::Image(i), Channel::Luma) => {
                for (p, luma) in i.pixels_mut().zip(carrier.samples()) {
                    let rgb = shift_luma([p.0[0], p.0[1], p.0[2]], *luma);
                    p.0[..3].copy_from_slice(&rgb);
                }
                Ok(())
            }
            (Media::Image(i), Channel::Red | Channel::Green | Channel::Blue) => {
                let c = color_index(channel);
                for (p, v) in i.pixels_mut().zip(carrier.samples()) {
                    p.0[c] = to_u8(*v);
                }
                Ok(())
            }
            (Media::Audio((spec, samples)), Channel::Audio(index))
                if index < usize::from(spec.channels) =>
            {
                let range = SampleRange::AUDIO;
                for (s, v) in samples
                    .iter_mut()
                    .skip(index)
                    .step_by(usize::from(spec.channels))
                    .zip(carrier.samples())
                {
                    *s = range.clamp(v.round()) as i16;
                }
                Ok(())
            }
            _ => Err(StegoError::ChannelNotAvailable(channel.to_string())),
        }
    }

    /// hides `message` in the channel and transform selected by `params`
    pub fn hide_message(&mut self, message: &str, params: &EmbeddingParams) -> Result<&mut Self> {
        let carrier = self.carrier(params.channel)?;
        let stego = encode(&carrier, message, params)?;
        self.apply(params.channel, &stego)?;
        debug!("hid {} bytes in {}", message.len(), params.channel);

        Ok(self)
    }

    /// Reads a message hidden with `params`, optionally retrying the candidate steps.
    pub fn unveil_message(&self, params: &EmbeddingParams, use_fallback: bool) -> Result<String> {
        let carrier = self.carrier(params.channel)?;
        if !use_fallback {
            return decode(&carrier, params);
        }

        params.validate()?;
        let recovery = recover(
            &carrier,
            params,
            &Adapter::for_params(params),
            &params.candidate_steps,
        );

        Ok(recovery.text)
    }
}

fn color_index(channel: Channel) -> usize {
    match channel {
        Channel::Green => 1,
        Channel::Blue => 2,
        _ => 0,
    }
}

fn luma_of(rgb: &[f64; 3]) -> f64 {
    LUMA_WEIGHTS.iter().zip(rgb).map(|(w, v)| w * v).sum()
}

/// Moves the luma of `rgb` to `target`. What a clipped color cannot take is
/// handed to the colors that still have room.
fn shift_luma(rgb: [u8; 3], target: f64) -> [u8; 3] {
    let range = SampleRange::IMAGE;
    let mut shifted = rgb.map(f64::from);
    let delta = target - luma_of(&shifted);
    shifted = shifted.map(|v| range.clamp(v + delta));

    for _ in 0..3 {
        let residual = target - luma_of(&shifted);
        if residual.abs() < 1e-9 {
            break;
        }
        let has_room = |v: f64| {
            if residual > 0.0 {
                v < range.max
            } else {
                v > range.min
            }
        };
        let free: f64 = LUMA_WEIGHTS
            .iter()
            .zip(&shifted)
            .filter(|(_, v)| has_room(**v))
            .map(|(w, _)| w)
            .sum();
        if free <= 0.0 {
            break;
        }
        shifted = shifted.map(|v| {
            if has_room(v) {
                range.clamp(v + residual / free)
            } else {
                v
            }
        });
    }

    shifted.map(to_u8)
}

fn to_u8(value: f64) -> u8 {
    SampleRange::IMAGE.clamp(value.round()) as u8
}

impl Persist for Media {
    fn save_as(&mut self, file: &Path) -> Result<()> {
        let ext = file
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();
        let format = match (&*self, ext.as_str()) {
            (Media::Image(_), "png") => Some(ImageFormat::Png),
            (Media::Image(_), "bmp") => Some(ImageFormat::Bmp),
            (Media::Image(_), "jpg" | "jpeg") => {
                return Err(StegoError::LossyTargetFormat(ext.clone()))
            }
            (Media::Audio(_), "wav") => None,
            _ => return Err(StegoError::UnsupportedMedia),
        };

        let f = File::create(file).map_err(|e| {
            error!("Error creating file {file:?}: {e}");
            StegoError::WriteError { source: e }
        })?;
        let mut writer = BufWriter::new(f);
        match format {
            Some(format) => self.write_image(&mut writer, format)?,
            None => self.save_to_writer(&mut writer)?,
        }

        writer
            .flush()
            .map_err(|source| StegoError::WriteError { source })
    }
}

impl Media {
    /// writes images as PNG and audio as WAV
    pub fn save_to_writer<W: Write + Seek>(&mut self, mut writer: W) -> Result<()> {
        match self {
            Media::Image(i) => encode_image(i, &mut writer, ImageFormat::Png),
            Media::Audio((spec, samples)) => {
                let mut wav_writer =
                    WavWriter::new(writer, *spec).map_err(|_| StegoError::AudioCreationError)?;
                if let Some(error) = samples
                    .iter()
                    .map(|s| {
                        wav_writer
                            .write_sample(*s)
                            .map_err(|_| StegoError::AudioEncodingError)
                    })
                    .filter_map(Result::err)
                    .next()
                {
                    return Err(error);
                }
                wav_writer
                    .finalize()
                    .map_err(|_| StegoError::AudioEncodingError)?;

                Ok(())
            }
        }
    }

    fn write_image<W: Write + Seek>(&self, writer: &mut W, format: ImageFormat) -> Result<()> {
        match self {
            Media::Image(i) => encode_image(i, writer, format),
            Media::Audio(_) => Err(StegoError::UnsupportedMedia),
        }
    }
}

fn encode_image<W: Write + Seek>(
    image: &RgbaImage,
    writer: &mut W,
    format: ImageFormat,
) -> Result<()> {
    image.write_to(writer, format).map_err(|e| {
        error!("Error saving image: {e}");
        StegoError::ImageEncodingError
    })
}
