use clap::Args;
use qimstego_core::media::Channel;
use qimstego_core::{EmbeddingParams, Settings, Variant};

use crate::CliResult;

pub mod capacity;
pub mod compare;
pub mod hide;
pub mod unveil;

/// Overrides on top of the settings file, shared by all commands that embed or extract
#[derive(Args, Debug, Default)]
pub struct MethodArgs {
    /// Embedding method: dct, dft, svd, wavelet, lbp, audio-dct or audio-wavelet
    #[arg(long, value_name = "method")]
    pub method: Option<Variant>,

    /// Quantization step, larger survives more distortion but is more visible
    #[arg(long, value_name = "step")]
    pub step: Option<f64>,

    /// Channel the message lives in: luma, red, green, blue or audio:N
    #[arg(long, value_name = "channel")]
    pub channel: Option<Channel>,
}

impl MethodArgs {
    pub fn params(&self, settings: &Settings) -> CliResult<EmbeddingParams> {
        let mut params = settings.params_for(self.method.unwrap_or(settings.method))?;
        if let Some(step) = self.step {
            params = params.with_step(step);
        }
        if let Some(channel) = self.channel {
            params = params.with_channel(channel);
        }
        params.validate()?;

        Ok(params)
    }
}
