use std::path::PathBuf;

use clap::Args;
use qimstego_core::media::Channel;

use crate::CliResult;

/// Measures the distortion between a cover and its stego version
#[derive(Args, Debug)]
pub struct CompareArgs {
    /// The untouched cover media
    #[arg(long, value_name = "original file", required = true)]
    pub original: PathBuf,

    /// The media with a hidden message
    #[arg(long, value_name = "stego file", required = true)]
    pub stego: PathBuf,

    /// Channel to compare: luma, red, green, blue or audio:N
    #[arg(long, value_name = "channel", default_value = "luma")]
    pub channel: Channel,
}

impl CompareArgs {
    pub fn run(self) -> CliResult<()> {
        let distortion =
            qimstego_core::commands::compare(&self.original, &self.stego, self.channel)?;

        println!("MSE:  {:.4}", distortion.mse);
        println!("PSNR: {:.2} dB", distortion.psnr);
        println!("SNR:  {:.2} dB", distortion.snr);
        println!("histogram correlation: {:.4}", distortion.histogram_correlation);
        println!("rating: {}", distortion.rating);

        Ok(())
    }
}
