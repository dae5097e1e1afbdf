use std::path::PathBuf;

use clap::Args;
use qimstego_core::Settings;

use super::MethodArgs;
use crate::CliResult;

/// Hides a text message in PNG/BMP images and WAV audio files
#[derive(Args, Debug)]
pub struct HideArgs {
    /// Media file such as PNG image or WAV audio file, used readonly.
    #[arg(short = 'i', long = "in", value_name = "media file", required = true)]
    pub media: PathBuf,

    /// Final media will be stored as file, PNG, BMP or WAV
    #[arg(
        short = 'o',
        long = "out",
        value_name = "output media file",
        required = true
    )]
    pub write_to_file: PathBuf,

    /// A text message that will be hidden
    #[arg(short, long, value_name = "text message", required = true)]
    pub message: String,

    #[command(flatten)]
    pub method: MethodArgs,
}

impl HideArgs {
    pub fn run(self, settings: &Settings) -> CliResult<()> {
        let params = self.method.params(settings)?;

        qimstego_core::commands::hide(&self.media, &self.write_to_file, &self.message, &params)
    }
}
