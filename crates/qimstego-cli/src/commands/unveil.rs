use std::path::PathBuf;

use clap::Args;
use log::warn;
use qimstego_core::message::is_plausible;
use qimstego_core::Settings;

use super::MethodArgs;
use crate::CliResult;

/// Unveils a text message from PNG/BMP images and WAV audio files
#[derive(Args, Debug)]
pub struct UnveilArgs {
    /// Source media that contains a secret message
    #[arg(
        short = 'i',
        long = "in",
        value_name = "media source file",
        required = true
    )]
    pub media: PathBuf,

    /// The message is additionally stored in that file
    #[arg(short = 'o', long = "out", value_name = "output file")]
    pub output_file: Option<PathBuf>,

    /// Only try the configured step, never the candidate steps
    #[arg(long)]
    pub no_fallback: bool,

    #[command(flatten)]
    pub method: MethodArgs,
}

impl UnveilArgs {
    pub fn run(self, settings: &Settings) -> CliResult<()> {
        let params = self.method.params(settings)?;
        let mut api = qimstego_core::api::unveil::prepare()
            .with_params(params)
            .use_fallback(settings.fallback && !self.no_fallback)
            .from_secret_file(&self.media);
        if let Some(output_file) = &self.output_file {
            api = api.into_output_file(output_file);
        }

        let message = api.execute()?;
        if !is_plausible(&message) {
            warn!("No readable message found in {}", self.media.display());
        }
        println!("{message}");

        Ok(())
    }
}
