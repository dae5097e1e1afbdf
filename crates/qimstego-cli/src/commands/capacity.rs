use std::path::PathBuf;

use clap::Args;
use qimstego_core::Settings;

use super::MethodArgs;
use crate::CliResult;

/// Reports how much text a media file can take
#[derive(Args, Debug)]
pub struct CapacityArgs {
    /// Media file such as PNG image or WAV audio file
    #[arg(short = 'i', long = "in", value_name = "media file", required = true)]
    pub media: PathBuf,

    /// Print the full report as JSON
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub method: MethodArgs,
}

impl CapacityArgs {
    pub fn run(self, settings: &Settings) -> CliResult<()> {
        let params = self.method.params(settings)?;
        let report = qimstego_core::commands::capacity(&self.media, &params)?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
            return Ok(());
        }

        println!(
            "{} in {} of a {}: {} positions, {} bytes of text",
            report.variant,
            report.channel,
            report.shape(),
            report.positions,
            report.message_bytes
        );
        if let Some(texture) = report.texture {
            println!("uniform texture patterns: {:.1}%", texture.uniform_ratio * 100.0);
        }

        Ok(())
    }
}
