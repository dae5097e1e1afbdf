use clap::Parser;
use log::debug;

use crate::cli::{CliArgs, Commands};
use qimstego_core::Settings;

mod cli;
mod commands;

pub type CliResult<T> = qimstego_core::Result<T>;

fn main() -> CliResult<()> {
    env_logger::init();

    let args = CliArgs::parse();
    let settings = match &args.settings {
        Some(file) => Settings::from_file(file)?,
        None => Settings::default(),
    };
    debug!("using settings {settings:?}");

    match args.command {
        Commands::Hide(hide) => hide.run(&settings),
        Commands::Unveil(unveil) => unveil.run(&settings),
        Commands::Capacity(capacity) => capacity.run(&settings),
        Commands::Compare(compare) => compare.run(),
    }
}
