//! candidate: inspect and round-trip YAML documents through candidate trees

mod cli_bin;

use anyhow::Result;
use clap::Parser;
use cli_bin::args::{Cli, Commands};
use cli_bin::commands::{inspect_command, roundtrip_command};
use log::LevelFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);

    match cli.command {
        Commands::Inspect(args) => inspect_command(args)?,
        Commands::Roundtrip(args) => roundtrip_command(args)?,
    }
    Ok(())
}

fn init_logging(cli: &Cli) {
    let level = if cli.verbose {
        LevelFilter::Debug
    } else if cli.quiet {
        LevelFilter::Error
    } else {
        LevelFilter::Warn
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}
