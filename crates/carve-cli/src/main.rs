//! carve: heuristic source-code unit extractor

use carve_cli::logging::setup_logging;
use carve_cli::{Cli, Commands, commands};
use clap::Parser;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match cli.command {
        Commands::Extract(args) => commands::extract::run(&args)?,
    }

    Ok(())
}
