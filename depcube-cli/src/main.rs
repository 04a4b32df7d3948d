//! depcube command-line entry point

use anyhow::Result;
use clap::Parser;
use depcube_cli::commands::Commands;

/// Relation-keyed error analysis for dependency attachment
#[derive(Debug, Parser)]
#[command(name = "depcube", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.command.execute()
}
