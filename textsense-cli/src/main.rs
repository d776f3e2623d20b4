//! textsense command-line entry point

use clap::Parser;
use textsense_cli::commands::Commands;

/// Adaptive text analysis with cost telemetry and strategy selection
#[derive(Debug, Parser)]
#[command(name = "textsense", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    cli.command.execute()
}
