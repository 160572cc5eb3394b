mod app;
mod cli;
mod commands;
mod types;

use clap::Parser;

/// Main entry point for the `ipd2vcf` CLI.
///
/// Parses command-line arguments and dispatches to the main application logic.
fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    app::run(cli)
}
