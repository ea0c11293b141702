//! GeoRegion CLI - Command-line interface
//!
//! `write` turns a region/sub-region source tree into GeoJSON collections;
//! `read` and `query` load them back and run bounding-box queries.

mod cli;
mod commands;
mod config_loader;
mod output;
mod output_types;

use anyhow::Result;
use clap::Parser;
use cli::Cli;

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    commands::execute(cli)
}
