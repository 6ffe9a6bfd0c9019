//! Binary crate for the `cityweather` command-line dashboard.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Interactive card selection and configuration
//! - Drawing cards and reports in the terminal

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod prompt;
mod view;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr and stay quiet by default so they don't interleave with the board.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cmd = cli::Cli::parse();
    cmd.run().await
}
