//! Fanchart CLI - Command Line Operations for Forecast Summarisation
//!
//! This is the operational entry point for the fanchart means-and-bands
//! library.
//!
//! # Commands
//!
//! - `fanchart summarize` - Compute means and density bands for every
//!   configured output variable
//! - `fanchart check` - Validate the settings file and input paths
//!   without computing anything
//!
//! # Architecture
//!
//! As the service layer, this crate orchestrates the core, data and
//! compute layers behind a settings-file-driven interface.

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod error;
mod settings;

pub use error::{CliError, Result};

/// Forecast means-and-bands CLI
#[derive(Parser)]
#[command(name = "fanchart")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Settings file path
    #[arg(short, long, global = true, default_value = "fanchart.toml")]
    settings: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute means and bands for every configured output variable
    Summarize,

    /// Validate the settings file and input paths
    Check,
}

fn main() -> anyhow::Result<()> {
    // Initialise tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    match cli.command {
        Commands::Summarize => commands::summarize::run(&cli.settings)?,
        Commands::Check => commands::check::run(&cli.settings)?,
    }
    Ok(())
}
