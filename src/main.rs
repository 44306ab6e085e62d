//! tunes2wpl - Export music library playlists as WPL with a self-contained media copy

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod error;
mod export;
mod library;
mod settings;
mod utils;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "tunes2wpl=debug"
    } else {
        "tunes2wpl=info"
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let config = match cli.config {
        Some(path) => path,
        None => settings::Settings::default_path()?,
    };

    match cli.command {
        Commands::Export {
            source,
            dest,
            library_root,
            playlists,
        } => {
            cli::commands::export(&config, source, dest, library_root, playlists)?;
        }
        Commands::Playlists => {
            cli::commands::playlists(&config)?;
        }
        Commands::Select => {
            cli::commands::select(&config)?;
        }
        Commands::Completion { shell } => {
            cli::commands::completion(shell);
        }
    }

    Ok(())
}
