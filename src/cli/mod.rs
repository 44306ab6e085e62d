//! CLI module for tunes2wpl

use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod commands;

#[derive(Parser, Debug)]
#[command(name = "tunes2wpl", about = "Export music library playlists to WPL for network media players")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Settings file (defaults to the user config directory)
    #[arg(long, global = true, env = "TUNES2WPL_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Copy media and write a .wpl file for each selected playlist
    Export {
        /// Folder of .m3u8 playlists, or a library export file (saved for next time)
        #[arg(long, value_name = "PATH")]
        source: Option<PathBuf>,

        /// Export folder (saved for next time)
        #[arg(long, value_name = "PATH")]
        dest: Option<PathBuf>,

        /// Prefix stripped from .m3u8 track paths (saved for next time)
        #[arg(long, value_name = "PREFIX")]
        library_root: Option<String>,

        /// Export only these playlists, ignoring the saved selection
        #[arg(short, long = "playlist", value_name = "NAME")]
        playlists: Vec<String>,
    },

    /// List playlists in the configured source
    Playlists,

    /// Choose which library export playlists to export
    Select,

    /// Generate shell completions
    Completion {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
}
