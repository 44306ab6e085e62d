//! Settings persistence
//!
//! Stored as JSON in ~/.config/tunes2wpl/settings.json unless another path is given.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::selection::PlaylistSelection;

const SETTINGS_FILE: &str = "settings.json";

/// Persistent export settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Folder of `.m3u8` playlists, or a library export file
    pub source_path: Option<PathBuf>,
    /// Folder receiving the playlists and the `Media` tree
    pub destination_root: Option<PathBuf>,
    /// Prefix stripped from m3u8 track locations; defaults to keeping `Artist/Album/Track`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub library_root: Option<String>,
    /// Which library export playlists to export
    #[serde(default)]
    pub playlists: Vec<PlaylistSelection>,
}

impl Settings {
    /// Load settings from `path`, or defaults if the file does not exist yet
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No settings found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {:?}", path))?;

        let settings: Self = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse settings in {:?}", path))?;

        debug!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Save settings to `path`, creating its folder if needed
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {:?}", parent))?;
        }

        let contents = serde_json::to_string_pretty(self).context("Failed to serialize settings")?;

        fs::write(path, contents)
            .with_context(|| format!("Failed to write settings to {:?}", path))?;

        debug!("Saved settings to {}", path.display());
        Ok(())
    }

    /// Default settings file location
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        Ok(config_dir.join("tunes2wpl").join(SETTINGS_FILE))
    }

    pub fn source_path(&self) -> Result<&Path> {
        self.source_path
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("No source path configured"))
    }

    pub fn destination_root(&self) -> Result<&Path> {
        self.destination_root
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("No destination folder configured"))
    }
}
