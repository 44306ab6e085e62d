//! Interactive prompts for first-run setup and playlist selection

use anyhow::{Context, Result};
use dialoguer::{Confirm, Input, MultiSelect};
use std::path::{Path, PathBuf};
use tracing::debug;

use super::selection::{included, PlaylistSelection};
use super::store::Settings;
use crate::library::PlaylistInfo;

/// Prompt for any path missing from `settings`
///
/// Returns `true` when something was filled in and the settings should be saved.
pub fn fill_missing_paths(settings: &mut Settings) -> Result<bool> {
    let mut changed = false;

    if settings.source_path.is_none() {
        println!("First run: tell tunes2wpl where your playlists live.");
        let path = prompt_existing_path(
            "Folder of .m3u8 playlists, or library export file (Library.xml)",
            |path| path.exists(),
        )?;
        settings.source_path = Some(path);
        changed = true;
    }

    if settings.destination_root.is_none() {
        println!("The export folder may be local or a mounted network share.");
        println!("Playlists are written to its root, media files under Media/.");
        let path = prompt_existing_path("Export folder", |path| path.is_dir())?;
        settings.destination_root = Some(path);
        changed = true;
    }

    Ok(changed)
}

fn prompt_existing_path(prompt: &str, valid: impl Fn(&Path) -> bool) -> Result<PathBuf> {
    let input: String = Input::new()
        .with_prompt(prompt)
        .validate_with(move |input: &String| -> std::result::Result<(), &'static str> {
            if valid(Path::new(input.trim())) {
                Ok(())
            } else {
                Err("Path invalid or not found, please try again (ctrl+c to quit)")
            }
        })
        .interact_text()
        .context("Failed to read path")?;

    debug!("Path entered: {}", input.trim());
    Ok(PathBuf::from(input.trim()))
}

/// Ask whether a newly seen playlist should be exported
pub fn confirm_new_playlist(info: &PlaylistInfo) -> Result<bool> {
    Confirm::new()
        .with_prompt(format!(
            "New playlist \"{}\". Export it?",
            info.label()
        ))
        .default(false)
        .interact()
        .context("Failed to read answer")
}

/// Re-ask inclusion for every playlist at once
pub fn choose_playlists(selections: &[PlaylistSelection], available: &[PlaylistInfo]) -> Result<Vec<PlaylistSelection>> {
    let labels: Vec<String> = available
        .iter()
        .map(PlaylistInfo::label)
        .collect();
    let defaults: Vec<bool> = available
        .iter()
        .map(|info| !included(selections, std::slice::from_ref(info)).is_empty())
        .collect();

    let chosen = MultiSelect::new()
        .with_prompt("Playlists to export (space to toggle, enter to confirm)")
        .items(&labels)
        .defaults(&defaults)
        .interact()
        .context("Failed to read playlist selection")?;

    Ok(available
        .iter()
        .enumerate()
        .map(|(idx, info)| PlaylistSelection {
            name: info.name.clone(),
            persistent_id: info.persistent_id.clone(),
            included: chosen.contains(&idx),
        })
        .collect())
}
