//! CLI command handlers

use anyhow::{Context, Result};
use clap_complete::generate;
use colored::Colorize;
use indicatif::MultiProgress;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::export::Exporter;
use crate::library::{PlaylistInfo, Source};
use crate::settings::{included, prompt, reconcile, Settings};

/// Handle the `export` command
pub fn export(
    config: &Path,
    source: Option<PathBuf>,
    dest: Option<PathBuf>,
    library_root: Option<String>,
    only: Vec<String>,
) -> Result<()> {
    let mut settings = Settings::load(config)?;
    let mut changed = false;

    // Command-line paths replace the saved ones
    if source.is_some() {
        settings.source_path = source;
        changed = true;
    }
    if dest.is_some() {
        settings.destination_root = dest;
        changed = true;
    }
    if library_root.is_some() {
        settings.library_root = library_root;
        changed = true;
    }
    changed |= prompt::fill_missing_paths(&mut settings)?;

    let source = Source::open(settings.source_path()?).context("Failed to open source")?;
    let available = source.playlists().context("Failed to list playlists")?;

    let selected = if !only.is_empty() {
        requested(&only, &available)
    } else if source.is_library() {
        let reconciled = reconcile(&settings.playlists, &available, prompt::confirm_new_playlist)?;
        if reconciled != settings.playlists {
            settings.playlists = reconciled;
            changed = true;
        }
        included(&settings.playlists, &available)
    } else {
        available
    };

    if changed {
        settings.save(config)?;
    }

    if selected.is_empty() {
        println!("{}", "No playlists selected for export.".yellow());
        if source.is_library() {
            println!("Run {} to choose playlists.", "tunes2wpl select".cyan());
        }
        return Ok(());
    }

    let destination = settings.destination_root()?.to_path_buf();
    println!(
        "Exporting {} playlist(s) to {}",
        selected.len(),
        destination.display().to_string().green()
    );

    let exporter = Exporter::new(destination).with_progress(MultiProgress::new());
    let report = exporter.run(
        &source,
        &selected,
        source.root_offset(settings.library_root.as_deref()),
    );

    println!();
    for exported in &report.exported {
        println!(
            "  {} {} -> {} ({} tracks, {} copied)",
            "✓".green(),
            exported.name,
            exported.path.display(),
            exported.tally.item_count,
            exported.tally.copied
        );
    }
    for failed in &report.failed {
        println!("  {} {}: {}", "✗".red(), failed.name, failed.error);
    }

    println!();
    println!("  Playlists exported: {}", report.exported.len());
    println!("  Tracks copied: {}", report.tracks_copied());
    println!("  Tracks already present: {}", report.tracks_present());

    if !report.is_success() {
        anyhow::bail!("{} playlist(s) failed to export", report.failed.len());
    }

    println!("{}", "Export complete!".green().bold());
    Ok(())
}

/// Playlists named on the command line, in the order given
///
/// Unknown names are kept so the export reports them as not found.
fn requested(names: &[String], available: &[PlaylistInfo]) -> Vec<PlaylistInfo> {
    names
        .iter()
        .map(|name| {
            available
                .iter()
                .find(|info| &info.name == name)
                .cloned()
                .unwrap_or_else(|| {
                    warn!("Playlist {} not found in source", name);
                    PlaylistInfo {
                        name: name.clone(),
                        persistent_id: None,
                        track_count: None,
                    }
                })
        })
        .collect()
}

/// Handle the `playlists` command
pub fn playlists(config: &Path) -> Result<()> {
    let settings = Settings::load(config)?;
    let source_path = settings
        .source_path()
        .context("Run 'tunes2wpl export' first to configure a source")?;

    let source = Source::open(source_path).context("Failed to open source")?;
    let available = source.playlists()?;

    if available.is_empty() {
        println!("{}", "No playlists found.".yellow());
        return Ok(());
    }

    let chosen = included(&settings.playlists, &available);
    println!("{}", format!("Playlists in {}:", source_path.display()).bold());
    for info in &available {
        let marker = if !source.is_library() || chosen.contains(info) {
            "[x]".green()
        } else {
            "[ ]".normal()
        };
        println!("  {} {}", marker, info.label());
    }

    Ok(())
}

/// Handle the `select` command
pub fn select(config: &Path) -> Result<()> {
    let mut settings = Settings::load(config)?;
    prompt::fill_missing_paths(&mut settings)?;

    let source = Source::open(settings.source_path()?).context("Failed to open source")?;
    if !source.is_library() {
        println!(
            "{}",
            "Every .m3u8 playlist in the source folder is exported; there is nothing to select.".yellow()
        );
        settings.save(config)?;
        return Ok(());
    }

    let available = source.playlists()?;
    settings.playlists = prompt::choose_playlists(&settings.playlists, &available)?;
    settings.save(config)?;

    let count = settings.playlists.iter().filter(|p| p.included).count();
    debug!("Saved selection of {} playlists", count);
    println!("{} playlist(s) selected for export.", count.to_string().green());
    Ok(())
}

/// Handle the `completion` command
pub fn completion(shell: clap_complete::Shell) {
    let mut cmd = <super::Cli as clap::CommandFactory>::command();
    generate(shell, &mut cmd, "tunes2wpl", &mut io::stdout());
}
