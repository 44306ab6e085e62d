//! Export orchestration

use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

use super::copier::{ensure_copied, CopyOutcome};
use super::path::{resolve_source, translate, RootOffset};
use super::wpl::{self, ExportTally};
use crate::error::{ExportError, Result};
use crate::library::{Playlist, PlaylistInfo, Source};
use crate::utils::sanitize_playlist_name;

/// A playlist that was written successfully
#[derive(Debug)]
pub struct ExportedPlaylist {
    pub name: String,
    pub path: PathBuf,
    pub tally: ExportTally,
}

/// A playlist whose export was aborted
#[derive(Debug)]
pub struct FailedPlaylist {
    pub name: String,
    pub error: ExportError,
}

/// Outcome of exporting a set of playlists
#[derive(Debug, Default)]
pub struct ExportReport {
    pub exported: Vec<ExportedPlaylist>,
    pub failed: Vec<FailedPlaylist>,
}

impl ExportReport {
    pub fn tracks_copied(&self) -> usize {
        self.exported.iter().map(|p| p.tally.copied).sum()
    }

    pub fn tracks_present(&self) -> usize {
        self.exported.iter().map(|p| p.tally.already_present).sum()
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Exports playlists and their media into a destination folder
pub struct Exporter {
    destination_root: PathBuf,
    progress: MultiProgress,
}

impl Exporter {
    /// Create an exporter with progress output hidden
    pub fn new(destination_root: PathBuf) -> Self {
        Self {
            destination_root,
            progress: MultiProgress::with_draw_target(ProgressDrawTarget::hidden()),
        }
    }

    /// Draw per-playlist progress bars on `progress`
    pub fn with_progress(mut self, progress: MultiProgress) -> Self {
        self.progress = progress;
        self
    }

    /// Where the document for `name` is written
    pub fn playlist_path(&self, name: &str) -> PathBuf {
        self.destination_root
            .join(format!("{}.{}", sanitize_playlist_name(name), wpl::EXTENSION))
    }

    /// Document path for `name` that no earlier playlist of this run has written
    ///
    /// Names are compared case-insensitively. A taken name gets a ` (2)`, ` (3)`, ...
    /// suffix before the extension.
    fn unclaimed_path(&self, name: &str, claimed: &HashSet<String>) -> PathBuf {
        let stem = sanitize_playlist_name(name);
        let mut file_name = format!("{}.{}", stem, wpl::EXTENSION);
        let mut n = 2;
        while claimed.contains(&file_name.to_lowercase()) {
            file_name = format!("{} ({}).{}", stem, n, wpl::EXTENSION);
            n += 1;
        }
        self.destination_root.join(file_name)
    }

    /// Read and export each selected playlist
    ///
    /// A failing playlist is recorded in the report and does not stop the rest.
    /// Playlists whose names map to the same file are written side by side
    /// under suffixed names.
    pub fn run(&self, source: &Source, selected: &[PlaylistInfo], offset: RootOffset) -> ExportReport {
        let mut report = ExportReport::default();
        let mut claimed = HashSet::new();

        for info in selected {
            let path = self.unclaimed_path(&info.name, &claimed);
            if path != self.playlist_path(&info.name) {
                warn!(
                    "Playlist name {:?} is already taken, writing {}",
                    info.name,
                    path.display()
                );
            }

            let result = source
                .read(info)
                .and_then(|playlist| self.export_playlist_to(&playlist, offset, &path));

            match result {
                Ok(tally) => {
                    if let Some(file_name) = path.file_name() {
                        claimed.insert(file_name.to_string_lossy().to_lowercase());
                    }
                    report.exported.push(ExportedPlaylist {
                        name: info.name.clone(),
                        path,
                        tally,
                    });
                }
                Err(e) => {
                    error!("Failed to export playlist {}: {}", info.name, e);
                    report.failed.push(FailedPlaylist {
                        name: info.name.clone(),
                        error: e,
                    });
                }
            }
        }

        report
    }

    /// Copy a playlist's media and write its document
    ///
    /// The first failing track aborts the playlist before the document is
    /// written. Files copied before the failure stay in place.
    pub fn export_playlist(&self, playlist: &Playlist, offset: RootOffset) -> Result<ExportTally> {
        self.export_playlist_to(playlist, offset, &self.playlist_path(&playlist.name))
    }

    fn export_playlist_to(&self, playlist: &Playlist, offset: RootOffset, path: &Path) -> Result<ExportTally> {
        info!(
            "Exporting playlist: {} ({} tracks, {}s)",
            playlist.name,
            playlist.tracks.len(),
            playlist.total_duration()
        );

        let bar = self.progress.add(ProgressBar::new(playlist.tracks.len() as u64));
        bar.set_style(
            ProgressStyle::with_template("{spinner:.green} {prefix} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        bar.set_prefix(playlist.name.clone());

        let result = self.copy_tracks(playlist, offset, &bar);
        match &result {
            Ok(_) => bar.finish_with_message("done"),
            Err(_) => bar.abandon_with_message("failed"),
        }
        let tally = result?;

        let document = wpl::serialize(&playlist.name, &tally);
        write_document(path, &document)?;

        info!(
            "Wrote {} ({} tracks, {} copied, {}s)",
            path.display(),
            tally.item_count,
            tally.copied,
            tally.total_duration_secs
        );
        Ok(tally)
    }

    fn copy_tracks(&self, playlist: &Playlist, offset: RootOffset, bar: &ProgressBar) -> Result<ExportTally> {
        let mut tally = ExportTally::default();

        for track in &playlist.tracks {
            let translated = translate(&track.location, offset.length_for(&track.location))?;
            let source = resolve_source(&track.location)?;

            bar.set_message(translated.destination_relative.clone());
            match ensure_copied(&source, &translated.destination_relative, &self.destination_root)? {
                CopyOutcome::Copied(bytes) => {
                    info!("Copied {} ({} bytes)", translated.destination_relative, bytes);
                    tally.copied += 1;
                }
                CopyOutcome::AlreadyPresent => tally.already_present += 1,
            }

            tally.push(translated.display_escaped, track.duration_secs);
            bar.inc(1);
        }

        debug!(
            "Playlist {}: {} tracks, {} already present",
            playlist.name, tally.item_count, tally.already_present
        );
        Ok(tally)
    }
}

fn write_document(path: &Path, document: &[u8]) -> Result<()> {
    let write_error = |err| ExportError::Write {
        path: path.to_path_buf(),
        err,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(write_error)?;
    }
    fs::write(path, document).map_err(write_error)
}
