//! Extended M3U (`.m3u8`) playlist reading

use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::{Playlist, PlaylistInfo, Track};
use crate::error::{ExportError, Result};

const EXTINF: &str = "#EXTINF:";
const PLAYLIST_EXTENSION: &str = "m3u8";

enum State {
    AwaitingMeta,
    AwaitingPath { duration: u64, artist: String, title: String },
}

/// Parse playlist lines into tracks, in order
///
/// Each `#EXTINF:<seconds>,<Artist> - <Title>` line supplies the metadata for
/// the next location line. Other `#` lines and blank lines are ignored. A
/// location with no preceding `#EXTINF` gets a zero duration.
pub fn parse_m3u<'a>(origin: &str, lines: impl IntoIterator<Item = &'a str>) -> Result<Vec<Track>> {
    let mut tracks = Vec::new();
    let mut state = State::AwaitingMeta;

    for (idx, raw) in lines.into_iter().enumerate() {
        let line = raw.trim_start_matches('\u{feff}').trim();

        if let Some(info) = line.strip_prefix(EXTINF) {
            let (duration, description) = parse_extinf(info)
                .map_err(|message| ExportError::parse(origin, format!("line {}: {}", idx + 1, message)))?;
            let (artist, title) = split_description(description);
            state = State::AwaitingPath { duration, artist, title };
        } else if line.is_empty() || line.starts_with('#') {
            continue;
        } else {
            let (duration_secs, artist, title) = match std::mem::replace(&mut state, State::AwaitingMeta) {
                State::AwaitingPath { duration, artist, title } => (duration, artist, title),
                State::AwaitingMeta => (0, String::new(), String::new()),
            };
            tracks.push(Track {
                location: line.to_string(),
                artist,
                title,
                duration_secs,
            });
        }
    }

    debug!("Parsed {} tracks from {}", tracks.len(), origin);
    Ok(tracks)
}

/// Split `<seconds>,<description>` into its parts
fn parse_extinf(info: &str) -> std::result::Result<(u64, &str), String> {
    let (seconds, description) = info.split_once(',').unwrap_or((info, ""));
    let seconds = seconds.trim();
    let value: i64 = seconds
        .parse()
        .map_err(|_| format!("invalid duration {:?}", seconds))?;
    // -1 marks an unknown length
    Ok((value.max(0) as u64, description.trim()))
}

fn split_description(description: &str) -> (String, String) {
    match description.split_once(" - ") {
        Some((artist, title)) => (artist.trim().to_string(), title.trim().to_string()),
        None => (String::new(), description.to_string()),
    }
}

/// A folder holding one `.m3u8` file per playlist
#[derive(Debug)]
pub struct PlaylistDir {
    root: PathBuf,
}

impl PlaylistDir {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Playlist files in the folder, sorted by file name
    fn playlist_files(&self) -> Result<Vec<PathBuf>> {
        let entries = fs::read_dir(&self.root).map_err(|err| ExportError::Read {
            path: self.root.clone(),
            err,
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let path = entry
                .map_err(|err| ExportError::Read {
                    path: self.root.clone(),
                    err,
                })?
                .path();
            if path.is_file() && is_playlist_file(&path) {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    /// Playlists by file name only; contents are parsed when each one is read
    pub fn playlists(&self) -> Result<Vec<PlaylistInfo>> {
        Ok(self
            .playlist_files()?
            .iter()
            .map(|path| PlaylistInfo {
                name: playlist_name(path),
                persistent_id: None,
                track_count: None,
            })
            .collect())
    }

    /// Read the playlist whose file stem is `name`
    pub fn read(&self, name: &str) -> Result<Playlist> {
        let path = self
            .playlist_files()?
            .into_iter()
            .find(|path| playlist_name(path) == name)
            .ok_or_else(|| ExportError::not_found("Playlist", name))?;

        Ok(Playlist {
            name: name.to_string(),
            persistent_id: None,
            tracks: read_tracks(&path)?,
        })
    }
}

fn is_playlist_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(PLAYLIST_EXTENSION))
}

fn playlist_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn read_tracks(path: &Path) -> Result<Vec<Track>> {
    let content = fs::read_to_string(path).map_err(|err| ExportError::Read {
        path: path.to_path_buf(),
        err,
    })?;
    parse_m3u(&path.display().to_string(), content.lines())
}
