//! Source libraries: m3u8 playlist folders and property-list library exports

pub mod itunes;
pub mod m3u;

use std::path::Path;
use tracing::debug;

use crate::error::{ExportError, Result};
use crate::export::RootOffset;

pub use itunes::LibraryExport;
pub use m3u::PlaylistDir;

/// A single track as referenced by a source playlist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    /// Location as written in the source (URL-encoded, possibly `file://` prefixed)
    pub location: String,
    pub artist: String,
    pub title: String,
    pub duration_secs: u64,
}

/// An ordered playlist read from a source
#[derive(Debug, Clone)]
pub struct Playlist {
    pub name: String,
    pub persistent_id: Option<String>,
    pub tracks: Vec<Track>,
}

impl Playlist {
    pub fn total_duration(&self) -> u64 {
        self.tracks.iter().map(|t| t.duration_secs).sum()
    }
}

/// Identifies a playlist without reading its tracks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistInfo {
    pub name: String,
    pub persistent_id: Option<String>,
    /// Known without parsing only for library exports
    pub track_count: Option<usize>,
}

impl PlaylistInfo {
    /// Name with the track count when it is known
    pub fn label(&self) -> String {
        match self.track_count {
            Some(count) => format!("{} ({} tracks)", self.name, count),
            None => self.name.clone(),
        }
    }
}

/// Either source representation, behind one track-producing interface
#[derive(Debug)]
pub enum Source {
    Sequential(PlaylistDir),
    Library(LibraryExport),
}

impl Source {
    /// Open a source: a directory is a folder of m3u8 playlists, a file is a library export
    pub fn open(path: &Path) -> Result<Self> {
        if path.is_dir() {
            debug!("Opening m3u8 playlist folder {}", path.display());
            Ok(Self::Sequential(PlaylistDir::new(path.to_path_buf())))
        } else if path.is_file() {
            debug!("Opening library export {}", path.display());
            Ok(Self::Library(LibraryExport::load(path)?))
        } else {
            Err(ExportError::not_found("Source", path.display().to_string()))
        }
    }

    pub fn is_library(&self) -> bool {
        matches!(self, Self::Library(_))
    }

    /// List the exportable playlists, in source order
    pub fn playlists(&self) -> Result<Vec<PlaylistInfo>> {
        match self {
            Self::Sequential(dir) => dir.playlists(),
            Self::Library(library) => Ok(library.playlists()),
        }
    }

    /// Read one playlist's tracks
    pub fn read(&self, info: &PlaylistInfo) -> Result<Playlist> {
        match self {
            Self::Sequential(dir) => dir.read(&info.name),
            Self::Library(library) => library.read(&info.name, info.persistent_id.as_deref()),
        }
    }

    /// How many leading characters of each track location belong to the source library
    pub fn root_offset(&self, library_root: Option<&str>) -> RootOffset {
        match self {
            Self::Library(library) => RootOffset::Fixed(library.root_length()),
            Self::Sequential(_) => match library_root {
                Some(root) => RootOffset::Fixed(root.chars().count()),
                None => RootOffset::ArtistAlbumTrack,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_directory_is_sequential() {
        let dir = tempfile::tempdir().unwrap();
        let source = Source::open(dir.path()).unwrap();
        assert!(!source.is_library());
        assert!(source.playlists().unwrap().is_empty());
    }

    #[test]
    fn test_open_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = Source::open(&dir.path().join("nope.xml")).unwrap_err();
        assert!(matches!(err, ExportError::NotFound { kind: "Source", .. }));
    }

    #[test]
    fn test_root_offset_sequential() {
        let dir = tempfile::tempdir().unwrap();
        let source = Source::open(dir.path()).unwrap();
        assert_eq!(
            source.root_offset(Some("/Users/me/Music/")),
            RootOffset::Fixed(16)
        );
        assert_eq!(source.root_offset(None), RootOffset::ArtistAlbumTrack);
    }

    #[test]
    fn test_playlist_total_duration() {
        let track = |secs| Track {
            location: "/a/b/c.mp3".to_string(),
            artist: String::new(),
            title: String::new(),
            duration_secs: secs,
        };
        let playlist = Playlist {
            name: "Mix".to_string(),
            persistent_id: None,
            tracks: vec![track(185), track(200), track(0)],
        };
        assert_eq!(playlist.total_duration(), 385);
    }
}
