//! Property-list library export (`Library.xml`) reading

use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, warn};

use super::{Playlist, PlaylistInfo, Track};
use crate::error::{ExportError, Result};

/// Subfolder of the music folder that holds the media files
const MEDIA_SUBFOLDER: &str = "Music/";

#[derive(Debug, Deserialize)]
struct RawLibrary {
    #[serde(rename = "Music Folder")]
    music_folder: String,
    #[serde(rename = "Tracks", default)]
    tracks: HashMap<String, LibraryTrack>,
    #[serde(rename = "Playlists", default)]
    playlists: Vec<LibraryPlaylist>,
}

#[derive(Debug, Clone, Deserialize)]
struct LibraryTrack {
    #[serde(rename = "Track ID")]
    track_id: u64,
    #[serde(rename = "Artist")]
    artist: Option<String>,
    #[serde(rename = "Name")]
    name: Option<String>,
    /// Milliseconds
    #[serde(rename = "Total Time")]
    total_time: Option<u64>,
    #[serde(rename = "Location")]
    location: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct LibraryPlaylist {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Playlist Persistent ID")]
    persistent_id: Option<String>,
    #[serde(rename = "Playlist Items", default)]
    items: Vec<PlaylistItem>,
    #[serde(rename = "Master", default)]
    master: bool,
    #[serde(rename = "Distinguished Kind")]
    distinguished_kind: Option<u64>,
    #[serde(rename = "Folder", default)]
    folder: bool,
}

#[derive(Debug, Clone, Deserialize)]
struct PlaylistItem {
    #[serde(rename = "Track ID")]
    track_id: u64,
}

impl LibraryPlaylist {
    /// User playlists only: not the whole library, built-in lists, or folders
    fn is_user_playlist(&self) -> bool {
        !self.master && self.distinguished_kind.is_none() && !self.folder
    }
}

/// A parsed library export
#[derive(Debug)]
pub struct LibraryExport {
    music_folder: String,
    tracks: HashMap<u64, LibraryTrack>,
    playlists: Vec<LibraryPlaylist>,
}

impl LibraryExport {
    /// Load a library export from a property-list file (XML or binary)
    pub fn load(path: &Path) -> Result<Self> {
        let raw: RawLibrary = plist::from_file(path)
            .map_err(|e| ExportError::parse(path.display().to_string(), e.to_string()))?;
        let library = Self::from_raw(raw);
        debug!(
            "Loaded library export: {} tracks, {} playlists",
            library.tracks.len(),
            library.playlists.len()
        );
        Ok(library)
    }

    /// Parse a library export held in memory
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let raw: RawLibrary =
            plist::from_bytes(bytes).map_err(|e| ExportError::parse("library export", e.to_string()))?;
        Ok(Self::from_raw(raw))
    }

    fn from_raw(raw: RawLibrary) -> Self {
        let mut tracks = HashMap::with_capacity(raw.tracks.len());
        for (key, track) in raw.tracks {
            if key != track.track_id.to_string() {
                warn!("Track key {} does not match Track ID {}", key, track.track_id);
            }
            tracks.insert(track.track_id, track);
        }

        Self {
            music_folder: raw.music_folder,
            tracks,
            playlists: raw.playlists,
        }
    }

    /// Characters to strip from a track location to reach its path inside the media subfolder
    pub fn root_length(&self) -> usize {
        self.music_folder.trim_end_matches('/').chars().count() + 1 + MEDIA_SUBFOLDER.len()
    }

    /// User playlists, in library order
    pub fn playlists(&self) -> Vec<PlaylistInfo> {
        self.playlists
            .iter()
            .filter(|p| p.is_user_playlist())
            .map(|p| PlaylistInfo {
                name: p.name.clone(),
                persistent_id: p.persistent_id.clone(),
                track_count: Some(p.items.len()),
            })
            .collect()
    }

    /// Find a playlist by persistent id, falling back to its name
    fn find(&self, name: &str, persistent_id: Option<&str>) -> Result<&LibraryPlaylist> {
        let by_id = persistent_id.and_then(|id| {
            self.playlists
                .iter()
                .find(|p| p.persistent_id.as_deref() == Some(id))
        });

        by_id
            .or_else(|| self.playlists.iter().find(|p| p.name == name))
            .ok_or_else(|| ExportError::not_found("Playlist", name))
    }

    /// Resolve a playlist's track references into tracks, in playlist order
    pub fn read(&self, name: &str, persistent_id: Option<&str>) -> Result<Playlist> {
        let playlist = self.find(name, persistent_id)?;

        let tracks = playlist
            .items
            .iter()
            .map(|item| self.track(item.track_id))
            .collect::<Result<Vec<_>>>()?;

        Ok(Playlist {
            name: playlist.name.clone(),
            persistent_id: playlist.persistent_id.clone(),
            tracks,
        })
    }

    fn track(&self, track_id: u64) -> Result<Track> {
        let track = self
            .tracks
            .get(&track_id)
            .ok_or_else(|| ExportError::not_found("Track", track_id.to_string()))?;

        let location = track.location.clone().ok_or_else(|| {
            ExportError::parse("library export", format!("track {} has no Location", track_id))
        })?;

        Ok(Track {
            location,
            artist: track.artist.clone().unwrap_or_default(),
            title: track.name.clone().unwrap_or_default(),
            duration_secs: track.total_time.unwrap_or(0) / 1000,
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) const LIBRARY: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple Computer//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
	<key>Major Version</key><integer>1</integer>
	<key>Music Folder</key><string>file:///Users/me/Music/iTunes/iTunes%20Media/</string>
	<key>Tracks</key>
	<dict>
		<key>101</key>
		<dict>
			<key>Track ID</key><integer>101</integer>
			<key>Name</key><string>Café</string>
			<key>Artist</key><string>Rock &amp; Roll</string>
			<key>Total Time</key><integer>185999</integer>
			<key>Location</key><string>file:///Users/me/Music/iTunes/iTunes%20Media/Music/Rock%20&amp;%20Roll/Album/01%20Cafe%CC%81.mp3</string>
		</dict>
		<key>102</key>
		<dict>
			<key>Track ID</key><integer>102</integer>
			<key>Name</key><string>Second</string>
			<key>Artist</key><string>Band</string>
			<key>Total Time</key><integer>200500</integer>
			<key>Location</key><string>file:///Users/me/Music/iTunes/iTunes%20Media/Music/Band/Record/02%20Second.m4a</string>
		</dict>
		<key>103</key>
		<dict>
			<key>Track ID</key><integer>103</integer>
			<key>Name</key><string>Streamed</string>
		</dict>
	</dict>
	<key>Playlists</key>
	<array>
		<dict>
			<key>Name</key><string>Library</string>
			<key>Master</key><true/>
			<key>Playlist Persistent ID</key><string>0000000000000001</string>
			<key>Playlist Items</key>
			<array>
				<dict><key>Track ID</key><integer>101</integer></dict>
			</array>
		</dict>
		<dict>
			<key>Name</key><string>Music</string>
			<key>Distinguished Kind</key><integer>4</integer>
			<key>Playlist Persistent ID</key><string>0000000000000002</string>
		</dict>
		<dict>
			<key>Name</key><string>Road Trip</string>
			<key>Playlist Persistent ID</key><string>AAAA000000000001</string>
			<key>Playlist Items</key>
			<array>
				<dict><key>Track ID</key><integer>102</integer></dict>
				<dict><key>Track ID</key><integer>101</integer></dict>
			</array>
		</dict>
		<dict>
			<key>Name</key><string>Road Trip</string>
			<key>Playlist Persistent ID</key><string>AAAA000000000002</string>
			<key>Playlist Items</key>
			<array>
				<dict><key>Track ID</key><integer>102</integer></dict>
			</array>
		</dict>
		<dict>
			<key>Name</key><string>Broken</string>
			<key>Playlist Persistent ID</key><string>BBBB000000000001</string>
			<key>Playlist Items</key>
			<array>
				<dict><key>Track ID</key><integer>101</integer></dict>
				<dict><key>Track ID</key><integer>999</integer></dict>
			</array>
		</dict>
		<dict>
			<key>Name</key><string>Cloud Only</string>
			<key>Playlist Persistent ID</key><string>CCCC000000000001</string>
			<key>Playlist Items</key>
			<array>
				<dict><key>Track ID</key><integer>103</integer></dict>
			</array>
		</dict>
	</array>
</dict>
</plist>
"#;

    fn library() -> LibraryExport {
        LibraryExport::from_bytes(LIBRARY.as_bytes()).unwrap()
    }

    #[test]
    fn test_lists_user_playlists_only() {
        let names: Vec<_> = library().playlists().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["Road Trip", "Road Trip", "Broken", "Cloud Only"]);
    }

    #[test]
    fn test_read_resolves_tracks_in_order() {
        let playlist = library().read("Road Trip", None).unwrap();
        assert_eq!(playlist.persistent_id.as_deref(), Some("AAAA000000000001"));
        let titles: Vec<_> = playlist.tracks.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["Second", "Café"]);
        assert_eq!(playlist.tracks[1].artist, "Rock & Roll");
    }

    #[test]
    fn test_duration_floors_milliseconds() {
        let playlist = library().read("Road Trip", None).unwrap();
        assert_eq!(playlist.tracks[0].duration_secs, 200);
        assert_eq!(playlist.tracks[1].duration_secs, 185);
        assert_eq!(playlist.total_duration(), 385);
    }

    #[test]
    fn test_duplicate_names_resolved_by_persistent_id() {
        let playlist = library()
            .read("Road Trip", Some("AAAA000000000002"))
            .unwrap();
        assert_eq!(playlist.tracks.len(), 1);
    }

    #[test]
    fn test_stale_persistent_id_falls_back_to_name() {
        let err = library().read("Broken", Some("DELETED")).unwrap_err();
        assert!(matches!(err, ExportError::NotFound { kind: "Track", .. }));
    }

    #[test]
    fn test_missing_playlist() {
        let err = library().read("Deleted Upstream", Some("FFFF")).unwrap_err();
        match err {
            ExportError::NotFound { kind, id } => {
                assert_eq!(kind, "Playlist");
                assert_eq!(id, "Deleted Upstream");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_track_reference() {
        let err = library().read("Broken", None).unwrap_err();
        match err {
            ExportError::NotFound { kind, id } => {
                assert_eq!(kind, "Track");
                assert_eq!(id, "999");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_track_without_location() {
        let err = library().read("Cloud Only", None).unwrap_err();
        assert!(matches!(err, ExportError::Parse { .. }));
    }

    #[test]
    fn test_root_length_strips_media_subfolder() {
        let library = library();
        let location = "file:///Users/me/Music/iTunes/iTunes%20Media/Music/Band/Record/02%20Second.m4a";
        let rest: String = location.chars().skip(library.root_length()).collect();
        assert_eq!(rest, "Band/Record/02%20Second.m4a");
    }

    #[test]
    fn test_invalid_plist() {
        let err = LibraryExport::from_bytes(b"not a plist").unwrap_err();
        assert!(matches!(err, ExportError::Parse { .. }));
    }
}
