//! Track location to destination path translation
//!
//! Locations pass through three fixed stages: strip the library root and
//! prefix the media subtree, percent-decode, then NFC-normalize. The result is
//! used for filesystem calls. Only the copy embedded in the playlist document
//! is XML-escaped afterwards.

use std::path::{Component, Path, PathBuf};
use unicode_normalization::UnicodeNormalization;

use crate::error::{ExportError, Result};

/// Destination subtree holding every copied media file
pub const MEDIA_DIR: &str = "Media/";

const FILE_SCHEME: &str = "file://";
const LOCALHOST: &str = "localhost";

/// A translated track location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatedPath {
    /// Relative to the destination root; decoded and normalized, never escaped
    pub destination_relative: String,
    /// `destination_relative` escaped for use inside the playlist document
    pub display_escaped: String,
}

/// How many leading characters of a location to strip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootOffset {
    Fixed(usize),
    /// Keep only the last three components (`Artist/Album/Track`)
    ArtistAlbumTrack,
}

impl RootOffset {
    pub fn length_for(&self, location: &str) -> usize {
        match self {
            Self::Fixed(length) => *length,
            Self::ArtistAlbumTrack => artist_album_track_offset(location),
        }
    }
}

/// Character offset of the third-from-last path component
fn artist_album_track_offset(location: &str) -> usize {
    let byte_offset = location
        .char_indices()
        .rev()
        .filter(|(_, c)| *c == '/')
        .nth(2)
        .map(|(idx, _)| idx + 1)
        .unwrap_or(0);
    location[..byte_offset].chars().count()
}

/// Translate a source location into its destination-relative and display forms
pub fn translate(location: &str, root_length: usize) -> Result<TranslatedPath> {
    let remainder = strip_root(location, root_length)?;
    let prefixed = format!("{}{}", MEDIA_DIR, remainder);
    let decoded = percent_decode(location, &prefixed)?;
    let destination_relative = normalize(&decoded);

    check_confined(location, &destination_relative)?;

    let display_escaped = escape_xml(&destination_relative);
    Ok(TranslatedPath {
        destination_relative,
        display_escaped,
    })
}

fn strip_root(location: &str, root_length: usize) -> Result<&str> {
    if root_length == 0 {
        return Ok(location);
    }
    match location.char_indices().nth(root_length) {
        Some((idx, _)) => Ok(&location[idx..]),
        None if location.chars().count() == root_length => Ok(""),
        None => Err(ExportError::path(
            location,
            format!(
                "library root length {} exceeds location length {}",
                root_length,
                location.chars().count()
            ),
        )),
    }
}

fn percent_decode(location: &str, encoded: &str) -> Result<String> {
    urlencoding::decode(encoded)
        .map(|decoded| decoded.into_owned())
        .map_err(|e| ExportError::path(location, format!("percent-decoding failed: {}", e)))
}

/// Canonical composed form (NFC)
pub fn normalize(text: &str) -> String {
    text.nfc().collect()
}

/// Reject paths that could leave the media subtree
fn check_confined(location: &str, relative: &str) -> Result<()> {
    let path = Path::new(relative);
    if !path.starts_with(MEDIA_DIR.trim_end_matches('/')) {
        return Err(ExportError::path(location, "path leaves the media directory"));
    }
    for component in path.components() {
        if !matches!(component, Component::Normal(_)) {
            return Err(ExportError::path(
                location,
                format!("path component {:?} is not allowed", component.as_os_str()),
            ));
        }
    }
    if path.file_name().is_none() || relative.ends_with('/') {
        return Err(ExportError::path(location, "location does not name a file"));
    }
    Ok(())
}

/// Escape text for a double-quoted XML attribute or element body
///
/// `&` goes first so the entities introduced afterwards are not escaped again.
/// Apostrophes are left alone.
pub fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Absolute filesystem path of a source location
///
/// `file://` URLs are stripped of their scheme and host and percent-decoded;
/// anything else is taken as a plain path.
pub fn resolve_source(location: &str) -> Result<PathBuf> {
    let Some(rest) = location.strip_prefix(FILE_SCHEME) else {
        return Ok(PathBuf::from(location));
    };
    let rest = rest.strip_prefix(LOCALHOST).unwrap_or(rest);
    Ok(PathBuf::from(percent_decode(location, rest)?))
}
