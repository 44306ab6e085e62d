//! Playlist name to filename sanitization

const FALLBACK_NAME: &str = "Untitled";

/// Turn a playlist name into a filename safe on FAT/exFAT/SMB destinations
///
/// Reserved characters and control characters become `_`. Leading dots are
/// dropped so the playlist never becomes a hidden file, trailing dots and
/// spaces are dropped because Windows shares reject them.
pub fn sanitize_playlist_name(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    let trimmed = replaced
        .trim()
        .trim_start_matches('.')
        .trim_end_matches(['.', ' '])
        .trim_start();

    if trimmed.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        trimmed.to_string()
    }
}
