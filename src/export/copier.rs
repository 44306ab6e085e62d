//! Existence-checked media file copying

use std::fs;
use std::path::Path;
use tracing::debug;

use crate::error::{ExportError, Result};

/// Result of ensuring a media file is present at the destination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyOutcome {
    AlreadyPresent,
    /// Copied, with the number of bytes written
    Copied(u64),
}

/// Copy `source` to `destination_root/destination_relative` unless a file is already there
///
/// An existing file is never re-validated or overwritten.
pub fn ensure_copied(
    source: &Path,
    destination_relative: &str,
    destination_root: &Path,
) -> Result<CopyOutcome> {
    let destination = destination_root.join(destination_relative);

    if destination.is_file() {
        debug!("Already present: {}", destination.display());
        return Ok(CopyOutcome::AlreadyPresent);
    }

    let copy_error = |err| ExportError::Copy {
        from: source.to_path_buf(),
        to: destination.clone(),
        err,
    };

    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent).map_err(copy_error)?;
    }

    let bytes = fs::copy(source, &destination).map_err(copy_error)?;
    debug!("Copied {} ({} bytes)", destination.display(), bytes);
    Ok(CopyOutcome::Copied(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copies_once() {
        let src_dir = tempfile::tempdir().unwrap();
        let dest = tempfile::tempdir().unwrap();
        let source = src_dir.path().join("track.mp3");
        fs::write(&source, b"audio bytes").unwrap();

        let first = ensure_copied(&source, "Media/Artist/Album/track.mp3", dest.path()).unwrap();
        assert_eq!(first, CopyOutcome::Copied(11));

        let copied = dest.path().join("Media/Artist/Album/track.mp3");
        assert_eq!(fs::read(&copied).unwrap(), b"audio bytes");

        // Existence, not content, marks completion
        fs::write(&source, b"changed").unwrap();
        let second = ensure_copied(&source, "Media/Artist/Album/track.mp3", dest.path()).unwrap();
        assert_eq!(second, CopyOutcome::AlreadyPresent);
        assert_eq!(fs::read(&copied).unwrap(), b"audio bytes");
    }

    #[test]
    fn test_existing_file_skips_missing_source() {
        let dest = tempfile::tempdir().unwrap();
        fs::create_dir_all(dest.path().join("Media/A")).unwrap();
        fs::write(dest.path().join("Media/A/x.mp3"), b"old").unwrap();

        let outcome = ensure_copied(Path::new("/nonexistent/x.mp3"), "Media/A/x.mp3", dest.path()).unwrap();
        assert_eq!(outcome, CopyOutcome::AlreadyPresent);
    }

    #[test]
    fn test_missing_source_is_copy_error() {
        let dest = tempfile::tempdir().unwrap();
        let err = ensure_copied(Path::new("/nonexistent/x.mp3"), "Media/A/x.mp3", dest.path()).unwrap_err();
        match err {
            ExportError::Copy { from, to, .. } => {
                assert_eq!(from, Path::new("/nonexistent/x.mp3"));
                assert_eq!(to, dest.path().join("Media/A/x.mp3"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
