//! Error types for reading sources and exporting playlists

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading a source library or exporting a playlist
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Parse error in {origin}: {message}")]
    Parse { origin: String, message: String },

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("Invalid path {location:?}: {reason}")]
    Path { location: String, reason: String },

    #[error("Failed to copy {} to {}: {err}", .from.display(), .to.display())]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        err: io::Error,
    },

    #[error("Failed to read {}: {err}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        err: io::Error,
    },

    #[error("Failed to write playlist {}: {err}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        err: io::Error,
    },
}

impl ExportError {
    pub fn parse(origin: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            origin: origin.into(),
            message: message.into(),
        }
    }

    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }

    pub fn path(location: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Path {
            location: location.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ExportError>;
