//! Types d'erreurs pour pmolibrary

use std::path::PathBuf;

/// Erreurs de gestion de la bibliothèque
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Library file not found: {}", .0.display())]
    MissingSource(PathBuf),

    #[error("Malformed library file {}: {}", .path.display(), .reason)]
    MalformedSource { path: PathBuf, reason: String },

    #[error("Cannot write library file {}: {}", .path.display(), .source)]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Playlist not found: {0}")]
    PlaylistNotFound(String),

    #[error("Playlist already exists: {0}")]
    PlaylistAlreadyExists(String),

    #[error("Track not found: {0}")]
    TrackNotFound(String),

    #[error("Track already in collection: {0}")]
    DuplicateTrack(String),

    #[error("Invalid track: {0}")]
    InvalidTrack(String),

    #[error("Playlist {playlist} references unknown track {location}")]
    UnresolvedEntry { playlist: String, location: String },

    #[error("Playlist {playlist} has no entry at position {index}")]
    EntryOutOfRange { playlist: String, index: usize },

    #[error("Invalid playback slot: {0} (expected 1 or 2)")]
    InvalidSlot(u8),

    #[error("Serialization error: {0}")]
    Serialize(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Type Result spécialisé pour pmolibrary
pub type Result<T> = std::result::Result<T, Error>;
