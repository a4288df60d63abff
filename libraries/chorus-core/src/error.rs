/// Core error types for Chorus
use crate::types::{PlaylistId, TrackId};
use serde::Serialize;
use thiserror::Error;

/// Result type alias using `ChorusError`
pub type Result<T> = std::result::Result<T, ChorusError>;

/// Core error type for the playlist layer
#[derive(Error, Debug)]
pub enum ChorusError {
    /// Entity not found
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Caller is not allowed to see or mutate the entity
    #[error("Permission denied")]
    PermissionDenied,

    /// Unique constraint on a user-supplied value (e.g. playlist title per owner)
    #[error("Duplicate entry: {0}")]
    Duplicate(String),

    /// Track is already a member of the playlist
    #[error("Track {track_id} is already in playlist {playlist_id}")]
    TrackDuplicate {
        playlist_id: PlaylistId,
        track_id: TrackId,
    },

    /// Track is not a member of the playlist
    #[error("Track {track_id} is not in playlist {playlist_id}")]
    TrackNotFound {
        playlist_id: PlaylistId,
        track_id: TrackId,
    },

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Thumbnail bytes are not an accepted image format
    #[error("Unsupported thumbnail format")]
    UnsupportedFormat,

    /// Thumbnail exceeds the configured size limit
    #[error("Thumbnail too large: {size} bytes (max {max})")]
    TooLarge { size: usize, max: usize },

    /// Unclassified store failure. The message is for logs only.
    #[error("Internal error: {0}")]
    Internal(String),

    /// The caller cancelled the request before it completed
    #[error("Request cancelled")]
    Cancelled,
}

/// Stable, caller-facing error classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    PermissionDenied,
    Duplicate,
    InvalidInput,
    Internal,
    Cancelled,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "not_found",
            ErrorKind::PermissionDenied => "permission_denied",
            ErrorKind::Duplicate => "duplicate",
            ErrorKind::InvalidInput => "invalid_input",
            ErrorKind::Internal => "internal",
            ErrorKind::Cancelled => "cancelled",
        }
    }
}

impl ChorusError {
    /// Create a not found error
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Shorthand for a missing playlist
    pub fn playlist_not_found(id: PlaylistId) -> Self {
        Self::not_found("Playlist", id)
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Classify this error into its caller-facing kind
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } | Self::TrackNotFound { .. } => ErrorKind::NotFound,
            Self::PermissionDenied => ErrorKind::PermissionDenied,
            Self::Duplicate(_) | Self::TrackDuplicate { .. } => ErrorKind::Duplicate,
            Self::InvalidInput(_) | Self::UnsupportedFormat | Self::TooLarge { .. } => {
                ErrorKind::InvalidInput
            }
            Self::Internal(_) => ErrorKind::Internal,
            Self::Cancelled => ErrorKind::Cancelled,
        }
    }
}

#[cfg(feature = "sqlx-support")]
impl From<sqlx::Error> for ChorusError {
    fn from(err: sqlx::Error) -> Self {
        tracing::error!(error = ?err, "Unclassified database error");
        Self::Internal(err.to_string())
    }
}
