/// Playlist domain types
use super::ids::{PlaylistId, TrackId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An owned, named collection of track references
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    /// Unique playlist identifier
    pub id: PlaylistId,

    /// Title, unique per owner
    pub title: String,

    /// Owner user ID; the only user allowed to mutate the playlist
    pub owner_id: UserId,

    /// Locator returned by the thumbnail store
    pub thumbnail: Option<String>,

    /// Visible to users other than the owner
    pub is_public: bool,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Playlist {
    /// Whether `user_id` may read this playlist
    pub fn is_visible_to(&self, user_id: UserId) -> bool {
        self.owner_id == user_id || self.is_public
    }

    /// Whether `user_id` may mutate this playlist
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.owner_id == user_id
    }
}

/// Playlist annotated with whether the requesting user favorited it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistWithLiked {
    #[serde(flatten)]
    pub playlist: Playlist,
    pub is_liked: bool,
}

/// Candidate for an "add to playlist" picker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistToAdd {
    #[serde(flatten)]
    pub playlist: Playlist,
    pub is_included_already: bool,
}

/// Data for creating a new playlist
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylist {
    pub title: String,
    pub owner_id: UserId,
    pub thumbnail: Option<String>,
    pub is_public: bool,
}

/// Title/thumbnail change requested by `user_id`
///
/// A `None` thumbnail leaves the stored locator untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePlaylist {
    pub id: PlaylistId,
    pub user_id: UserId,
    pub title: String,
    pub thumbnail: Option<String>,
}

/// Deletion requested by `user_id`
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RemovePlaylist {
    pub id: PlaylistId,
    pub user_id: UserId,
}

/// Membership change requested by `user_id`
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PlaylistTrackRequest {
    pub playlist_id: PlaylistId,
    pub track_id: TrackId,
    pub user_id: UserId,
}

/// Favorite relation between a user and a playlist
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PlaylistLike {
    pub playlist_id: PlaylistId,
    pub user_id: UserId,
}
