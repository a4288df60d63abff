//! ID types for Chorus entities
//!
//! All identifiers are opaque integers assigned by the store (playlists) or by
//! the owning service (users, tracks).

/// User identifier, issued by the auth service
pub type UserId = i64;

/// Track identifier, issued by the track service
pub type TrackId = i64;

/// Playlist identifier, assigned on insert
pub type PlaylistId = i64;
