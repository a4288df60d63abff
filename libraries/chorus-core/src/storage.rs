//! Repository trait for the playlist store

use crate::context::RequestContext;
use crate::error::Result;
use crate::types::{
    CreatePlaylist, Playlist, PlaylistId, PlaylistLike, PlaylistToAdd, PlaylistTrackRequest,
    PlaylistWithLiked, RemovePlaylist, TrackId, UpdatePlaylist, UserId,
};
use async_trait::async_trait;

/// Store-facing access patterns for playlists, memberships and favorites
///
/// Implementations never let a raw store error escape: failures are
/// classified into `ChorusError` kinds, defaulting to `Internal`.
#[async_trait]
pub trait PlaylistRepository: Send + Sync {
    /// Insert a playlist. A reused (title, owner) pair yields `Duplicate`.
    async fn create_playlist(
        &self,
        ctx: &RequestContext,
        playlist: CreatePlaylist,
    ) -> Result<Playlist>;

    /// Fetch a playlist, `NotFound` if absent
    async fn get_playlist_by_id(&self, ctx: &RequestContext, id: PlaylistId) -> Result<Playlist>;

    /// Fetch a playlist together with whether `user_id` favorited it
    async fn get_playlist_with_is_liked_by_id(
        &self,
        ctx: &RequestContext,
        id: PlaylistId,
        user_id: UserId,
    ) -> Result<PlaylistWithLiked>;

    /// Owned playlists plus favorited public ones, most recent activity first
    async fn get_combined_playlists_by_user_id(
        &self,
        ctx: &RequestContext,
        user_id: UserId,
    ) -> Result<Vec<Playlist>>;

    async fn track_exists_in_playlist(
        &self,
        ctx: &RequestContext,
        playlist_id: PlaylistId,
        track_id: TrackId,
    ) -> Result<bool>;

    /// Owner-only. `PermissionDenied` for non-owners, `TrackDuplicate` if present.
    async fn add_track_to_playlist(
        &self,
        ctx: &RequestContext,
        request: &PlaylistTrackRequest,
    ) -> Result<()>;

    /// Owner-only. `TrackNotFound` if the track is not a member.
    async fn remove_track_from_playlist(
        &self,
        ctx: &RequestContext,
        request: &PlaylistTrackRequest,
    ) -> Result<()>;

    /// Member track ids in insertion order, ties broken by track id
    async fn get_playlist_track_ids(
        &self,
        ctx: &RequestContext,
        playlist_id: PlaylistId,
    ) -> Result<Vec<TrackId>>;

    /// Owner-scoped update. A statement that matches no row is an error.
    async fn update_playlist(
        &self,
        ctx: &RequestContext,
        request: UpdatePlaylist,
    ) -> Result<Playlist>;

    /// Owner-scoped delete. A statement that matches no row is an error.
    async fn remove_playlist(&self, ctx: &RequestContext, request: &RemovePlaylist)
        -> Result<()>;

    async fn get_playlists_to_add(
        &self,
        ctx: &RequestContext,
        track_id: TrackId,
        user_id: UserId,
    ) -> Result<Vec<PlaylistToAdd>>;

    /// Flip visibility of every playlist owned by `user_id`; returns rows changed
    async fn update_playlists_publicity_by_user_id(
        &self,
        ctx: &RequestContext,
        user_id: UserId,
        is_public: bool,
    ) -> Result<u64>;

    /// True iff the playlist exists and is not owned by `user_id`
    async fn check_exists_playlist_and_not_different_user(
        &self,
        ctx: &RequestContext,
        playlist_id: PlaylistId,
        user_id: UserId,
    ) -> Result<bool>;

    /// Idempotent favorite. Missing, own or private targets yield `NotFound`.
    async fn like_playlist(&self, ctx: &RequestContext, request: &PlaylistLike) -> Result<()>;

    /// Idempotent unfavorite
    async fn unlike_playlist(&self, ctx: &RequestContext, request: &PlaylistLike) -> Result<()>;

    /// Playlists owned by `user_id`, newest first
    async fn get_profile_playlists(
        &self,
        ctx: &RequestContext,
        user_id: UserId,
    ) -> Result<Vec<Playlist>>;

    /// Ranked search over playlists visible to `user_id`
    async fn search_playlists(
        &self,
        ctx: &RequestContext,
        query: &str,
        user_id: UserId,
    ) -> Result<Vec<Playlist>>;
}
