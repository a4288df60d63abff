use crate::playlists;
use async_trait::async_trait;
use chorus_core::{
    error::Result, CreatePlaylist, Playlist, PlaylistId, PlaylistLike, PlaylistRepository,
    PlaylistToAdd, PlaylistTrackRequest, PlaylistWithLiked, RemovePlaylist, RequestContext,
    TrackId, UpdatePlaylist, UserId,
};
use sqlx::SqlitePool;

/// Playlist repository backed by `SQLite`
#[derive(Debug, Clone)]
pub struct SqlitePlaylistRepository {
    pool: SqlitePool,
}

impl SqlitePlaylistRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl PlaylistRepository for SqlitePlaylistRepository {
    async fn create_playlist(
        &self,
        ctx: &RequestContext,
        playlist: CreatePlaylist,
    ) -> Result<Playlist> {
        playlists::create(&self.pool, ctx, playlist).await
    }

    async fn get_playlist_by_id(&self, ctx: &RequestContext, id: PlaylistId) -> Result<Playlist> {
        playlists::get_by_id(&self.pool, ctx, id).await
    }

    async fn get_playlist_with_is_liked_by_id(
        &self,
        ctx: &RequestContext,
        id: PlaylistId,
        user_id: UserId,
    ) -> Result<PlaylistWithLiked> {
        playlists::get_with_is_liked(&self.pool, ctx, id, user_id).await
    }

    async fn get_combined_playlists_by_user_id(
        &self,
        ctx: &RequestContext,
        user_id: UserId,
    ) -> Result<Vec<Playlist>> {
        playlists::get_combined(&self.pool, ctx, user_id).await
    }

    async fn track_exists_in_playlist(
        &self,
        ctx: &RequestContext,
        playlist_id: PlaylistId,
        track_id: TrackId,
    ) -> Result<bool> {
        playlists::track_exists(&self.pool, ctx, playlist_id, track_id).await
    }

    async fn add_track_to_playlist(
        &self,
        ctx: &RequestContext,
        request: &PlaylistTrackRequest,
    ) -> Result<()> {
        playlists::add_track(&self.pool, ctx, request).await
    }

    async fn remove_track_from_playlist(
        &self,
        ctx: &RequestContext,
        request: &PlaylistTrackRequest,
    ) -> Result<()> {
        playlists::remove_track(&self.pool, ctx, request).await
    }

    async fn get_playlist_track_ids(
        &self,
        ctx: &RequestContext,
        playlist_id: PlaylistId,
    ) -> Result<Vec<TrackId>> {
        playlists::get_track_ids(&self.pool, ctx, playlist_id).await
    }

    async fn update_playlist(
        &self,
        ctx: &RequestContext,
        request: UpdatePlaylist,
    ) -> Result<Playlist> {
        playlists::update(&self.pool, ctx, request).await
    }

    async fn remove_playlist(
        &self,
        ctx: &RequestContext,
        request: &RemovePlaylist,
    ) -> Result<()> {
        playlists::delete(&self.pool, ctx, request).await
    }

    async fn get_playlists_to_add(
        &self,
        ctx: &RequestContext,
        track_id: TrackId,
        user_id: UserId,
    ) -> Result<Vec<PlaylistToAdd>> {
        playlists::get_playlists_to_add(&self.pool, ctx, track_id, user_id).await
    }

    async fn update_playlists_publicity_by_user_id(
        &self,
        ctx: &RequestContext,
        user_id: UserId,
        is_public: bool,
    ) -> Result<u64> {
        playlists::update_publicity_by_user(&self.pool, ctx, user_id, is_public).await
    }

    async fn check_exists_playlist_and_not_different_user(
        &self,
        ctx: &RequestContext,
        playlist_id: PlaylistId,
        user_id: UserId,
    ) -> Result<bool> {
        playlists::exists_and_not_owned_by(&self.pool, ctx, playlist_id, user_id).await
    }

    async fn like_playlist(&self, ctx: &RequestContext, request: &PlaylistLike) -> Result<()> {
        playlists::like(&self.pool, ctx, request).await
    }

    async fn unlike_playlist(&self, ctx: &RequestContext, request: &PlaylistLike) -> Result<()> {
        playlists::unlike(&self.pool, ctx, request).await
    }

    async fn get_profile_playlists(
        &self,
        ctx: &RequestContext,
        user_id: UserId,
    ) -> Result<Vec<Playlist>> {
        playlists::get_profile_playlists(&self.pool, ctx, user_id).await
    }

    async fn search_playlists(
        &self,
        ctx: &RequestContext,
        query: &str,
        user_id: UserId,
    ) -> Result<Vec<Playlist>> {
        playlists::search(&self.pool, ctx, query, user_id).await
    }
}
