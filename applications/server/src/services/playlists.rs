/// Playlist service - authorization and orchestration over the repository
///
/// The repository scopes its own mutations, but it cannot tell "missing" from
/// "forbidden" without a second read. This layer reads the playlist first and
/// fails fast, so callers always get a distinguishable error kind.
use bytes::Bytes;
use chorus_core::{
    ChorusError, CreatePlaylist, Playlist, PlaylistId, PlaylistLike, PlaylistRepository,
    PlaylistToAdd, PlaylistTrackRequest, PlaylistWithLiked, RemovePlaylist, RequestContext,
    Result, ThumbnailStore, TrackId, UpdatePlaylist, UserId,
};
use std::sync::Arc;

/// Longest accepted playlist title, in characters
pub const MAX_TITLE_CHARS: usize = 100;

#[derive(Clone)]
pub struct PlaylistService {
    repo: Arc<dyn PlaylistRepository>,
    thumbnails: Arc<dyn ThumbnailStore>,
}

fn validate_title(title: &str) -> Result<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(ChorusError::invalid_input("title must not be empty"));
    }
    if title.chars().count() > MAX_TITLE_CHARS {
        return Err(ChorusError::invalid_input(format!(
            "title must be at most {MAX_TITLE_CHARS} characters"
        )));
    }
    Ok(title.to_string())
}

impl PlaylistService {
    pub fn new(repo: Arc<dyn PlaylistRepository>, thumbnails: Arc<dyn ThumbnailStore>) -> Self {
        Self { repo, thumbnails }
    }

    /// Load a playlist and require `user_id` to own it
    async fn authorize_owner(
        &self,
        ctx: &RequestContext,
        id: PlaylistId,
        user_id: UserId,
    ) -> Result<Playlist> {
        let playlist = self.repo.get_playlist_by_id(ctx, id).await?;
        if !playlist.is_owned_by(user_id) {
            tracing::debug!(
                request_id = %ctx.request_id(),
                playlist_id = id,
                user_id,
                "Mutation denied: not the owner"
            );
            return Err(ChorusError::PermissionDenied);
        }
        Ok(playlist)
    }

    pub async fn create_playlist(
        &self,
        ctx: &RequestContext,
        request: CreatePlaylist,
    ) -> Result<Playlist> {
        let title = validate_title(&request.title)?;
        let playlist = self
            .repo
            .create_playlist(ctx, CreatePlaylist { title, ..request })
            .await?;

        tracing::info!(
            request_id = %ctx.request_id(),
            playlist_id = playlist.id,
            owner_id = playlist.owner_id,
            "Playlist created"
        );
        Ok(playlist)
    }

    /// Store cover image bytes and return the locator to put on a playlist
    pub async fn upload_playlist_thumbnail(
        &self,
        ctx: &RequestContext,
        user_id: UserId,
        data: Bytes,
    ) -> Result<String> {
        self.thumbnails
            .upload_thumbnail(ctx, data, &format!("user-{user_id}"))
            .await
    }

    /// Playlist plus the requester's like flag. Private playlists are only
    /// visible to their owner.
    pub async fn get_playlist_by_id(
        &self,
        ctx: &RequestContext,
        id: PlaylistId,
        user_id: UserId,
    ) -> Result<PlaylistWithLiked> {
        let found = self
            .repo
            .get_playlist_with_is_liked_by_id(ctx, id, user_id)
            .await?;

        if !found.playlist.is_visible_to(user_id) {
            tracing::debug!(
                request_id = %ctx.request_id(),
                playlist_id = id,
                user_id,
                "Read denied: private playlist"
            );
            return Err(ChorusError::PermissionDenied);
        }
        Ok(found)
    }

    pub async fn get_playlist_track_ids(
        &self,
        ctx: &RequestContext,
        id: PlaylistId,
        user_id: UserId,
    ) -> Result<Vec<TrackId>> {
        let playlist = self.repo.get_playlist_by_id(ctx, id).await?;
        if !playlist.is_visible_to(user_id) {
            return Err(ChorusError::PermissionDenied);
        }
        self.repo.get_playlist_track_ids(ctx, id).await
    }

    pub async fn add_track_to_playlist(
        &self,
        ctx: &RequestContext,
        request: PlaylistTrackRequest,
    ) -> Result<()> {
        self.repo.add_track_to_playlist(ctx, &request).await
    }

    pub async fn remove_track_from_playlist(
        &self,
        ctx: &RequestContext,
        request: PlaylistTrackRequest,
    ) -> Result<()> {
        self.repo.remove_track_from_playlist(ctx, &request).await
    }

    pub async fn update_playlist(
        &self,
        ctx: &RequestContext,
        request: UpdatePlaylist,
    ) -> Result<Playlist> {
        let title = validate_title(&request.title)?;
        self.authorize_owner(ctx, request.id, request.user_id).await?;

        self.repo
            .update_playlist(ctx, UpdatePlaylist { title, ..request })
            .await
    }

    pub async fn remove_playlist(&self, ctx: &RequestContext, request: RemovePlaylist) -> Result<()> {
        self.authorize_owner(ctx, request.id, request.user_id).await?;
        self.repo.remove_playlist(ctx, &request).await?;

        tracing::info!(
            request_id = %ctx.request_id(),
            playlist_id = request.id,
            "Playlist removed"
        );
        Ok(())
    }

    /// Like or unlike. Both directions are idempotent.
    pub async fn like_playlist(
        &self,
        ctx: &RequestContext,
        request: PlaylistLike,
        is_like: bool,
    ) -> Result<()> {
        if is_like {
            self.repo.like_playlist(ctx, &request).await
        } else {
            self.repo.unlike_playlist(ctx, &request).await
        }
    }

    pub async fn get_playlists_to_add(
        &self,
        ctx: &RequestContext,
        track_id: TrackId,
        user_id: UserId,
    ) -> Result<Vec<PlaylistToAdd>> {
        self.repo.get_playlists_to_add(ctx, track_id, user_id).await
    }

    /// Playlists owned by `owner_id`, newest first, as seen by `viewer_id`
    pub async fn get_profile_playlists(
        &self,
        ctx: &RequestContext,
        owner_id: UserId,
        viewer_id: UserId,
    ) -> Result<Vec<Playlist>> {
        let playlists = self.repo.get_profile_playlists(ctx, owner_id).await?;
        Ok(playlists
            .into_iter()
            .filter(|p| p.is_visible_to(viewer_id))
            .collect())
    }

    pub async fn search_playlists(
        &self,
        ctx: &RequestContext,
        query: &str,
        user_id: UserId,
    ) -> Result<Vec<Playlist>> {
        self.repo.search_playlists(ctx, query, user_id).await
    }

    pub async fn update_playlists_publicity(
        &self,
        ctx: &RequestContext,
        user_id: UserId,
        is_public: bool,
    ) -> Result<u64> {
        let updated = self
            .repo
            .update_playlists_publicity_by_user_id(ctx, user_id, is_public)
            .await?;

        tracing::info!(
            request_id = %ctx.request_id(),
            user_id,
            is_public,
            updated,
            "Playlist publicity changed"
        );
        Ok(updated)
    }

    pub async fn get_combined_playlists(
        &self,
        ctx: &RequestContext,
        user_id: UserId,
    ) -> Result<Vec<Playlist>> {
        self.repo.get_combined_playlists_by_user_id(ctx, user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_title() {
        assert_eq!(validate_title("  Gym  ").unwrap(), "Gym");
        assert!(matches!(validate_title(""), Err(ChorusError::InvalidInput(_))));
        assert!(matches!(validate_title(" \t "), Err(ChorusError::InvalidInput(_))));
        assert!(validate_title(&"a".repeat(MAX_TITLE_CHARS)).is_ok());
        assert!(validate_title(&"a".repeat(MAX_TITLE_CHARS + 1)).is_err());
    }
}
