/// Playlists API routes
use crate::{error::Result, middleware::AuthenticatedUser, state::AppState};
use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chorus_core::{
    CreatePlaylist, Playlist, PlaylistId, PlaylistLike, PlaylistTrackRequest, PlaylistWithLiked,
    RemovePlaylist, TrackId, UpdatePlaylist,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct CreatePlaylistRequest {
    pub title: String,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub is_public: bool,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePlaylistRequest {
    pub title: String,
    #[serde(default)]
    pub thumbnail: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AddTrackRequest {
    pub track_id: TrackId,
}

#[derive(Debug, Deserialize)]
pub struct LikeRequest {
    pub is_like: bool,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: String,
}

#[derive(Debug, Serialize)]
pub struct ThumbnailResponse {
    pub thumbnail: String,
}

#[derive(Debug, Serialize)]
pub struct TrackIdsResponse {
    pub playlist_id: PlaylistId,
    pub track_ids: Vec<TrackId>,
}

/// POST /api/playlists
/// Create a new playlist owned by the caller
pub async fn create_playlist(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Json(req): Json<CreatePlaylistRequest>,
) -> Result<(StatusCode, Json<Playlist>)> {
    let ctx = app_state.request_context();
    let playlist = app_state
        .playlists
        .create_playlist(
            &ctx,
            CreatePlaylist {
                title: req.title,
                owner_id: auth.user_id(),
                thumbnail: req.thumbnail,
                is_public: req.is_public,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(playlist)))
}

/// POST /api/playlists/thumbnail
/// Upload raw cover image bytes; returns the locator to use on create/update
pub async fn upload_thumbnail(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    body: Bytes,
) -> Result<(StatusCode, Json<ThumbnailResponse>)> {
    let ctx = app_state.request_context();
    let thumbnail = app_state
        .playlists
        .upload_playlist_thumbnail(&ctx, auth.user_id(), body)
        .await?;

    Ok((StatusCode::CREATED, Json(ThumbnailResponse { thumbnail })))
}

/// GET /api/playlists/feed
/// Owned playlists plus public favorites, most recent activity first
pub async fn combined_playlists(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<Vec<Playlist>>> {
    let ctx = app_state.request_context();
    let playlists = app_state
        .playlists
        .get_combined_playlists(&ctx, auth.user_id())
        .await?;
    Ok(Json(playlists))
}

/// GET /api/playlists/search?q=
pub async fn search_playlists(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Playlist>>> {
    let ctx = app_state.request_context();
    let playlists = app_state
        .playlists
        .search_playlists(&ctx, &params.q, auth.user_id())
        .await?;
    Ok(Json(playlists))
}

/// GET /api/playlists/:id
pub async fn get_playlist(
    Path(id): Path<PlaylistId>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<PlaylistWithLiked>> {
    let ctx = app_state.request_context();
    let playlist = app_state
        .playlists
        .get_playlist_by_id(&ctx, id, auth.user_id())
        .await?;
    Ok(Json(playlist))
}

/// PUT /api/playlists/:id
/// Rename, optionally replacing the thumbnail (owner only)
pub async fn update_playlist(
    Path(id): Path<PlaylistId>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Json(req): Json<UpdatePlaylistRequest>,
) -> Result<Json<Playlist>> {
    let ctx = app_state.request_context();
    let playlist = app_state
        .playlists
        .update_playlist(
            &ctx,
            UpdatePlaylist {
                id,
                user_id: auth.user_id(),
                title: req.title,
                thumbnail: req.thumbnail,
            },
        )
        .await?;
    Ok(Json(playlist))
}

/// DELETE /api/playlists/:id
pub async fn remove_playlist(
    Path(id): Path<PlaylistId>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<StatusCode> {
    let ctx = app_state.request_context();
    app_state
        .playlists
        .remove_playlist(
            &ctx,
            RemovePlaylist {
                id,
                user_id: auth.user_id(),
            },
        )
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/playlists/:id/tracks
/// Track ids in insertion order
pub async fn get_playlist_tracks(
    Path(id): Path<PlaylistId>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<TrackIdsResponse>> {
    let ctx = app_state.request_context();
    let track_ids = app_state
        .playlists
        .get_playlist_track_ids(&ctx, id, auth.user_id())
        .await?;
    Ok(Json(TrackIdsResponse {
        playlist_id: id,
        track_ids,
    }))
}

/// POST /api/playlists/:id/tracks
pub async fn add_track_to_playlist(
    Path(id): Path<PlaylistId>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Json(req): Json<AddTrackRequest>,
) -> Result<StatusCode> {
    let ctx = app_state.request_context();
    app_state
        .playlists
        .add_track_to_playlist(
            &ctx,
            PlaylistTrackRequest {
                playlist_id: id,
                track_id: req.track_id,
                user_id: auth.user_id(),
            },
        )
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/playlists/:id/tracks/:track_id
pub async fn remove_track_from_playlist(
    Path((id, track_id)): Path<(PlaylistId, TrackId)>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<StatusCode> {
    let ctx = app_state.request_context();
    app_state
        .playlists
        .remove_track_from_playlist(
            &ctx,
            PlaylistTrackRequest {
                playlist_id: id,
                track_id,
                user_id: auth.user_id(),
            },
        )
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/playlists/:id/like
/// `{"is_like": true}` favorites, `false` unfavorites
pub async fn like_playlist(
    Path(id): Path<PlaylistId>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Json(req): Json<LikeRequest>,
) -> Result<StatusCode> {
    let ctx = app_state.request_context();
    app_state
        .playlists
        .like_playlist(
            &ctx,
            PlaylistLike {
                playlist_id: id,
                user_id: auth.user_id(),
            },
            req.is_like,
        )
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
