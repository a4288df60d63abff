/// User-scoped playlist routes: profiles, pickers and bulk visibility
use crate::{error::Result, middleware::AuthenticatedUser, state::AppState};
use axum::{
    extract::{Path, State},
    Json,
};
use chorus_core::{Playlist, PlaylistToAdd, TrackId, UserId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct PublicityRequest {
    pub is_public: bool,
}

#[derive(Debug, Serialize)]
pub struct PublicityResponse {
    pub updated: u64,
}

/// GET /api/users/:user_id/playlists
/// Profile view; other users only see the public ones
pub async fn profile_playlists(
    Path(user_id): Path<UserId>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<Vec<Playlist>>> {
    let ctx = app_state.request_context();
    let playlists = app_state
        .playlists
        .get_profile_playlists(&ctx, user_id, auth.user_id())
        .await?;
    Ok(Json(playlists))
}

/// GET /api/tracks/:track_id/playlists-to-add
/// The caller's playlists, flagged when the track is already in them
pub async fn playlists_to_add(
    Path(track_id): Path<TrackId>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<Vec<PlaylistToAdd>>> {
    let ctx = app_state.request_context();
    let playlists = app_state
        .playlists
        .get_playlists_to_add(&ctx, track_id, auth.user_id())
        .await?;
    Ok(Json(playlists))
}

/// PUT /api/me/playlists/publicity
pub async fn update_publicity(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Json(req): Json<PublicityRequest>,
) -> Result<Json<PublicityResponse>> {
    let ctx = app_state.request_context();
    let updated = app_state
        .playlists
        .update_playlists_publicity(&ctx, auth.user_id(), req.is_public)
        .await?;
    Ok(Json(PublicityResponse { updated }))
}
