/// API route modules
pub mod health;
pub mod playlists;
pub mod users;

use crate::{config::StorageSettings, middleware, state::AppState};
use axum::{
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    services::ServeDir,
    trace::{DefaultMakeSpan, TraceLayer},
};

/// Build the HTTP router
///
/// Everything under `/api` except `/api/health` requires a bearer token.
/// Stored thumbnails are served read-only under `/thumbnails`.
pub fn create_router(app_state: AppState, storage: &StorageSettings) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new().route("/health", get(health::health));

    // One byte over the limit reaches the store, which reports TooLarge
    let thumbnail_body_limit = storage.max_thumbnail_bytes.saturating_add(1);

    // Protected routes (auth required)
    let protected_routes = Router::new()
        // Playlists
        .route("/playlists", post(playlists::create_playlist))
        .route(
            "/playlists/thumbnail",
            post(playlists::upload_thumbnail).layer(DefaultBodyLimit::max(thumbnail_body_limit)),
        )
        .route("/playlists/feed", get(playlists::combined_playlists))
        .route("/playlists/search", get(playlists::search_playlists))
        .route(
            "/playlists/:id",
            get(playlists::get_playlist)
                .put(playlists::update_playlist)
                .delete(playlists::remove_playlist),
        )
        .route(
            "/playlists/:id/tracks",
            get(playlists::get_playlist_tracks).post(playlists::add_track_to_playlist),
        )
        .route(
            "/playlists/:id/tracks/:track_id",
            axum::routing::delete(playlists::remove_track_from_playlist),
        )
        .route("/playlists/:id/like", put(playlists::like_playlist))
        // Tracks
        .route(
            "/tracks/:track_id/playlists-to-add",
            get(users::playlists_to_add),
        )
        // Users
        .route("/users/:user_id/playlists", get(users::profile_playlists))
        .route("/me/playlists/publicity", put(users::update_publicity))
        .layer(axum_middleware::from_fn_with_state(
            Arc::clone(&app_state.auth_service),
            middleware::auth_middleware,
        ));

    // Combine routes
    Router::new()
        .nest("/api", public_routes.merge(protected_routes))
        .nest_service("/thumbnails", ServeDir::new(&storage.thumbnail_path))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(true)),
        )
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}
