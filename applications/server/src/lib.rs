//! Chorus Server Library
//!
//! HTTP front for the playlist service: JWT authentication, the playlist
//! usecase layer and a local thumbnail store.
//!
//! This library exposes the core components for testing purposes.

pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod services;
pub mod state;

// Re-export commonly used types for convenience
pub use api::create_router;
pub use config::ServerConfig;
pub use error::{Result, ServerError};
pub use services::{auth::AuthService, playlists::PlaylistService, thumbnails::FileThumbnailStore};
pub use state::AppState;
