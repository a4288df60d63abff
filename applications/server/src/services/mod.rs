/// Server services
pub mod auth;
pub mod playlists;
pub mod thumbnails;

pub use auth::AuthService;
pub use playlists::PlaylistService;
pub use thumbnails::FileThumbnailStore;
