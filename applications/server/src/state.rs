/// Shared application state
use crate::services::{AuthService, PlaylistService};
use chorus_core::RequestContext;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub playlists: Arc<PlaylistService>,
    pub auth_service: Arc<AuthService>,
    shutdown: CancellationToken,
}

impl AppState {
    pub fn new(
        playlists: Arc<PlaylistService>,
        auth_service: Arc<AuthService>,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            playlists,
            auth_service,
            shutdown,
        }
    }

    /// Context for one inbound request; cancelled when the server shuts down
    pub fn request_context(&self) -> RequestContext {
        RequestContext::with_token(self.shutdown.child_token())
    }
}
