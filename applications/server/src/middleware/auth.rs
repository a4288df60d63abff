/// Authentication middleware
use crate::{error::ServerError, services::AuthService};
use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Response},
};
use chorus_core::UserId;
use std::sync::Arc;

/// Extension type to store authenticated user ID in request
/// Can be used as an extractor in handlers
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser(pub UserId);

impl AuthenticatedUser {
    pub fn user_id(&self) -> UserId {
        self.0
    }
}

/// Middleware that extracts and validates JWT from Authorization header
pub async fn auth_middleware(
    State(auth_service): State<Arc<AuthService>>,
    mut request: Request,
    next: Next,
) -> Response {
    // Extract Authorization header
    let Some(auth_header) = request
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
    else {
        return ServerError::Auth("Missing Authorization header".to_string()).into_response();
    };

    // Check Bearer prefix
    let Some(token) = auth_header.strip_prefix("Bearer ") else {
        return ServerError::Auth("Expected a Bearer token".to_string()).into_response();
    };

    // Verify token
    let user_id = match auth_service.verify_access_token(token) {
        Ok(user_id) => user_id,
        Err(e) => {
            tracing::warn!("Token verification failed: {}", e);
            return e.into_response();
        }
    };

    // Insert user ID into request extensions
    request.extensions_mut().insert(AuthenticatedUser(user_id));

    next.run(request).await
}

/// Implement FromRequestParts so AuthenticatedUser can be used as an extractor
#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .copied()
            .ok_or_else(|| ServerError::Auth("Not authenticated".to_string()))
    }
}
