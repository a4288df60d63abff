/// Server error types
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chorus_core::{ChorusError, ErrorKind};
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ServerError>;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error(transparent)]
    Domain(#[from] ChorusError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
}

impl ServerError {
    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::Auth(_) | ServerError::Jwt(_) => StatusCode::UNAUTHORIZED,
            ServerError::Domain(err) => match err {
                ChorusError::UnsupportedFormat => StatusCode::UNSUPPORTED_MEDIA_TYPE,
                ChorusError::TooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
                _ => match err.kind() {
                    ErrorKind::NotFound => StatusCode::NOT_FOUND,
                    ErrorKind::PermissionDenied => StatusCode::FORBIDDEN,
                    ErrorKind::Duplicate => StatusCode::CONFLICT,
                    ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
                    ErrorKind::Cancelled => StatusCode::REQUEST_TIMEOUT,
                    ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
                },
            },
            ServerError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable kind for the response body
    pub fn kind(&self) -> &'static str {
        match self {
            ServerError::Auth(_) | ServerError::Jwt(_) => "unauthorized",
            ServerError::Domain(err) => err.kind().as_str(),
            ServerError::Config(_) => ErrorKind::Internal.as_str(),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        let kind = self.kind();

        let error_message = match self {
            ServerError::Domain(ChorusError::Internal(ref msg)) => {
                tracing::error!("Internal error: {}", msg);
                "Internal server error".to_string()
            }
            ServerError::Domain(ref err) => err.to_string(),
            ServerError::Auth(ref msg) => {
                tracing::warn!("Authentication failed: {}", msg);
                "Invalid credentials".to_string()
            }
            ServerError::Jwt(ref e) => {
                tracing::warn!("JWT error: {:?}", e);
                "Invalid token".to_string()
            }
            ServerError::Config(ref msg) => {
                tracing::error!("Config error: {}", msg);
                "Configuration error".to_string()
            }
        };

        let body = Json(json!({
            "error": error_message,
            "kind": kind,
        }));

        (status, body).into_response()
    }
}
