//! Common test utilities and fixtures
#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use bytes::Bytes;
use chorus_core::{RequestContext, ThumbnailStore, UserId};
use chorus_server::{
    config::StorageSettings,
    create_router,
    services::{AuthService, FileThumbnailStore, PlaylistService},
    state::AppState,
};
use chorus_storage::SqlitePlaylistRepository;
use mockall::mock;
use std::sync::Arc;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use tower::util::ServiceExt;

mock! {
    pub Thumbnails {}

    #[async_trait]
    impl ThumbnailStore for Thumbnails {
        async fn upload_thumbnail(
            &self,
            ctx: &RequestContext,
            data: Bytes,
            key_hint: &str,
        ) -> chorus_core::Result<String>;
    }
}

/// Create a repository over a fresh SQLite file with migrations applied
pub async fn create_test_repository() -> (Arc<SqlitePlaylistRepository>, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_url = format!("sqlite://{}", temp_dir.path().join("test.db").display());

    let pool = chorus_storage::create_pool(&db_url)
        .await
        .expect("Failed to create pool");
    chorus_storage::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    (Arc::new(SqlitePlaylistRepository::new(pool)), temp_dir)
}

/// Playlist service over a real repository and a mocked thumbnail store
pub async fn create_test_service(
    thumbnails: MockThumbnails,
) -> (PlaylistService, Arc<SqlitePlaylistRepository>, TempDir) {
    let (repo, temp_dir) = create_test_repository().await;
    let service = PlaylistService::new(repo.clone(), Arc::new(thumbnails));
    (service, repo, temp_dir)
}

/// Full HTTP stack over temporary storage
pub struct TestApp {
    pub router: Router,
    pub auth_service: Arc<AuthService>,
    pub thumbnail_dir: std::path::PathBuf,
    _temp_dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        let (repo, temp_dir) = create_test_repository().await;

        let storage = StorageSettings {
            database_url: String::new(),
            thumbnail_path: temp_dir.path().join("thumbnails"),
            max_thumbnail_bytes: fixtures::MAX_THUMBNAIL_BYTES,
        };

        let thumbnails =
            FileThumbnailStore::new(storage.thumbnail_path.clone(), storage.max_thumbnail_bytes);
        thumbnails.initialize().await.unwrap();

        let auth_service = Arc::new(AuthService::new(fixtures::TEST_SECRET.to_string(), 1));
        let playlists = Arc::new(PlaylistService::new(repo, Arc::new(thumbnails)));
        let app_state = AppState::new(
            playlists,
            Arc::clone(&auth_service),
            CancellationToken::new(),
        );

        Self {
            router: create_router(app_state, &storage),
            auth_service,
            thumbnail_dir: storage.thumbnail_path,
            _temp_dir: temp_dir,
        }
    }

    pub fn token(&self, user_id: UserId) -> String {
        self.auth_service.create_access_token(user_id).unwrap()
    }

    /// Send a request as `user_id` (or anonymously) and decode the JSON body
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        user_id: Option<UserId>,
        body: Option<serde_json::Value>,
    ) -> (StatusCode, serde_json::Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(user_id) = user_id {
            builder = builder.header(
                header::AUTHORIZATION,
                format!("Bearer {}", self.token(user_id)),
            );
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&json).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.dispatch(request).await
    }

    /// Upload raw bytes as a thumbnail
    pub async fn upload(&self, user_id: UserId, data: Vec<u8>) -> (StatusCode, serde_json::Value) {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/playlists/thumbnail")
            .header(
                header::AUTHORIZATION,
                format!("Bearer {}", self.token(user_id)),
            )
            .header(header::CONTENT_TYPE, "application/octet-stream")
            .body(Body::from(data))
            .unwrap();

        self.dispatch(request).await
    }

    pub async fn dispatch(&self, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);

        (status, body)
    }
}

/// Test fixtures
pub mod fixtures {
    pub const TEST_SECRET: &str = "test-secret-key";
    pub const MAX_THUMBNAIL_BYTES: usize = 64;

    pub const OWNER: i64 = 7;
    pub const OTHER_USER: i64 = 8;
    pub const TRACK: i64 = 55;

    /// Smallest byte string recognised as a PNG
    pub fn png() -> Vec<u8> {
        b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR".to_vec()
    }
}
