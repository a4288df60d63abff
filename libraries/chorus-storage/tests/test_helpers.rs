//! Test helpers and fixtures for storage integration tests
//!
//! These helpers create test databases using REAL SQLite files (NOT in-memory)
//! to match production behavior and properly test migrations, constraints,
//! triggers and the full-text index.

#![allow(dead_code)]

use chorus_core::{PlaylistId, TrackId, UserId};
use sqlx::SqlitePool;
use tempfile::TempDir;

/// Test database wrapper that cleans up on drop
pub struct TestDb {
    pub pool: SqlitePool,
    _temp_dir: TempDir,
}

impl TestDb {
    /// Create a new test database with migrations applied
    pub async fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");
        let db_url = format!("sqlite://{}", db_path.display());

        let pool = chorus_storage::create_pool(&db_url)
            .await
            .expect("Failed to create pool");

        chorus_storage::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        Self {
            pool,
            _temp_dir: temp_dir,
        }
    }

    /// Get the pool reference
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

/// Test fixture: Insert a playlist with an explicit creation time (Unix ms)
pub async fn create_test_playlist(
    pool: &SqlitePool,
    title: &str,
    owner_id: UserId,
    is_public: bool,
    created_at: i64,
) -> PlaylistId {
    let result = sqlx::query(
        "INSERT INTO playlists (title, owner_id, is_public, created_at, title_grams) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(title)
    .bind(owner_id)
    .bind(is_public)
    .bind(created_at)
    .bind(chorus_core::search::trigram_document(title))
    .execute(pool)
    .await
    .expect("Failed to create test playlist");

    result.last_insert_rowid()
}

/// Test fixture: Insert a membership row with an explicit time
pub async fn insert_membership(
    pool: &SqlitePool,
    playlist_id: PlaylistId,
    track_id: TrackId,
    created_at: i64,
) {
    sqlx::query("INSERT INTO playlist_tracks (playlist_id, track_id, created_at) VALUES (?, ?, ?)")
        .bind(playlist_id)
        .bind(track_id)
        .bind(created_at)
        .execute(pool)
        .await
        .expect("Failed to insert membership");
}

/// Test fixture: Insert a favorite row with an explicit time
pub async fn insert_favorite(
    pool: &SqlitePool,
    user_id: UserId,
    playlist_id: PlaylistId,
    created_at: i64,
) {
    sqlx::query("INSERT INTO playlist_favorites (user_id, playlist_id, created_at) VALUES (?, ?, ?)")
        .bind(user_id)
        .bind(playlist_id)
        .bind(created_at)
        .execute(pool)
        .await
        .expect("Failed to insert favorite");
}

pub async fn count_memberships(pool: &SqlitePool, playlist_id: PlaylistId, track_id: TrackId) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM playlist_tracks WHERE playlist_id = ? AND track_id = ?")
        .bind(playlist_id)
        .bind(track_id)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn count_favorites(pool: &SqlitePool, user_id: UserId, playlist_id: PlaylistId) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM playlist_favorites WHERE user_id = ? AND playlist_id = ?")
        .bind(user_id)
        .bind(playlist_id)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn count_playlists(pool: &SqlitePool, owner_id: UserId, title: &str) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM playlists WHERE owner_id = ? AND title = ?")
        .bind(owner_id)
        .bind(title)
        .fetch_one(pool)
        .await
        .unwrap()
}

/// Playlists whose trigram index entry contains `gram` (exactly 3 characters)
pub async fn trigram_index_hits(pool: &SqlitePool, gram: &str) -> Vec<PlaylistId> {
    sqlx::query_scalar(
        "SELECT rowid FROM playlists_trigrams WHERE playlists_trigrams MATCH ? ORDER BY rowid",
    )
    .bind(format!("\"{gram}\""))
    .fetch_all(pool)
    .await
    .unwrap()
}
