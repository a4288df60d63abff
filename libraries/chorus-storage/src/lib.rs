//! Chorus Storage
//!
//! `SQLite` store gateway for the Chorus playlist service.
//!
//! # Architecture
//!
//! - **Vertical Slicing**: the `playlists` slice owns its queries and row mapping
//! - **No Transactions**: each operation is a sequence of single statements;
//!   preconditions are repeated inside mutating statements
//! - **Classified Errors**: raw `sqlx` errors never leave the crate
//!
//! # Example
//!
//! ```rust,no_run
//! use chorus_core::{PlaylistRepository, RequestContext};
//! use chorus_storage::{create_pool, run_migrations, SqlitePlaylistRepository};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = create_pool("sqlite://chorus.db").await?;
//! run_migrations(&pool).await?;
//!
//! let repo = SqlitePlaylistRepository::new(pool);
//! let ctx = RequestContext::new();
//! let profile = repo.get_profile_playlists(&ctx, 7).await?;
//! # Ok(())
//! # }
//! ```

mod error;
mod repository;

// Vertical slices
pub mod playlists;

pub use error::StorageError;
pub use repository::SqlitePlaylistRepository;

use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePool;

// Embed migrations into binary
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Run database migrations
///
/// This should be called once when the application starts to ensure
/// the database schema is up to date.
///
/// # Errors
///
/// Returns an error if migrations fail to run
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), StorageError> {
    MIGRATOR.run(pool).await?;
    Ok(())
}

/// Create a new `SQLite` pool
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (e.g., `<sqlite://chorus.db>`)
///
/// # Errors
///
/// Returns an error if the connection fails
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, StorageError> {
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
    use std::str::FromStr;

    tracing::debug!(database_url, "Creating SQLite pool");

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true) // membership and favorites cascade on playlist delete
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    tracing::info!("SQLite pool ready");

    Ok(pool)
}
