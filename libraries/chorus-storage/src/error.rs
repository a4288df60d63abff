/// Storage-specific errors
use chorus_core::ChorusError;
use thiserror::Error;

/// Storage error types
///
/// Only pool setup and migrations return these directly. Repository
/// functions convert them into `ChorusError` through [`classify`] or the
/// `From` impl below.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Migration error
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Stored value could not be mapped onto a domain type
    #[error("Corrupt row: {0}")]
    CorruptRow(String),

    /// Database error from `SQLx`
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl From<StorageError> for ChorusError {
    fn from(err: StorageError) -> Self {
        tracing::error!(error = ?err, "Storage failure");
        ChorusError::internal(err.to_string())
    }
}

/// Map a failed statement onto the domain taxonomy.
///
/// Unique violations become `on_unique()`, check violations `InvalidInput`;
/// everything else is logged and reported as `Internal`.
pub(crate) fn classify(err: sqlx::Error, on_unique: impl FnOnce() -> ChorusError) -> ChorusError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return on_unique();
        }
        if db_err.is_check_violation() {
            return ChorusError::invalid_input(db_err.message().to_string());
        }
    }

    StorageError::from(err).into()
}
