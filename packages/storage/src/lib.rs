// ABOUTME: Shared storage error types for the Vault packages
// ABOUTME: Owns the SQLite schema migrations consumed via sqlx::migrate!

use thiserror::Error;

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("Sqlx error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0}")]
    Validation(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

impl StorageError {
    /// Validation error with a descriptive, client-facing message
    pub fn validation(message: impl Into<String>) -> Self {
        StorageError::Validation(message.into())
    }
}
