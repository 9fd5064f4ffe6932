//! Error types for the storage layer.

use thiserror::Error;

/// Result type for storage operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur in storage operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Connection pool failure.
    #[error("connection pool error: {0}")]
    Pool(String),

    /// Row not found where one was required.
    #[error("record not found: {0}")]
    NotFound(String),

    /// Invalid data read back from the database.
    #[error("invalid data: {0}")]
    InvalidData(String),
}
