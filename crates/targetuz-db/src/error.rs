//! Database error types

use thiserror::Error;

/// Database operation errors
#[derive(Debug, Error)]
pub enum DbError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Migration error: {0}")]
    Migration(String),

    #[error("Query error: {0}")]
    Query(#[from] sqlx::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Stored value out of range: {0}")]
    Corrupt(String),
}

/// Result type for database operations
pub type DbResult<T> = Result<T, DbError>;

impl From<DbError> for targetuz_types::TargetUzError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::NotFound(msg) => targetuz_types::TargetUzError::internal(msg),
            DbError::InvalidInput(msg) => {
                targetuz_types::TargetUzError::invalid_input("request", msg)
            }
            other => targetuz_types::TargetUzError::storage(other.to_string()),
        }
    }
}
