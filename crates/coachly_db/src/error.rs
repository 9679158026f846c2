// --- File: crates/coachly_db/src/error.rs ---
use coachly_scheduling::store::StoreError;
use thiserror::Error;

/// Errors from the database layer.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database configuration error: {0}")]
    ConfigError(String),
    #[error("Database pool error: {0}")]
    PoolError(String),
    #[error("Database query error: {0}")]
    QueryError(String),
    #[error("Database transaction error: {0}")]
    TransactionError(String),
    /// A stored value could not be interpreted as its domain type.
    #[error("Row mapping error: {0}")]
    MappingError(String),
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        DbError::QueryError(err.to_string())
    }
}

impl From<DbError> for StoreError {
    fn from(err: DbError) -> Self {
        StoreError::Backend(err.to_string())
    }
}
