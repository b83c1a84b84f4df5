//! Repository pattern abstractions for People Intake
//!
//! This module defines the repository traits and associated error types
//! for database operations.

use async_trait::async_trait;
use thiserror::Error;

/// Result type for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Repository error types
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// Database connection error
    #[error("Database connection error: {0}")]
    Connection(String),

    /// Query execution error
    #[error("Query execution error: {0}")]
    QueryExecution(String),

    /// Generic database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl RepositoryError {
    /// Check if the error is a connectivity problem rather than a rejected query
    pub fn is_connection(&self) -> bool {
        match self {
            RepositoryError::Connection(_) => true,
            RepositoryError::Database(e) => matches!(
                e,
                sqlx::Error::PoolTimedOut
                    | sqlx::Error::PoolClosed
                    | sqlx::Error::Io(_)
                    | sqlx::Error::Tls(_)
            ),
            RepositoryError::QueryExecution(_) => false,
        }
    }
}

/// Convert repository errors to application errors
impl From<RepositoryError> for crate::error::Error {
    fn from(err: RepositoryError) -> Self {
        crate::error::Error::storage_write(err.to_string())
    }
}

/// Base repository trait
#[async_trait]
pub trait Repository: Send + Sync {
    /// The entity type this repository manages
    type Entity: Send + Sync;

    /// Count total entities
    async fn count(&self) -> RepositoryResult<i64>;

    /// Health check for the repository
    async fn health_check(&self) -> RepositoryResult<()>;
}

/// Repository with batch operations
#[async_trait]
pub trait BatchRepository: Repository {
    /// Insert all entities as one unit, in order; returns rows inserted
    async fn insert_batch(&self, entities: &[Self::Entity]) -> RepositoryResult<u64>;
}
