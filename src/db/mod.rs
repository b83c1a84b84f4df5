//! Database module for People Intake
//!
//! This module provides database connectivity, connection pooling,
//! and the person repository used by the CSV import.

pub mod person_repo;
pub mod pool;
pub mod repository;

// Re-export commonly used types
pub use person_repo::{PersonRepository, PgPersonRepository};
pub use pool::{create_pool, DbPool};
pub use repository::{BatchRepository, Repository, RepositoryError, RepositoryResult};
