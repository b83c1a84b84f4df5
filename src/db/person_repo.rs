//! Person repository implementation for People Intake
//!
//! PostgreSQL storage for validated person records. Batches are written with
//! a single `INSERT ... SELECT FROM UNNEST(...)` statement so every value is
//! a bound parameter and the batch lands or fails as one unit.

use async_trait::async_trait;
use tracing::Instrument;

use crate::{
    db::{
        repository::{BatchRepository, Repository, RepositoryError, RepositoryResult},
        DbPool,
    },
    db_span,
    models::PersonRecord,
};

/// Person repository trait
#[async_trait]
pub trait PersonRepository: BatchRepository + Repository<Entity = PersonRecord> {
    /// Create the `people` table if it does not exist
    async fn ensure_schema(&self) -> RepositoryResult<()>;
}

/// PostgreSQL implementation of PersonRepository
#[derive(Clone)]
pub struct PgPersonRepository {
    pool: DbPool,
}

impl PgPersonRepository {
    /// Create a new PostgreSQL person repository
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// The underlying pool
    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl Repository for PgPersonRepository {
    type Entity = PersonRecord;

    async fn count(&self) -> RepositoryResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM people")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn health_check(&self) -> RepositoryResult<()> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| ())
            .map_err(|e| RepositoryError::Connection(format!("Health check failed: {}", e)))
    }
}

#[async_trait]
impl BatchRepository for PgPersonRepository {
    async fn insert_batch(&self, entities: &[PersonRecord]) -> RepositoryResult<u64> {
        if entities.is_empty() {
            return Ok(0);
        }

        let span = db_span!("insert_batch");
        span.record("rows", entities.len());

        let mut first_names = Vec::with_capacity(entities.len());
        let mut last_names = Vec::with_capacity(entities.len());
        let mut emails = Vec::with_capacity(entities.len());
        let mut ages = Vec::with_capacity(entities.len());
        for person in entities {
            first_names.push(person.first_name().to_string());
            last_names.push(person.last_name().to_string());
            emails.push(person.email().to_string());
            ages.push(person.age());
        }

        // WITH ORDINALITY keeps the id sequence in batch order
        let result = sqlx::query(
            r#"
            INSERT INTO people (first_name, last_name, email, age)
            SELECT first_name, last_name, email, age
            FROM UNNEST($1::VARCHAR[], $2::VARCHAR[], $3::VARCHAR[], $4::INT[])
                WITH ORDINALITY AS batch(first_name, last_name, email, age, position)
            ORDER BY position
            "#,
        )
        .bind(first_names)
        .bind(last_names)
        .bind(emails)
        .bind(ages)
        .execute(&self.pool)
        .instrument(span.clone())
        .await?;

        span.record("rows_affected", result.rows_affected());
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl PersonRepository for PgPersonRepository {
    async fn ensure_schema(&self) -> RepositoryResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS people (
                id SERIAL PRIMARY KEY,
                first_name VARCHAR(20) NOT NULL,
                last_name VARCHAR(20) NOT NULL,
                email VARCHAR(100) NOT NULL,
                age INT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        tracing::info!("Table people ready");
        Ok(())
    }
}
