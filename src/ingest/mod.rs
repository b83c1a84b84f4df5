//! Bulk CSV import for People Intake
//!
//! A CSV file is read once at startup as a stream of rows. Each row is
//! validated; accepted rows are collected into an [`IngestionBatch`] that is
//! written with one batch insert when the stream ends, and rejected rows are
//! logged with their line number and dropped.

pub mod pipeline;
pub mod reader;

pub use pipeline::IngestionPipeline;
pub use reader::{collect_batch, row_from_record, Collected, FIRST_DATA_LINE};

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::db::{PersonRepository, RepositoryResult};
use crate::models::{Field, PersonRecord};

/// Result of validating one CSV row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    /// The row passed every rule
    Accepted(PersonRecord),
    /// The row failed a rule or could not be decoded
    Rejected(RejectedRow),
}

/// A dropped row, kept for the run report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedRow {
    /// 1-based line counter; the first data row is line 2
    pub line: u64,
    /// Raw cell values as read
    pub raw: Vec<String>,
    /// First field that failed, if the row decoded at all
    pub field: Option<Field>,
    /// Why the row was dropped
    pub reason: String,
}

impl fmt::Display for RejectedRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: [{}] {}", self.line, self.raw.join(","), self.reason)
    }
}

/// Accepted records from one pass over a CSV source, in row order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestionBatch {
    records: Vec<PersonRecord>,
}

impl IngestionBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an accepted record
    pub fn push(&mut self, record: PersonRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[PersonRecord] {
        &self.records
    }

    /// Write the whole batch with a single insert call, consuming it
    pub async fn flush(self, store: &dyn PersonRepository) -> RepositoryResult<u64> {
        store.insert_batch(&self.records).await
    }
}

/// How a load ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestOutcome {
    /// The batch was written; number of rows inserted
    Inserted(u64),
    /// No row passed validation, so nothing was written
    NothingToInsert,
    /// The CSV could not be opened or read
    SourceUnavailable(String),
    /// The database could not be reached for the batch insert
    StorageUnavailable(String),
    /// The database rejected the batch as a whole
    WriteFailed(String),
}

/// Summary of one `load_and_insert` run
#[derive(Debug, Clone)]
pub struct IngestReport {
    pub source: PathBuf,
    /// Data rows read, accepted or not
    pub rows_read: usize,
    pub accepted: usize,
    pub rejected: Vec<RejectedRow>,
    pub outcome: IngestOutcome,
    pub elapsed: Duration,
}

impl IngestReport {
    /// Number of rows written to storage
    pub fn inserted(&self) -> u64 {
        match self.outcome {
            IngestOutcome::Inserted(rows) => rows,
            _ => 0,
        }
    }

    /// Line numbers of the dropped rows
    pub fn rejected_lines(&self) -> Vec<u64> {
        self.rejected.iter().map(|row| row.line).collect()
    }
}
