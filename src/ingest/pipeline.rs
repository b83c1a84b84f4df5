//! Load-validate-insert pipeline for the startup CSV import

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::io::AsyncRead;
use tokio::task::JoinHandle;
use tracing::{error, info, Instrument};

use super::reader::{collect_batch, Collected};
use super::{IngestOutcome, IngestReport, IngestionBatch};
use crate::db::PersonRepository;
use crate::error::Error;
use crate::{ingest_span, log_error, logging::Timer};

/// Runs CSV imports against an injected person store
#[derive(Clone)]
pub struct IngestionPipeline {
    store: Arc<dyn PersonRepository>,
}

impl IngestionPipeline {
    /// Create a new pipeline writing to `store`
    pub fn new(store: Arc<dyn PersonRepository>) -> Self {
        Self { store }
    }

    /// Read `path`, validate every row and insert the accepted rows as one batch
    ///
    /// Never fails: a missing file, an unreadable stream or a rejected insert
    /// is logged and reported in the returned [`IngestReport`].
    pub async fn load_and_insert(&self, path: impl AsRef<Path>) -> IngestReport {
        let path = path.as_ref().to_path_buf();
        let span = ingest_span!(path.display());

        async {
            match tokio::fs::File::open(&path).await {
                Ok(file) => self.load_from_reader(file, path.clone()).await,
                Err(e) => {
                    let err = Error::resource_open(format!("{}: {}", path.display(), e));
                    log_error!(err, "CSV source unavailable, skipping import");
                    IngestReport {
                        source: path.clone(),
                        rows_read: 0,
                        accepted: 0,
                        rejected: Vec::new(),
                        outcome: IngestOutcome::SourceUnavailable(err.to_string()),
                        elapsed: std::time::Duration::ZERO,
                    }
                },
            }
        }
        .instrument(span)
        .await
    }

    /// Same as [`IngestionPipeline::load_and_insert`] over an already open source
    pub async fn load_from_reader<R>(&self, reader: R, source: PathBuf) -> IngestReport
    where
        R: AsyncRead + Unpin + Send,
    {
        let timer = Timer::start("csv_import");

        let (rows_read, accepted, rejected, outcome) = match collect_batch(reader).await {
            Ok(Collected {
                batch,
                rejected,
                rows_read,
            }) => {
                let accepted = batch.len();
                (rows_read, accepted, rejected, self.flush(batch).await)
            },
            Err(e) => {
                log_error!(e, "CSV source unreadable, skipping import");
                (0, 0, Vec::new(), IngestOutcome::SourceUnavailable(e.to_string()))
            },
        };

        let span = tracing::Span::current();
        span.record("accepted", accepted);
        span.record("rejected", rejected.len());

        let report = IngestReport {
            source,
            rows_read,
            accepted,
            rejected,
            outcome,
            elapsed: timer.stop(),
        };

        info!(
            source = %report.source.display(),
            rows_read = report.rows_read,
            accepted = report.accepted,
            rejected = report.rejected.len(),
            inserted = report.inserted(),
            elapsed_ms = report.elapsed.as_millis(),
            "CSV import finished"
        );

        report
    }

    /// Run [`IngestionPipeline::load_and_insert`] as a background task
    ///
    /// The handle resolves to the run report; abort it to cancel the import.
    pub fn spawn(self, path: PathBuf) -> JoinHandle<IngestReport> {
        tokio::spawn(async move { self.load_and_insert(&path).await })
    }

    async fn flush(&self, batch: IngestionBatch) -> IngestOutcome {
        if batch.is_empty() {
            info!("No valid rows to insert");
            return IngestOutcome::NothingToInsert;
        }

        let rows = batch.len();
        match batch.flush(self.store.as_ref()).await {
            Ok(inserted) => {
                info!(rows = inserted, "Inserted CSV batch");
                IngestOutcome::Inserted(inserted)
            },
            Err(e) if e.is_connection() => {
                let err = Error::from(e);
                error!(error = %err, rows, "Database unavailable, CSV batch not written");
                IngestOutcome::StorageUnavailable(err.to_string())
            },
            Err(e) => {
                let err = Error::from(e);
                error!(error = %err, rows, "Database rejected CSV batch");
                IngestOutcome::WriteFailed(err.to_string())
            },
        }
    }
}
