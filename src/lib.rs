//! People Intake Library
//!
//! Validates person records from a CSV file and from a web form, bulk-loads
//! the valid CSV rows into PostgreSQL and serves the form over HTTP. The
//! modules are exposed for the binary and for integration tests.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod ingest;
pub mod logging;
pub mod models;
pub mod test_utils;

// Re-export commonly used types at the crate root
pub use config::Config;
pub use error::{Error, Result};

// Re-export model types
pub use models::{
    Field, FormSubmission, PersonRecord, PersonRow, ValidationError, ValidationErrorKind,
};

// Re-export ingestion types
pub use ingest::{IngestOutcome, IngestReport, IngestionPipeline};

// Re-export API server functions
pub use api::server::{create_router, create_server, shutdown_signal};

// Re-export health check types
pub use api::{
    AppState, BuildInfo, ComponentHealth, HealthResponse, HealthState, HealthStatus,
    ReadyResponse,
};
