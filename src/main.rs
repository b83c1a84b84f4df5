//! People Intake - CSV import and web form validation service
//!
//! On startup this application opens the PostgreSQL pool, imports the
//! configured CSV file in the background and serves the intake form until
//! it receives CTRL+C or SIGTERM.

use std::sync::Arc;

use people_intake::{
    api::AppState,
    config::Config,
    db::{create_pool, PersonRepository, PgPersonRepository},
    error::{Error, Result},
    ingest::IngestionPipeline,
    logging,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration from environment
    let config = Arc::new(Config::from_env()?);

    // Validate configuration
    config.validate()?;

    // Initialize logging/tracing
    logging::init_tracing(&config.server)?;

    // Log configuration (with sensitive data masked)
    config.log_config();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting People Intake");

    let pool = create_pool(&config.database).await.map_err(|e| {
        tracing::error!(error = %e, "Database unavailable at startup");
        e
    })?;

    let store = Arc::new(PgPersonRepository::new(pool.clone()));
    store
        .ensure_schema()
        .await
        .map_err(|e| Error::storage_connect(format!("Failed to prepare people table: {}", e)))?;

    let import = if config.ingest.enabled {
        Some(IngestionPipeline::new(store.clone()).spawn(config.ingest.path()))
    } else {
        tracing::info!("CSV import disabled");
        None
    };

    let served = people_intake::create_server(config.clone(), AppState::new(store)).await;

    if let Some(handle) = import {
        if !handle.is_finished() {
            tracing::warn!("Aborting unfinished CSV import");
            handle.abort();
        }

        match handle.await {
            Ok(report) => tracing::debug!(inserted = report.inserted(), "CSV import task joined"),
            Err(e) if e.is_cancelled() => tracing::info!("CSV import cancelled"),
            Err(e) => tracing::error!(error = %e, "CSV import task failed"),
        }
    }

    pool.close().await;
    served?;

    tracing::info!("People Intake shutdown complete");
    Ok(())
}
