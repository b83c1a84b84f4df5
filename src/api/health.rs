//! Health check endpoints for People Intake
//!
//! Liveness, readiness (backed by the database) and build information.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use std::collections::HashMap;

use crate::api::{AppState, ComponentHealth, HealthResponse, HealthStatus, ReadyResponse, BUILD_INFO};

/// Component health tracking
pub struct HealthState {
    /// Last known health of each component
    pub components: tokio::sync::RwLock<HashMap<String, ComponentHealth>>,
}

impl HealthState {
    /// Create a new health state
    pub fn new() -> Self {
        Self {
            components: tokio::sync::RwLock::new(HashMap::new()),
        }
    }

    /// Update component health status
    pub async fn update_component(
        &self,
        name: impl Into<String>,
        status: HealthStatus,
        message: Option<String>,
    ) {
        let mut components = self.components.write().await;
        components.insert(
            name.into(),
            ComponentHealth {
                status,
                message,
                last_check: Utc::now(),
            },
        );
    }

    /// Get overall health status
    pub async fn get_status(&self) -> HealthStatus {
        let components = self.components.read().await;

        if components.values().any(|c| c.status == HealthStatus::Unhealthy) {
            return HealthStatus::Unhealthy;
        }

        HealthStatus::Healthy
    }
}

impl Default for HealthState {
    fn default() -> Self {
        Self::new()
    }
}

/// Basic liveness check endpoint
///
/// Returns 200 OK if the process is serving requests. Does not touch the
/// database.
pub async fn health_check() -> Response {
    let response = HealthResponse {
        status: HealthStatus::Healthy,
        message: Some("Service is running".to_string()),
        timestamp: Utc::now(),
    };

    (StatusCode::OK, Json(response)).into_response()
}

/// Readiness check endpoint
///
/// Pings the database through the store and reports 503 when it is down.
/// The failure detail goes to the log, not the response.
pub async fn ready_check(State(state): State<AppState>) -> Response {
    match state.store.health_check().await {
        Ok(()) => {
            state
                .health
                .update_component("database", HealthStatus::Healthy, None)
                .await;
        },
        Err(e) => {
            tracing::warn!(error = %e, "Database readiness check failed");
            state
                .health
                .update_component(
                    "database",
                    HealthStatus::Unhealthy,
                    Some("Database unavailable".to_string()),
                )
                .await;
        },
    }

    let components = state.health.components.read().await.clone();
    let overall_status = state.health.get_status().await;

    let response = ReadyResponse {
        status: overall_status,
        checks: components,
        timestamp: Utc::now(),
    };

    (overall_status.to_status_code(), Json(response)).into_response()
}

/// Build information endpoint
pub async fn build_info() -> Response {
    (StatusCode::OK, Json(&BUILD_INFO)).into_response()
}
