//! HTTP server implementation for People Intake
//!
//! This module sets up the Axum web server with the form route, health
//! routes, static file serving, security headers and graceful shutdown.

use axum::{
    extract::MatchedPath,
    http::{header, HeaderName, HeaderValue, Request},
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tower_http::{
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    services::ServeDir,
    set_header::SetResponseHeaderLayer,
    timeout::TimeoutLayer,
    trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer},
    LatencyUnit,
};
use uuid::Uuid;

use crate::{
    api::{
        form::submit_form,
        health::{build_info, health_check, ready_check},
        AppState,
    },
    config::Config,
    error::{Error, Result},
};

/// Content-Security-Policy sent with every response
pub const CONTENT_SECURITY_POLICY: &str =
    "default-src 'self'; style-src 'self' 'unsafe-inline'; script-src 'self'";

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Request ID generator
#[derive(Clone, Default)]
struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        Some(RequestId::new(id.parse().ok()?))
    }
}

/// Create the main application router
///
/// Unmatched paths fall through to the public directory; anything not found
/// there is a 404.
pub fn create_router(config: Arc<Config>, state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/submit", post(submit_form))
        .route("/healthz", get(health_check))
        .route("/readyz", get(ready_check))
        .route("/build", get(build_info))
        .with_state(state);

    let static_files = ServeDir::new(&config.server.public_dir);

    let app = Router::new().merge(api_routes).fallback_service(static_files);

    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    // Layers run outermost-last: the request id is set before tracing sees it
    app.layer(SetResponseHeaderLayer::if_not_present(
        header::CONTENT_SECURITY_POLICY,
        HeaderValue::from_static(CONTENT_SECURITY_POLICY),
    ))
    .layer(SetResponseHeaderLayer::if_not_present(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    ))
    .layer(SetResponseHeaderLayer::if_not_present(
        header::X_FRAME_OPTIONS,
        HeaderValue::from_static("SAMEORIGIN"),
    ))
    .layer(TimeoutLayer::new(config.server.request_timeout()))
    .layer(
        TraceLayer::new_for_http()
            .make_span_with(|request: &Request<_>| {
                let matched_path =
                    request.extensions().get::<MatchedPath>().map(MatchedPath::as_str);
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("unknown");

                tracing::info_span!(
                    "http_request",
                    method = ?request.method(),
                    uri = %request.uri().path(),
                    matched_path,
                    request_id,
                    latency = tracing::field::Empty,
                    status = tracing::field::Empty,
                )
            })
            .on_request(DefaultOnRequest::new().level(tracing::Level::INFO))
            .on_response(
                DefaultOnResponse::new()
                    .level(tracing::Level::INFO)
                    .latency_unit(LatencyUnit::Millis),
            ),
    )
    .layer(PropagateRequestIdLayer::new(request_id.clone()))
    .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
}

/// Create and start the HTTP server
///
/// Returns once the shutdown signal has been received and in-flight
/// requests have drained.
pub async fn create_server(config: Arc<Config>, state: AppState) -> Result<()> {
    let app = create_router(config.clone(), state);
    let addr: SocketAddr = config
        .server
        .address()
        .parse()
        .map_err(|e| Error::config(format!("Invalid server address: {}", e)))?;

    tracing::info!(
        address = %addr,
        environment = %config.server.environment,
        "Starting HTTP server"
    );

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| Error::internal(format!("Failed to bind to {}: {}", addr, e)))?;

    tracing::info!(
        address = %addr,
        "HTTP server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| Error::internal(format!("Server error: {}", e)))
}

/// Shutdown signal handler
///
/// Waits for CTRL+C or SIGTERM signals to gracefully shutdown the server.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received CTRL+C, starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        },
    }
}
