//! HTTP API server: the transport mapping of the engine's operations.
//!
//! ## Endpoints
//!
//! ### Miner catalog
//! - `GET /api/v1/miners` - List registered miner types
//!
//! ### Instance lifecycle
//! - `GET /api/v1/instances` - List instances
//! - `POST /api/v1/instances/{miner}` - Create an instance of a miner type
//! - `POST /api/v1/instances/{id}/start` - Start an instance
//! - `POST /api/v1/instances/{id}/stop` - Stop an instance
//! - `GET /api/v1/instances/{id}/status` - Running state
//! - `POST /api/v1/instances/{id}/views` - Query computed views
//! - `DELETE /api/v1/instances/{id}` - Delete an instance
//!
//! ### System
//! - `GET /health` - Health check
//! - `GET /version` - Version info
//!
//! All failures carry a JSON body `{ "error": ..., "code": ... }` where
//! `code` is the engine's stable outcome code, so clients branch on cause
//! rather than parsing messages.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};

use crate::config::ServerConfig;
use crate::engine::{Engine, Error};
use crate::miner::MinerCatalog;

pub mod handlers;
pub mod types;

pub use types::*;

use handlers::{
    create_instance, delete_instance, health, instance_status, instance_views, list_instances,
    list_miners, start_instance, stop_instance, version,
};


/// Shared application state for HTTP handlers.
pub(crate) type SharedState = Arc<Engine>;

/// Build the API router over an engine.
pub fn router(engine: Arc<Engine>) -> Router {
    Router::new()
        // Miner catalog
        .route("/api/v1/miners", get(list_miners))
        // Instance lifecycle
        .route("/api/v1/instances", get(list_instances))
        .route(
            "/api/v1/instances/{id}",
            post(create_instance).delete(delete_instance),
        )
        .route("/api/v1/instances/{id}/start", post(start_instance))
        .route("/api/v1/instances/{id}/stop", post(stop_instance))
        .route("/api/v1/instances/{id}/status", get(instance_status))
        .route("/api/v1/instances/{id}/views", post(instance_views))
        // System endpoints
        .route("/health", get(health))
        .route("/version", get(version))
        .with_state(engine)
}

/// Start the HTTP API server and run until ctrl-c/SIGTERM.
///
/// On shutdown every still-running instance gets a best-effort stop; all
/// state is in-memory and dies with the process.
pub async fn serve(config: &ServerConfig, catalog: MinerCatalog) -> Result<()> {
    let engine = Arc::new(Engine::new(catalog));
    tracing::info!(miners = engine.catalog().len(), "Miner catalog registered");

    let app = router(Arc::clone(&engine));

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .with_context(|| {
            format!(
                "Invalid listen address {}:{}",
                config.server.host, config.server.port
            )
        })?;

    tracing::info!("Starting lode HTTP API on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    engine.stop_all();
    tracing::info!("Graceful shutdown complete");

    Ok(())
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
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
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, stopping server...");
}

// =============================================================================
// Error Handling
// =============================================================================

/// Engine error wrapper carrying the HTTP mapping.
pub(crate) struct AppError(Error);

impl From<Error> for AppError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        (
            status,
            Json(ErrorResponse {
                error: self.0.to_string(),
                code: self.0.code().to_string(),
            }),
        )
            .into_response()
    }
}
