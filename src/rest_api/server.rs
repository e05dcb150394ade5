//! Axum HTTP server for the REST API

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::status::ClusterSource;
use crate::{Error, Result};

use super::handlers;

/// State shared by all handlers
pub struct AppState {
    pub source: Arc<dyn ClusterSource>,
}

impl AppState {
    pub fn new(source: Arc<dyn ClusterSource>) -> Self {
        Self { source }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/databases", get(handlers::list_databases))
        .route(
            "/api/databases/{namespace}/{name}/status",
            get(handlers::database_status),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the REST API server on `addr`
pub async fn run_server(state: Arc<AppState>, addr: SocketAddr) -> Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| Error::ConfigError(format!("Failed to bind to {}: {}", addr, e)))?;
    serve(listener, state).await
}

/// Serve the REST API on an already bound listener
pub async fn serve(listener: TcpListener, state: Arc<AppState>) -> Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!("REST API server listening on {}", addr);
    }

    axum::serve(listener, router(state))
        .await
        .map_err(|e| Error::ConfigError(format!("Server error: {}", e)))?;

    Ok(())
}
