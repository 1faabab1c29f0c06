pub mod handlers;

use crate::network::Network;
use anyhow::{Context, Result};
use axum::{routing::get, Router};
use log::info;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

pub fn build_routes(network: Arc<Network>) -> Router {
    Router::new()
        .route("/api/cells", get(handlers::list_cells))
        .route("/api/gnodebs", get(handlers::list_cells))
        .route("/api/devices", get(handlers::list_devices))
        .route("/api/ues", get(handlers::list_devices))
        .route("/api/sessions", get(handlers::list_sessions))
        .with_state(network)
        .layer(CorsLayer::permissive())
}

pub async fn serve(network: Arc<Network>, addr: SocketAddr) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind API server to {}", addr))?;
    info!("API running on http://{}", listener.local_addr()?);

    axum::serve(listener, build_routes(network))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("API server failed")?;

    info!("API server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
    }
}
