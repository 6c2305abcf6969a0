use std::sync::Arc;
use std::error::Error;
use tokio::net::TcpListener;
use axum::{Router, routing::{get, post}};
use tower_http::cors::CorsLayer;
use tracing::info;

use super::handler::AppState;
use super::routes;

/// API Server exposing the tokenize endpoint
pub struct ApiServer {
    state: Arc<AppState>,
    host: String,
    port: u16,
}

impl ApiServer {
    pub fn new(state: AppState, host: String, port: u16) -> Self {
        info!("Creating new API server on {}:{}", host, port);
        Self {
            state: Arc::new(state),
            host,
            port,
        }
    }

    /// Builds the axum router.
    ///
    /// Any origin, method and header is accepted, and credentialed requests
    /// are allowed: the CORS layer mirrors the caller's origin back.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/tokenize", post(routes::tokenize))
            .route("/health", get(routes::health_check))
            .with_state(Arc::clone(&self.state))
            .layer(CorsLayer::very_permissive())
    }

    pub async fn start(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        let app = self.router();

        info!("Starting server on {}:{}", self.host, self.port);
        let listener = TcpListener::bind((self.host.as_str(), self.port)).await?;

        info!("Server started successfully");
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        info!("Server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        // Without a signal handler, keep serving until the process is killed
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
