//! HTTP server setup.
//!
//! # Responsibilities
//! - Create the Axum router with all handlers
//! - Wire up middleware (tracing, request timeout)
//! - Bind the server to a listener and serve until shutdown

use std::sync::Arc;
use std::time::Duration;

use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::usecase::ConfigUsecase;
use crate::http::handlers;
use crate::settings::Settings;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub usecase: Arc<ConfigUsecase>,
}

/// HTTP server for the dashboard backend.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    pub fn new(usecase: Arc<ConfigUsecase>, settings: &Settings) -> Self {
        let state = AppState { usecase };
        Self {
            router: Self::build_router(state, settings.request_timeout),
        }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState, request_timeout: Duration) -> Router {
        Router::new()
            .route("/api/v1/config", get(handlers::get_config))
            .route("/api/v1/configs", get(handlers::get_config_list))
            .route("/api/v1/info", get(handlers::get_info))
            .with_state(state)
            .layer(TimeoutLayer::new(request_timeout))
            .layer(TraceLayer::new_for_http())
    }

    /// The assembled router, for in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received");
}
