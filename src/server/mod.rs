/// HTTP boundary using `axum`.
///
/// Provides `AppState` (shared, immutable per-process state), the router,
/// and startup logic with graceful shutdown.
pub mod handlers;

use std::future::Future;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use axum::routing::{get, post};
use tokio::net::TcpListener;
use tracing::info;

use crate::analysis::Analyzer;
use crate::fix::FixApplicator;

/// Shared application state available to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<Analyzer>,
    pub applicator: Arc<FixApplicator>,
}

impl AppState {
    pub fn new(analyzer: Analyzer, applicator: FixApplicator) -> Self {
        Self {
            analyzer: Arc::new(analyzer),
            applicator: Arc::new(applicator),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/analyze", post(handlers::analyze))
        .route("/api/analyze-code", post(handlers::analyze))
        .route("/apply-fix", post(handlers::apply_fix))
        .route("/schema", get(handlers::schema))
        .route("/health", get(handlers::health))
        .with_state(state)
}

/// Serve on `listener` until `shutdown` resolves.
pub async fn serve(
    listener: TcpListener,
    state: AppState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    let addr = listener.local_addr().context("listener has no local address")?;
    info!("Listening on http://{addr}");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
        .context("HTTP server encountered an error")?;

    info!("Server stopped");
    Ok(())
}

/// Resolves on Ctrl-C.
pub async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
