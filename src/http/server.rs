//! HTTP server for the document API

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::Config;
use crate::store::DocumentStore;

use super::handler;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    /// The connected document store, absent in degraded mode
    pub store: Option<Arc<dyn DocumentStore>>,
    /// Whether `DATABASE_URL` was provided, reported by diagnostics
    pub database_url_set: bool,
    /// Whether `DATABASE_NAME` was provided, reported by diagnostics
    pub database_name_set: bool,
}

impl AppState {
    pub fn new(store: Option<Arc<dyn DocumentStore>>, config: &Config) -> Self {
        AppState {
            store,
            database_url_set: config.database_url.is_some(),
            database_name_set: config.database_name.is_some(),
        }
    }
}

/// Build the API router with CORS and request tracing applied
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handler::root))
        .route("/api/hello", get(handler::hello))
        .route("/test", get(handler::diagnostics))
        .route("/schema", get(handler::schema_summary))
        .route("/collections", get(handler::collections))
        .route(
            "/documents/:collection",
            get(handler::list_documents).post(handler::create_document),
        )
        .route("/graph", get(handler::graph_view))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// HTTP server managing the document API
pub struct HttpServer {
    state: AppState,
    port: u16,
}

impl HttpServer {
    /// Create a new HTTP server
    pub fn new(state: AppState, port: u16) -> Self {
        Self { state, port }
    }

    /// Bind and serve until Ctrl-C or SIGTERM
    pub async fn start(&self) -> anyhow::Result<()> {
        let app = router(self.state.clone());

        let addr = format!("0.0.0.0:{}", self.port);
        let listener = tokio::net::TcpListener::bind(&addr).await?;

        info!("Aufbau API listening on http://{}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("HTTP server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
