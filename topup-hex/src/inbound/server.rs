//! HTTP Server configuration and startup.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use topup_types::{TopUpProvider, TransactionRepository};

use super::handlers::{self, AppState};
use crate::TopUpService;

/// HTTP Server for the Top-Up API.
pub struct HttpServer<R: TransactionRepository, P: TopUpProvider> {
    state: Arc<AppState<R, P>>,
}

impl<R: TransactionRepository, P: TopUpProvider> HttpServer<R, P> {
    /// Creates a new HTTP server with the given service.
    pub fn new(service: TopUpService<R, P>) -> Self {
        Self {
            state: Arc::new(AppState { service }),
        }
    }

    /// Builds the Axum router with all routes.
    pub fn router(&self) -> Router {
        // Build HTTP metrics layer (uses globally set MeterProvider)
        let metrics = axum_otel_metrics::HttpMetricsLayerBuilder::new().build();

        Router::new()
            .route("/health", get(handlers::health))
            .route("/api/topups", post(handlers::create_top_up::<R, P>))
            .route("/api/transactions", get(handlers::list_transactions::<R, P>))
            .route(
                "/api/transactions/{id}",
                get(handlers::get_transaction::<R, P>)
                    .delete(handlers::delete_transaction::<R, P>),
            )
            .route(
                "/api/transactions/{id}/reactivate",
                post(handlers::reactivate_transaction::<R, P>),
            )
            .route(
                "/api/transactions/phone/{phone}",
                get(handlers::transactions_by_phone::<R, P>),
            )
            .route("/api/suppliers", get(handlers::list_suppliers::<R, P>))
            .layer(metrics)
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Runs the server on the given address with graceful shutdown.
    pub async fn run(self, addr: &str) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("Server listening on {}", listener.local_addr()?);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown...");
}
