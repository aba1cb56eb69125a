//! # Kasir API
//!
//! Server entry point.
//!
//! ```text
//! load config ──► init tracing ──► open backend ──► bind ──► serve
//!                                                             │
//!                               Ctrl+C / SIGTERM ──► graceful shutdown
//! ```

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;

use kasir_api::{init_tracing, router, AppState, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    info!("Starting Kasir API server...");

    let config = ServerConfig::load().context("failed to load configuration")?;
    info!(
        addr = %config.server.bind_address(),
        backend = %config.storage.backend,
        decrement_stock = config.stock.decrement_on_checkout,
        "Configuration loaded"
    );

    let state = AppState::build(&config)
        .await
        .context("failed to open storage backend")?;

    let addr = config.server.bind_address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind to {}", addr))?;
    info!(%addr, "Server running");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
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
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
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

    info!("Shutdown signal received, starting graceful shutdown...");
}
