use anyhow::{anyhow, Context};
use tracing::info;

use crate::config;
use crate::database::DatabaseManager;

/// Bind the configured port and serve until Ctrl-C
pub async fn handle() -> anyhow::Result<()> {
    let config = config::config();
    config.validate_for_serving().map_err(|e| anyhow!(e))?;

    info!(environment = ?config.environment, "Starting tiered pricing API");

    let bind_addr = format!("0.0.0.0:{}", config.api.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    info!("Listening on http://{}", bind_addr);

    axum::serve(listener, crate::app())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    DatabaseManager::close_all().await;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
