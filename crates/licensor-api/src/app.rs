//! Application builder: wires router, middleware and state into an Axum app.

use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use licensor_auth::PasswordHasher;
use licensor_core::clock::SystemClock;
use licensor_core::config::AppConfig;
use licensor_core::error::AppError;
use licensor_database::Stores;

use crate::router::build_router;
use crate::state::AppState;

/// Admin key shipped in `config/default.toml`.
const DEFAULT_ADMIN_KEY: &str = "change-me";

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    build_router(state)
}

/// Runs the authority server until Ctrl+C.
pub async fn run_server(config: AppConfig) -> Result<(), AppError> {
    info!("Starting licensor server...");

    if config.auth.admin_key == DEFAULT_ADMIN_KEY {
        warn!("auth.admin_key is still the shipped default; set LICENSOR__AUTH__ADMIN_KEY");
    }

    let stores = Stores::open(&config.storage).await?;

    let bind_address = config.server.bind_address();
    let state = AppState::new(
        config,
        stores,
        Arc::new(SystemClock),
        PasswordHasher::new(),
    );

    let swept = state.admin_sessions.clean_sessions().await?;
    info!(
        removed = swept.removed,
        remaining = swept.remaining,
        "Startup session sweep complete"
    );

    let app = build_app(state);
    let listener = TcpListener::bind(&bind_address)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {bind_address}: {e}")))?;

    info!(address = %bind_address, "Licensor server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    info!("Licensor server stopped");
    Ok(())
}

/// Waits for Ctrl+C.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
