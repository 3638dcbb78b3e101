pub mod api;
pub mod appointment;
pub mod config;
pub mod contact;
pub mod core_state;
pub mod db;
pub mod doctor;
pub mod models;
pub mod notify;
pub mod validation;

use std::sync::Arc;

use tokio::signal;
use tracing_subscriber::EnvFilter;

use crate::config::{AppConfig, ConfigError};
use crate::core_state::{CoreError, CoreState};

/// Failures that stop the service before it can serve requests.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Initialization error: {0}")]
    Core(#[from] CoreError),
    #[error("Server error: {0}")]
    Server(#[from] api::ServerError),
}

/// Start the service and block until Ctrl-C or SIGTERM.
pub async fn run() -> Result<(), StartupError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let config = AppConfig::from_env()?;
    tracing::debug!(?config, "Configuration loaded");

    let core = Arc::new(CoreState::from_config(&config)?);
    let mut server = api::start_api_server_on(core, config.bind).await?;
    tracing::info!(
        addr = %server.session.server_addr,
        started_at = %server.session.started_at,
        "Listening"
    );

    shutdown_signal().await;

    server.shutdown();
    server.stopped().await;
    tracing::info!("{} stopped", config::APP_NAME);
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => tracing::info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                tracing::error!("Failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                tracing::info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {e}");
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
}
