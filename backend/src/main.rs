use anyhow::Result;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use events_tracker_backend::config::AppConfig;
use events_tracker_backend::{bind_listener, create_router, initialize_backend, shutdown_signal};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {:#}", e);
            return Err(e);
        }
    };
    info!("Storage mode: {}", config.storage_type);
    info!("Data directory: {}", config.data_dir.display());

    let app_state = match initialize_backend(&config).await {
        Ok(state) => state,
        Err(e) => {
            error!("Failed to open storage: {:#}", e);
            return Err(e);
        }
    };
    let storage = app_state.storage.clone();
    let app = create_router(app_state);

    let (listener, addr) = bind_listener(&config.server.host, config.server.port).await?;
    info!("Server is running on http://{}", addr);

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    storage.close().await;
    info!("Server stopped");
    served?;
    Ok(())
}
