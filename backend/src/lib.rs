//! # Events Tracker Backend
//!
//! HTTP service for business-event entries, append-only events and the
//! dropdown lists that feed their forms.
//!
//! ## Architecture
//!
//! - **io**: axum handlers, DTO mappers and error-to-status translation
//! - **domain**: validation and the rules shared by every backend
//! - **storage**: the `Storage` trait and its CSV, SQLite and PostgreSQL
//!   implementations
//! - **config**: settings from YAML and the environment
//!
//! The storage backend is opened once in [`initialize_backend`], shared by
//! the services through [`AppState`] and closed after the server drains.

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{http::Method, Router};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::domain::{DropdownService, EntryService, EventService};
use crate::io::rest::{dropdown_apis, entry_apis, event_apis, index_apis};
use crate::storage::Storage;

/// Ports tried in a row when the configured one is taken
pub const MAX_PORT_ATTEMPTS: u16 = 10;

#[derive(Clone)]
pub struct AppState {
    pub entry_service: EntryService,
    pub dropdown_service: DropdownService,
    pub event_service: EventService,
    pub storage: Arc<dyn Storage>,
}

impl AppState {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            entry_service: EntryService::new(storage.clone()),
            dropdown_service: DropdownService::new(storage.clone()),
            event_service: EventService::new(storage.clone()),
            storage,
        }
    }
}

pub async fn initialize_backend(config: &AppConfig) -> Result<AppState> {
    info!("Setting up storage");
    let storage = storage::open_storage(config).await?;

    info!("Setting up application state");
    Ok(AppState::new(storage))
}

pub fn create_router(app_state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    Router::new()
        .merge(index_apis::router())
        .nest("/entries", entry_apis::router())
        .nest("/dropdowns", dropdown_apis::router())
        .nest("/events", event_apis::router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}

/// Bind `host:port`, moving up one port at a time while the address is in use
pub async fn bind_listener(host: &str, port: u16) -> Result<(TcpListener, SocketAddr)> {
    for attempt in 0..MAX_PORT_ATTEMPTS {
        let Some(candidate) = port.checked_add(attempt) else {
            break;
        };
        match TcpListener::bind((host, candidate)).await {
            Ok(listener) => {
                let addr = listener.local_addr()?;
                return Ok((listener, addr));
            }
            Err(e) if e.kind() == std::io::ErrorKind::AddrInUse => {
                warn!("Port {} is busy, trying {}", candidate, candidate.saturating_add(1));
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to bind {}:{}", host, candidate));
            }
        }
    }
    anyhow::bail!(
        "No free port in {}..{} on {}",
        port,
        port.saturating_add(MAX_PORT_ATTEMPTS),
        host
    )
}

/// Resolves on Ctrl-C, or SIGTERM on Unix
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", e);
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
                warn!("Failed to listen for SIGTERM: {}", e);
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
    info!("Shutdown signal received");
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::path::Path;
    use std::sync::Arc;

    use super::AppState;
    use crate::storage::{CsvPaths, CsvStorage, SqliteStorage};

    pub async fn sqlite_state() -> AppState {
        let storage = SqliteStorage::open_in_memory()
            .await
            .expect("open in-memory SQLite");
        AppState::new(Arc::new(storage))
    }

    pub fn csv_state(dir: &Path) -> AppState {
        let storage = CsvStorage::open(CsvPaths::in_directory(dir)).expect("open CSV storage");
        AppState::new(Arc::new(storage))
    }
}
