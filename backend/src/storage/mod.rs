//! # Storage Module
//!
//! Handles all data persistence for the events tracker.
//!
//! Three interchangeable backends implement the [`Storage`] trait:
//!
//! - **csv**: one flat file per table, rewritten through a temp file and an
//!   atomic rename, writers serialized per file
//! - **sqlite**: a single database file through a SQLx pool
//! - **postgres**: a PostgreSQL server through a SQLx pool
//!
//! The backend is chosen once at startup by [`open_storage`] and handed to the
//! domain services as an `Arc<dyn Storage>`. Nothing else in the crate knows
//! which backend is active.

pub mod csv;
pub mod error;
pub mod postgres;
pub mod sqlite;
pub mod traits;

#[cfg(test)]
pub mod test_utils;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::info;

use crate::config::AppConfig;

pub use self::csv::{CsvConnection, CsvPaths, CsvStorage};
pub use self::postgres::PostgresStorage;
pub use self::sqlite::SqliteStorage;
pub use error::{StorageError, StorageResult};
pub use traits::{DropdownStorage, EntryStorage, EventStorage, Storage};

/// Which backend stores the data
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    #[default]
    Csv,
    Postgres,
    Sqlite,
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StorageKind::Csv => "csv",
            StorageKind::Postgres => "postgres",
            StorageKind::Sqlite => "sqlite",
        };
        f.write_str(name)
    }
}

impl FromStr for StorageKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(StorageKind::Csv),
            "postgres" | "postgresql" => Ok(StorageKind::Postgres),
            "sqlite" => Ok(StorageKind::Sqlite),
            other => anyhow::bail!(
                "Unsupported storage type '{}': expected csv, postgres or sqlite",
                other
            ),
        }
    }
}

/// Open the storage backend selected by the configuration
pub async fn open_storage(config: &AppConfig) -> Result<Arc<dyn Storage>> {
    info!("Opening {} storage", config.storage_type);
    let storage: Arc<dyn Storage> = match config.storage_type {
        StorageKind::Csv => {
            let paths = config.csv_paths();
            let storage = CsvStorage::open(paths).context("Failed to open CSV storage")?;
            Arc::new(storage)
        }
        StorageKind::Sqlite => {
            let path = config.sqlite_path();
            let storage = SqliteStorage::open(&path)
                .await
                .with_context(|| format!("Failed to open SQLite database {}", path.display()))?;
            Arc::new(storage)
        }
        StorageKind::Postgres => {
            let storage = PostgresStorage::connect(&config.postgres)
                .await
                .with_context(|| {
                    format!("Failed to connect to PostgreSQL at {}", config.postgres.describe())
                })?;
            Arc::new(storage)
        }
    };

    for (label, location) in storage.locations() {
        info!("{}: {}", label, location);
    }
    Ok(storage)
}
