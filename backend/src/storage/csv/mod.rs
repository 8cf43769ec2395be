//! # CSV Storage
//!
//! Flat-file backend. Each table lives in its own CSV file with a header row:
//! `data.csv` (entries), `countries.csv`, `exchanges.csv`, `event_types.csv`
//! and `events.csv`. Missing files are created on open.

pub mod connection;
mod dropdown_repository;
mod entry_repository;
mod event_repository;

use async_trait::async_trait;
use tracing::info;

pub use connection::{CsvConnection, CsvPaths};

use super::{Storage, StorageKind, StorageResult};

#[derive(Debug)]
pub struct CsvStorage {
    connection: CsvConnection,
}

impl CsvStorage {
    pub fn open(paths: CsvPaths) -> StorageResult<Self> {
        let connection = CsvConnection::new(paths)?;
        Ok(Self { connection })
    }
}

#[async_trait]
impl Storage for CsvStorage {
    fn kind(&self) -> StorageKind {
        StorageKind::Csv
    }

    fn locations(&self) -> Vec<(String, String)> {
        let paths = self.connection.paths();
        [
            ("Data", &paths.entries),
            ("Countries", &paths.countries),
            ("Exchanges", &paths.exchanges),
            ("Event types", &paths.event_types),
            ("Events", &paths.events),
        ]
        .into_iter()
        .map(|(label, path)| (label.to_string(), path.display().to_string()))
        .collect()
    }

    async fn close(&self) {
        info!("CSV storage closed");
    }
}
