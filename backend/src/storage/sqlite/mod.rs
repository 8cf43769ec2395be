//! # SQLite Storage
//!
//! Single-file SQL backend through a SQLx pool. The schema is created on open.
//! Event dropdown references are real foreign keys, enforced because every
//! connection enables `PRAGMA foreign_keys`.

mod connection;
mod dropdown_repository;
mod entry_repository;
mod event_repository;

use async_trait::async_trait;
use tracing::info;

pub use connection::SqliteStorage;

use super::{Storage, StorageKind};

#[async_trait]
impl Storage for SqliteStorage {
    fn kind(&self) -> StorageKind {
        StorageKind::Sqlite
    }

    fn locations(&self) -> Vec<(String, String)> {
        vec![("SQLite database".to_string(), self.location().to_string())]
    }

    async fn close(&self) {
        self.pool().close().await;
        info!("SQLite pool closed");
    }
}
