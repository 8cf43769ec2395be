use std::fs;
use std::path::Path;
use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::info;

use crate::storage::StorageResult;

/// SqliteStorage owns the connection pool for one database file
#[derive(Debug, Clone)]
pub struct SqliteStorage {
    pool: SqlitePool,
    location: String,
}

impl SqliteStorage {
    /// Open (creating if needed) the database file at `path`
    pub async fn open(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;
        Self::with_pool(pool, path.display().to_string()).await
    }

    /// A private in-memory database.
    ///
    /// Every pooled connection to `sqlite::memory:` would get its own empty
    /// database, so the pool is pinned to one connection that never expires.
    pub async fn open_in_memory() -> StorageResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;
        Self::with_pool(pool, "sqlite::memory:".to_string()).await
    }

    async fn with_pool(pool: SqlitePool, location: String) -> StorageResult<Self> {
        Self::setup_schema(&pool).await?;
        info!("SQLite schema ready at {}", location);
        Ok(Self { pool, location })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    async fn setup_schema(pool: &SqlitePool) -> StorageResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS entries (
                id TEXT PRIMARY KEY,
                date TEXT NOT NULL,
                month TEXT NOT NULL,
                origin_country TEXT NOT NULL,
                main_impact_country TEXT NOT NULL,
                relevant_exchange TEXT NOT NULL,
                event_type TEXT NOT NULL,
                who_input TEXT NOT NULL,
                when_input TEXT NOT NULL,
                details TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_entries_when_input
            ON entries(when_input DESC);
            "#,
        )
        .execute(pool)
        .await?;

        for table in ["countries", "exchanges", "event_types"] {
            sqlx::query(&format!(
                r#"
                CREATE TABLE IF NOT EXISTS {} (
                    value TEXT PRIMARY KEY,
                    order_index INTEGER NOT NULL DEFAULT 0
                );
                "#,
                table
            ))
            .execute(pool)
            .await?;
        }

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS events (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                event_name TEXT NOT NULL,
                event_type TEXT REFERENCES event_types(value) ON DELETE SET NULL,
                origin_country TEXT REFERENCES countries(value) ON DELETE SET NULL,
                main_impact_country TEXT REFERENCES countries(value) ON DELETE SET NULL,
                relevant_exchange TEXT REFERENCES exchanges(value) ON DELETE SET NULL,
                month TEXT NOT NULL,
                year INTEGER NOT NULL,
                description TEXT NOT NULL,
                created_at TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }
}
