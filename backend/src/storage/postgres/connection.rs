use std::str::FromStr;

use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use tracing::info;

use crate::config::PostgresConfig;
use crate::storage::StorageResult;

/// PostgresStorage owns the connection pool for one PostgreSQL database
#[derive(Debug, Clone)]
pub struct PostgresStorage {
    pool: PgPool,
    location: String,
}

impl PostgresStorage {
    pub async fn connect(config: &PostgresConfig) -> StorageResult<Self> {
        let options = match &config.url {
            Some(url) => PgConnectOptions::from_str(url)?,
            None => PgConnectOptions::new()
                .host(&config.host)
                .port(config.port)
                .database(&config.database)
                .username(&config.user)
                .password(&config.password),
        };
        Self::connect_with(options, config.describe()).await
    }

    pub async fn connect_with(options: PgConnectOptions, location: String) -> StorageResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(options)
            .await?;
        Self::setup_schema(&pool).await?;
        info!("PostgreSQL schema ready at {}", location);
        Ok(Self { pool, location })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    async fn setup_schema(pool: &PgPool) -> StorageResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS entries (
                id VARCHAR(255) PRIMARY KEY,
                date DATE NOT NULL,
                month VARCHAR(20) NOT NULL,
                origin_country VARCHAR(100) NOT NULL,
                main_impact_country VARCHAR(100) NOT NULL,
                relevant_exchange VARCHAR(100) NOT NULL,
                event_type VARCHAR(100) NOT NULL,
                who_input VARCHAR(100) NOT NULL,
                when_input TIMESTAMP NOT NULL,
                details TEXT NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;

        for table in ["countries", "exchanges", "event_types"] {
            sqlx::query(&format!(
                r#"
                CREATE TABLE IF NOT EXISTS {} (
                    value VARCHAR(100) PRIMARY KEY,
                    order_index INTEGER NOT NULL DEFAULT 0
                )
                "#,
                table
            ))
            .execute(pool)
            .await?;
        }

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS events (
                id BIGSERIAL PRIMARY KEY,
                event_name VARCHAR(255) NOT NULL,
                event_type VARCHAR(100) REFERENCES event_types(value) ON DELETE SET NULL,
                origin_country VARCHAR(100) REFERENCES countries(value) ON DELETE SET NULL,
                main_impact_country VARCHAR(100) REFERENCES countries(value) ON DELETE SET NULL,
                relevant_exchange VARCHAR(100) REFERENCES exchanges(value) ON DELETE SET NULL,
                month VARCHAR(20) NOT NULL,
                year INTEGER NOT NULL,
                description TEXT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }
}
