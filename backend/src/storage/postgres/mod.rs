//! # PostgreSQL Storage
//!
//! Server-backed SQL backend. Connection settings come from
//! [`crate::config::PostgresConfig`]; the schema is created on connect.

mod connection;
mod dropdown_repository;
mod entry_repository;
mod event_repository;

use async_trait::async_trait;
use tracing::info;

pub use connection::PostgresStorage;

use super::{Storage, StorageKind};

#[async_trait]
impl Storage for PostgresStorage {
    fn kind(&self) -> StorageKind {
        StorageKind::Postgres
    }

    fn locations(&self) -> Vec<(String, String)> {
        vec![("PostgreSQL database".to_string(), self.location().to_string())]
    }

    async fn close(&self) {
        self.pool().close().await;
        info!("PostgreSQL pool closed");
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;
    use std::time::{SystemTime, UNIX_EPOCH};

    use chrono::{NaiveDate, Utc};
    use sqlx::postgres::{PgConnectOptions, PgPool};

    use super::*;
    use crate::domain::models::{DropdownList, Entry, NewEvent};
    use crate::storage::{DropdownStorage, EntryStorage, EventStorage, StorageError};

    const TEST_DATABASE_URL: &str = "EVENTS_TRACKER_TEST_DATABASE_URL";

    /// A storage in a throwaway schema, or None when no test server is configured
    async fn test_storage() -> Option<(PostgresStorage, PgPool, String)> {
        let url = std::env::var(TEST_DATABASE_URL).ok()?;
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let schema = format!("events_tracker_test_{}", nanos);

        let admin = PgPool::connect(&url).await.unwrap();
        sqlx::query(&format!("CREATE SCHEMA {}", schema))
            .execute(&admin)
            .await
            .unwrap();

        let options = PgConnectOptions::from_str(&url)
            .unwrap()
            .options([("search_path", schema.as_str())]);
        let storage = PostgresStorage::connect_with(options, schema.clone())
            .await
            .unwrap();
        Some((storage, admin, schema))
    }

    async fn drop_schema(storage: PostgresStorage, admin: PgPool, schema: String) {
        storage.close().await;
        sqlx::query(&format!("DROP SCHEMA {} CASCADE", schema))
            .execute(&admin)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_postgres_entries_and_dropdowns() {
        let Some((storage, admin, schema)) = test_storage().await else {
            return;
        };

        let when = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_micro_opt(3, 4, 5, 123_456)
            .unwrap();
        let entry = Entry {
            id: "1704164645123".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            month: "January".to_string(),
            origin_country: "Germany".to_string(),
            main_impact_country: "France".to_string(),
            relevant_exchange: "XETRA".to_string(),
            event_type: "Merger".to_string(),
            who_input: "desk".to_string(),
            when_input: when,
            details: "Cross-border".to_string(),
        };
        storage.store_entry(&entry).await.unwrap();
        assert_eq!(storage.list_entries().await.unwrap(), vec![entry.clone()]);
        assert!(!storage.delete_entry("absent").await.unwrap());

        let list = DropdownList::Countries;
        storage.add_dropdown_value(list, "Germany").await.unwrap();
        storage.add_dropdown_value(list, "France").await.unwrap();
        let reordered = vec!["France".to_string(), "Germany".to_string()];
        storage.reorder_dropdown(list, &reordered).await.unwrap();
        assert_eq!(storage.list_dropdown(list).await.unwrap(), reordered);

        let err = storage
            .reorder_dropdown(list, &["France".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Mismatch(_)));

        drop_schema(storage, admin, schema).await;
    }

    #[tokio::test]
    async fn test_postgres_events_and_references() {
        let Some((storage, admin, schema)) = test_storage().await else {
            return;
        };

        let event = NewEvent {
            event_name: "Listing".to_string(),
            event_type: None,
            origin_country: Some("Nowhere".to_string()),
            main_impact_country: None,
            relevant_exchange: None,
            month: "May".to_string(),
            year: 2024,
            description: "Orphan reference".to_string(),
            created_at: Utc::now(),
        };
        let err = storage.store_event(&event).await.unwrap_err();
        assert!(matches!(err, StorageError::Constraint(_)));

        let valid = NewEvent {
            origin_country: None,
            ..event
        };
        let first = storage.store_event(&valid).await.unwrap();
        let second = storage.store_event(&valid).await.unwrap();
        let listed = storage.list_events().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, second.id);
        assert_eq!(listed[1].id, first.id);

        drop_schema(storage, admin, schema).await;
    }

    #[tokio::test]
    async fn test_postgres_concurrent_appends_get_distinct_indexes() {
        let Some((storage, admin, schema)) = test_storage().await else {
            return;
        };

        let list = DropdownList::Exchanges;
        let mut handles = Vec::new();
        for i in 0..10 {
            let storage = storage.clone();
            handles.push(tokio::spawn(async move {
                storage
                    .add_dropdown_value(list, &format!("EX{}", i))
                    .await
                    .unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let mut indexes: Vec<i32> =
            sqlx::query_scalar(&format!("SELECT order_index FROM {}", list.table_name()))
                .fetch_all(storage.pool())
                .await
                .unwrap();
        indexes.sort();
        assert_eq!(indexes, (0..10).collect::<Vec<i32>>());

        drop_schema(storage, admin, schema).await;
    }
}
