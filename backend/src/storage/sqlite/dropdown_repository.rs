use async_trait::async_trait;
use sqlx::{Sqlite, SqliteConnection, Transaction};

use super::SqliteStorage;
use crate::domain::models::DropdownList;
use crate::storage::traits::check_permutation;
use crate::storage::{DropdownStorage, StorageResult};

async fn ordered_values(conn: &mut SqliteConnection, list: DropdownList) -> StorageResult<Vec<String>> {
    let values: Vec<String> = sqlx::query_scalar(&format!(
        "SELECT value FROM {} ORDER BY order_index ASC, rowid ASC",
        list.table_name()
    ))
    .fetch_all(conn)
    .await?;
    Ok(values)
}

async fn apply_order(
    tx: &mut Transaction<'_, Sqlite>,
    list: DropdownList,
    values: &[String],
) -> StorageResult<()> {
    let current = ordered_values(&mut **tx, list).await?;
    check_permutation(&current, values)?;

    let update = format!(
        "UPDATE {} SET order_index = ? WHERE value = ?",
        list.table_name()
    );
    for (index, value) in values.iter().enumerate() {
        sqlx::query(&update)
            .bind(index as i64)
            .bind(value)
            .execute(&mut **tx)
            .await?;
    }
    Ok(())
}

#[async_trait]
impl DropdownStorage for SqliteStorage {
    async fn list_dropdown(&self, list: DropdownList) -> StorageResult<Vec<String>> {
        let mut conn = self.pool().acquire().await?;
        ordered_values(&mut conn, list).await
    }

    async fn add_dropdown_value(
        &self,
        list: DropdownList,
        value: &str,
    ) -> StorageResult<Vec<String>> {
        let table = list.table_name();
        // `WHERE true` keeps SQLite from reading ON CONFLICT as a join clause
        sqlx::query(&format!(
            r#"
            INSERT INTO {table} (value, order_index)
            SELECT ?, COALESCE(MAX(order_index), -1) + 1 FROM {table} WHERE true
            ON CONFLICT (value) DO NOTHING
            "#
        ))
        .bind(value)
        .execute(self.pool())
        .await?;

        self.list_dropdown(list).await
    }

    async fn delete_dropdown_value(
        &self,
        list: DropdownList,
        value: &str,
    ) -> StorageResult<Option<Vec<String>>> {
        let result = sqlx::query(&format!("DELETE FROM {} WHERE value = ?", list.table_name()))
            .bind(value)
            .execute(self.pool())
            .await?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.list_dropdown(list).await.map(Some)
    }

    async fn reorder_dropdown(&self, list: DropdownList, values: &[String]) -> StorageResult<()> {
        let mut tx = self.pool().begin().await?;
        match apply_order(&mut tx, list, values).await {
            Ok(()) => {
                tx.commit().await?;
                Ok(())
            }
            Err(e) => {
                tx.rollback().await?;
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_failure_mid_reorder_rolls_back() {
        let storage = SqliteStorage::open_in_memory().await.unwrap();
        let list = DropdownList::Countries;
        for value in ["USA", "UK", "Japan"] {
            storage.add_dropdown_value(list, value).await.unwrap();
        }

        // USA and UK update fine, then Japan aborts the statement
        sqlx::query(
            r#"
            CREATE TRIGGER reject_japan BEFORE UPDATE ON countries
            WHEN NEW.value = 'Japan'
            BEGIN
                SELECT RAISE(ABORT, 'rejected');
            END;
            "#,
        )
        .execute(storage.pool())
        .await
        .unwrap();

        let reordered: Vec<String> = ["UK", "USA", "Japan"].iter().map(|s| s.to_string()).collect();
        assert!(storage.reorder_dropdown(list, &reordered).await.is_err());
        assert_eq!(
            storage.list_dropdown(list).await.unwrap(),
            vec!["USA", "UK", "Japan"]
        );
    }

    #[tokio::test]
    async fn test_deleted_value_clears_event_references() {
        use crate::domain::models::NewEvent;
        use crate::storage::EventStorage;
        use chrono::Utc;

        let storage = SqliteStorage::open_in_memory().await.unwrap();
        storage
            .add_dropdown_value(DropdownList::EventTypes, "IPO")
            .await
            .unwrap();
        storage
            .store_event(&NewEvent {
                event_name: "Listing".to_string(),
                event_type: Some("IPO".to_string()),
                origin_country: None,
                main_impact_country: None,
                relevant_exchange: None,
                month: "May".to_string(),
                year: 2024,
                description: "Went public".to_string(),
                created_at: Utc::now(),
            })
            .await
            .unwrap();

        storage
            .delete_dropdown_value(DropdownList::EventTypes, "IPO")
            .await
            .unwrap();
        let events = storage.list_events().await.unwrap();
        assert_eq!(events[0].event_type, None);
    }
}
