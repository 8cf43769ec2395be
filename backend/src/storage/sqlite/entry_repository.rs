use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use super::SqliteStorage;
use crate::domain::models::Entry;
use crate::storage::{EntryStorage, StorageResult};

fn entry_from_row(row: &SqliteRow) -> StorageResult<Entry> {
    Ok(Entry {
        id: row.try_get("id")?,
        date: row.try_get("date")?,
        month: row.try_get("month")?,
        origin_country: row.try_get("origin_country")?,
        main_impact_country: row.try_get("main_impact_country")?,
        relevant_exchange: row.try_get("relevant_exchange")?,
        event_type: row.try_get("event_type")?,
        who_input: row.try_get("who_input")?,
        when_input: row.try_get("when_input")?,
        details: row.try_get("details")?,
    })
}

#[async_trait]
impl EntryStorage for SqliteStorage {
    async fn list_entries(&self) -> StorageResult<Vec<Entry>> {
        let rows = sqlx::query(
            r#"
            SELECT id, date, month, origin_country, main_impact_country,
                   relevant_exchange, event_type, who_input, when_input, details
            FROM entries
            ORDER BY when_input DESC, id DESC
            "#,
        )
        .fetch_all(self.pool())
        .await?;

        rows.iter().map(entry_from_row).collect()
    }

    async fn get_entry(&self, entry_id: &str) -> StorageResult<Option<Entry>> {
        let row = sqlx::query(
            r#"
            SELECT id, date, month, origin_country, main_impact_country,
                   relevant_exchange, event_type, who_input, when_input, details
            FROM entries
            WHERE id = ?
            "#,
        )
        .bind(entry_id)
        .fetch_optional(self.pool())
        .await?;

        row.as_ref().map(entry_from_row).transpose()
    }

    async fn store_entry(&self, entry: &Entry) -> StorageResult<()> {
        sqlx::query(
            r#"
            INSERT INTO entries (id, date, month, origin_country, main_impact_country,
                                 relevant_exchange, event_type, who_input, when_input, details)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&entry.id)
        .bind(entry.date)
        .bind(&entry.month)
        .bind(&entry.origin_country)
        .bind(&entry.main_impact_country)
        .bind(&entry.relevant_exchange)
        .bind(&entry.event_type)
        .bind(&entry.who_input)
        .bind(entry.when_input)
        .bind(&entry.details)
        .execute(self.pool())
        .await?;
        Ok(())
    }

    async fn update_entry(&self, entry: &Entry) -> StorageResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE entries
            SET date = ?, month = ?, origin_country = ?, main_impact_country = ?,
                relevant_exchange = ?, event_type = ?, who_input = ?, when_input = ?,
                details = ?
            WHERE id = ?
            "#,
        )
        .bind(entry.date)
        .bind(&entry.month)
        .bind(&entry.origin_country)
        .bind(&entry.main_impact_country)
        .bind(&entry.relevant_exchange)
        .bind(&entry.event_type)
        .bind(&entry.who_input)
        .bind(entry.when_input)
        .bind(&entry.details)
        .bind(&entry.id)
        .execute(self.pool())
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_entry(&self, entry_id: &str) -> StorageResult<bool> {
        let result = sqlx::query("DELETE FROM entries WHERE id = ?")
            .bind(entry_id)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
