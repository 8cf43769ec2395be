use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::Row;

use super::PostgresStorage;
use crate::domain::models::Entry;
use crate::storage::{EntryStorage, StorageResult};

const ENTRY_COLUMNS: &str = "id, date, month, origin_country, main_impact_country, \
    relevant_exchange, event_type, who_input, when_input, details";

fn entry_from_row(row: &PgRow) -> StorageResult<Entry> {
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
impl EntryStorage for PostgresStorage {
    async fn list_entries(&self) -> StorageResult<Vec<Entry>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM entries ORDER BY when_input DESC, id DESC",
            ENTRY_COLUMNS
        ))
        .fetch_all(self.pool())
        .await?;

        rows.iter().map(entry_from_row).collect()
    }

    async fn get_entry(&self, entry_id: &str) -> StorageResult<Option<Entry>> {
        let row = sqlx::query(&format!("SELECT {} FROM entries WHERE id = $1", ENTRY_COLUMNS))
            .bind(entry_id)
            .fetch_optional(self.pool())
            .await?;

        row.as_ref().map(entry_from_row).transpose()
    }

    async fn store_entry(&self, entry: &Entry) -> StorageResult<()> {
        sqlx::query(&format!(
            "INSERT INTO entries ({}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
            ENTRY_COLUMNS
        ))
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
            SET date = $2, month = $3, origin_country = $4, main_impact_country = $5,
                relevant_exchange = $6, event_type = $7, who_input = $8, when_input = $9,
                details = $10
            WHERE id = $1
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
        Ok(result.rows_affected() > 0)
    }

    async fn delete_entry(&self, entry_id: &str) -> StorageResult<bool> {
        let result = sqlx::query("DELETE FROM entries WHERE id = $1")
            .bind(entry_id)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
