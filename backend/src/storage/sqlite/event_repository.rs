use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use super::SqliteStorage;
use crate::domain::models::{Event, NewEvent};
use crate::storage::{EventStorage, StorageResult};

fn event_from_row(row: &SqliteRow) -> StorageResult<Event> {
    Ok(Event {
        id: row.try_get("id")?,
        event_name: row.try_get("event_name")?,
        event_type: row.try_get("event_type")?,
        origin_country: row.try_get("origin_country")?,
        main_impact_country: row.try_get("main_impact_country")?,
        relevant_exchange: row.try_get("relevant_exchange")?,
        month: row.try_get("month")?,
        year: row.try_get("year")?,
        description: row.try_get("description")?,
        created_at: row.try_get("created_at")?,
    })
}

#[async_trait]
impl EventStorage for SqliteStorage {
    async fn store_event(&self, event: &NewEvent) -> StorageResult<Event> {
        let result = sqlx::query(
            r#"
            INSERT INTO events (event_name, event_type, origin_country, main_impact_country,
                                relevant_exchange, month, year, description, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&event.event_name)
        .bind(&event.event_type)
        .bind(&event.origin_country)
        .bind(&event.main_impact_country)
        .bind(&event.relevant_exchange)
        .bind(&event.month)
        .bind(event.year)
        .bind(&event.description)
        .bind(event.created_at)
        .execute(self.pool())
        .await?;

        Ok(event.with_id(result.last_insert_rowid()))
    }

    async fn list_events(&self) -> StorageResult<Vec<Event>> {
        let rows = sqlx::query(
            r#"
            SELECT id, event_name, event_type, origin_country, main_impact_country,
                   relevant_exchange, month, year, description, created_at
            FROM events
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(self.pool())
        .await?;

        rows.iter().map(event_from_row).collect()
    }
}
