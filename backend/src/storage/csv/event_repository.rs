use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use super::CsvStorage;
use crate::domain::models::{Event, NewEvent};
use crate::storage::{EventStorage, StorageError, StorageResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(super) struct EventRow {
    pub id: i64,
    pub event_name: String,
    pub event_type: Option<String>,
    pub origin_country: Option<String>,
    pub main_impact_country: Option<String>,
    pub relevant_exchange: Option<String>,
    pub month: String,
    pub year: i32,
    pub description: String,
    pub created_at: String,
}

impl From<&Event> for EventRow {
    fn from(event: &Event) -> Self {
        Self {
            id: event.id,
            event_name: event.event_name.clone(),
            event_type: event.event_type.clone(),
            origin_country: event.origin_country.clone(),
            main_impact_country: event.main_impact_country.clone(),
            relevant_exchange: event.relevant_exchange.clone(),
            month: event.month.clone(),
            year: event.year,
            description: event.description.clone(),
            created_at: event.created_at.to_rfc3339_opts(SecondsFormat::Micros, true),
        }
    }
}

impl TryFrom<EventRow> for Event {
    type Error = StorageError;

    fn try_from(row: EventRow) -> Result<Self, Self::Error> {
        let created_at = DateTime::parse_from_rfc3339(&row.created_at)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| StorageError::Malformed {
                file: "events.csv".to_string(),
                reason: format!("event {} has invalid created_at: {}", row.id, e),
            })?;
        Ok(Event {
            id: row.id,
            event_name: row.event_name,
            event_type: row.event_type,
            origin_country: row.origin_country,
            main_impact_country: row.main_impact_country,
            relevant_exchange: row.relevant_exchange,
            month: row.month,
            year: row.year,
            description: row.description,
            created_at,
        })
    }
}

#[async_trait]
impl EventStorage for CsvStorage {
    async fn store_event(&self, event: &NewEvent) -> StorageResult<Event> {
        let file = self.connection.events();
        let _guard = file.lock().await;
        let mut rows: Vec<EventRow> = file.read_rows()?;
        let next_id = rows.iter().map(|row| row.id).max().unwrap_or(0) + 1;
        let stored = event.with_id(next_id);
        rows.push(EventRow::from(&stored));
        file.write_rows(&rows)?;
        Ok(stored)
    }

    async fn list_events(&self) -> StorageResult<Vec<Event>> {
        let rows: Vec<EventRow> = self.connection.events().read_rows()?;
        let mut events = rows
            .into_iter()
            .map(Event::try_from)
            .collect::<StorageResult<Vec<_>>>()?;
        events.sort_by(Event::newest_first);
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::storage::test_utils::TestEnvironment;
    use chrono::TimeZone;

    #[tokio::test]
    async fn test_ids_continue_after_the_highest_stored_id() {
        let env = TestEnvironment::new().await;
        fs::write(
            &env.csv_paths.events,
            "id,event_name,event_type,origin_country,main_impact_country,relevant_exchange,month,year,description,created_at\n\
             7,Old,,,,,January,2023,Imported,2023-01-05T10:00:00.000Z\n",
        )
        .unwrap();

        let stored = env
            .csv
            .store_event(&NewEvent {
                event_name: "New".to_string(),
                event_type: Some("IPO".to_string()),
                origin_country: None,
                main_impact_country: None,
                relevant_exchange: None,
                month: "June".to_string(),
                year: 2024,
                description: "Fresh".to_string(),
                created_at: Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap(),
            })
            .await
            .unwrap();
        assert_eq!(stored.id, 8);

        let events = env.csv.list_events().await.unwrap();
        assert_eq!(events[0].event_name, "New");
        assert_eq!(events[1].event_type, None);
        assert_eq!(events[1].year, 2023);
    }
}
