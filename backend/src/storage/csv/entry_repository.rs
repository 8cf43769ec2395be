use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shared::timestamps::{format_entry_date, format_when_input, parse_entry_date, parse_when_input};
use tracing::warn;

use super::CsvStorage;
use crate::domain::models::Entry;
use crate::storage::{EntryStorage, StorageError, StorageResult};

/// One line of data.csv, kept as text so that rewrites never touch other rows
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(super) struct EntryRow {
    pub id: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub month: String,
    #[serde(default)]
    pub origin_country: String,
    #[serde(default)]
    pub main_impact_country: String,
    #[serde(default)]
    pub relevant_exchange: String,
    #[serde(default)]
    pub event_type: String,
    #[serde(default)]
    pub who_input: String,
    #[serde(default)]
    pub when_input: String,
    #[serde(default)]
    pub details: String,
}

impl From<&Entry> for EntryRow {
    fn from(entry: &Entry) -> Self {
        Self {
            id: entry.id.clone(),
            date: format_entry_date(entry.date),
            month: entry.month.clone(),
            origin_country: entry.origin_country.clone(),
            main_impact_country: entry.main_impact_country.clone(),
            relevant_exchange: entry.relevant_exchange.clone(),
            event_type: entry.event_type.clone(),
            who_input: entry.who_input.clone(),
            when_input: format_when_input(entry.when_input),
            details: entry.details.clone(),
        }
    }
}

impl TryFrom<EntryRow> for Entry {
    type Error = StorageError;

    fn try_from(row: EntryRow) -> Result<Self, Self::Error> {
        let malformed = |reason: String| StorageError::Malformed {
            file: "data.csv".to_string(),
            reason,
        };
        let date = parse_entry_date(&row.date)
            .ok_or_else(|| malformed(format!("entry {} has invalid date '{}'", row.id, row.date)))?;
        let when_input = parse_when_input(&row.when_input).ok_or_else(|| {
            malformed(format!(
                "entry {} has invalid when_input '{}'",
                row.id, row.when_input
            ))
        })?;
        Ok(Entry {
            id: row.id,
            date,
            month: row.month,
            origin_country: row.origin_country,
            main_impact_country: row.main_impact_country,
            relevant_exchange: row.relevant_exchange,
            event_type: row.event_type,
            who_input: row.who_input,
            when_input,
            details: row.details,
        })
    }
}

/// Rows whose values do not parse are skipped with a warning; they stay in
/// the file untouched and can still be deleted by id
fn readable_entry(row: EntryRow) -> Option<Entry> {
    match Entry::try_from(row) {
        Ok(entry) => Some(entry),
        Err(e) => {
            warn!("Skipping unreadable row: {}", e);
            None
        }
    }
}

#[async_trait]
impl EntryStorage for CsvStorage {
    async fn list_entries(&self) -> StorageResult<Vec<Entry>> {
        let rows: Vec<EntryRow> = self.connection.entries().read_rows()?;
        let mut entries: Vec<Entry> = rows.into_iter().filter_map(readable_entry).collect();
        entries.sort_by(Entry::newest_first);
        Ok(entries)
    }

    async fn get_entry(&self, entry_id: &str) -> StorageResult<Option<Entry>> {
        let rows: Vec<EntryRow> = self.connection.entries().read_rows()?;
        Ok(rows
            .into_iter()
            .find(|row| row.id == entry_id)
            .and_then(readable_entry))
    }

    async fn store_entry(&self, entry: &Entry) -> StorageResult<()> {
        let file = self.connection.entries();
        let _guard = file.lock().await;
        let mut rows: Vec<EntryRow> = file.read_rows()?;
        rows.push(EntryRow::from(entry));
        file.write_rows(&rows)
    }

    async fn update_entry(&self, entry: &Entry) -> StorageResult<bool> {
        let file = self.connection.entries();
        let _guard = file.lock().await;
        let mut rows: Vec<EntryRow> = file.read_rows()?;
        match rows.iter_mut().find(|row| row.id == entry.id) {
            Some(row) => *row = EntryRow::from(entry),
            None => return Ok(false),
        }
        file.write_rows(&rows)?;
        Ok(true)
    }

    async fn delete_entry(&self, entry_id: &str) -> StorageResult<bool> {
        let file = self.connection.entries();
        let _guard = file.lock().await;
        let mut rows: Vec<EntryRow> = file.read_rows()?;
        let before = rows.len();
        rows.retain(|row| row.id != entry_id);
        if rows.len() == before {
            return Ok(false);
        }
        file.write_rows(&rows)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::sync::Arc;

    use super::*;
    use crate::storage::test_utils::TestEnvironment;
    use chrono::NaiveDate;

    fn entry(id: &str, details: &str) -> Entry {
        Entry {
            id: id.to_string(),
            date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            month: "May".to_string(),
            origin_country: "Japan".to_string(),
            main_impact_country: "USA".to_string(),
            relevant_exchange: "TSE".to_string(),
            event_type: "IPO".to_string(),
            who_input: "analyst".to_string(),
            when_input: NaiveDate::from_ymd_opt(2024, 5, 1)
                .unwrap()
                .and_hms_opt(8, 0, 0)
                .unwrap(),
            details: details.to_string(),
        }
    }

    #[tokio::test]
    async fn test_rows_written_by_other_tools_are_readable() {
        let env = TestEnvironment::new().await;
        fs::write(
            &env.csv_paths.entries,
            "id,date,month,origin_country,main_impact_country,relevant_exchange,event_type,who_input,when_input,details\n\
             1700000000000,2023-11-14,November,USA,UK,LSE,Merger,ops,2023-11-14T22:13:20.000Z,\"Big, merger\"\n",
        )
        .unwrap();

        let entries = env.csv.list_entries().await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].details, "Big, merger");
        assert_eq!(
            entries[0].when_input,
            NaiveDate::from_ymd_opt(2023, 11, 14)
                .unwrap()
                .and_hms_opt(22, 13, 20)
                .unwrap()
        );
    }

    #[test]
    fn test_invalid_date_is_reported_as_malformed() {
        let mut row = EntryRow::from(&entry("1", "x"));
        row.date = "not-a-date".to_string();
        let err = Entry::try_from(row).unwrap_err();
        assert!(matches!(err, StorageError::Malformed { .. }));
    }

    #[tokio::test]
    async fn test_unreadable_row_does_not_hide_the_others() {
        let env = TestEnvironment::new().await;
        fs::write(
            &env.csv_paths.entries,
            "id,date,month,origin_country,main_impact_country,relevant_exchange,event_type,who_input,when_input,details\n\
             1,2024-02-15,February,USA,China,NYSE,IPO,ops,2024-02-15T10:30:00,good\n\
             2,Feb 15 2024,February,USA,China,NYSE,IPO,ops,2024-02-15T11:00:00,bad\n",
        )
        .unwrap();

        let entries = env.csv.list_entries().await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, "1");
        assert!(env.csv.get_entry("2").await.unwrap().is_none());

        // The unreadable row is kept on rewrite and can still be removed
        env.csv.store_entry(&entry("3", "new")).await.unwrap();
        let content = fs::read_to_string(&env.csv_paths.entries).unwrap();
        assert!(content.contains("Feb 15 2024"));
        assert!(env.csv.delete_entry("2").await.unwrap());
        assert_eq!(env.csv.list_entries().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_writers_do_not_lose_rows() {
        let env = TestEnvironment::new().await;
        let storage = Arc::new(env.open_csv());

        let mut handles = Vec::new();
        for i in 0..20 {
            let storage = storage.clone();
            handles.push(tokio::spawn(async move {
                storage
                    .store_entry(&entry(&format!("{}", 2000 + i), "parallel"))
                    .await
                    .unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(storage.list_entries().await.unwrap().len(), 20);
    }
}
