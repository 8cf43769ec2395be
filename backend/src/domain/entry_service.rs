use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use shared::timestamps::{parse_entry_date, parse_when_input};
use tracing::{info, warn};

use crate::domain::commands::entries::EntryFieldsCommand;
use crate::domain::errors::{ServiceError, ServiceResult};
use crate::domain::models::Entry;
use crate::storage::Storage;

/// Service for the entries shown in the main table
#[derive(Clone)]
pub struct EntryService {
    storage: Arc<dyn Storage>,
    last_id: Arc<AtomicU64>,
}

impl EntryService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage,
            last_id: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Epoch milliseconds, bumped past the previous id when two creates land
    /// in the same millisecond
    fn next_id(&self) -> String {
        let now = Utc::now().timestamp_millis().max(0) as u64;
        let previous = self
            .last_id
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now.max(last + 1))
            })
            .unwrap_or(now);
        Entry::generate_id(now.max(previous + 1))
    }

    pub async fn list_entries(&self) -> ServiceResult<Vec<Entry>> {
        info!("Listing entries");
        let entries = self.storage.list_entries().await?;
        info!("Found {} entries", entries.len());
        Ok(entries)
    }

    pub async fn create_entry(&self, command: EntryFieldsCommand) -> ServiceResult<Entry> {
        let missing: Vec<&str> = command
            .named_fields()
            .into_iter()
            .filter(|(_, value)| value.map_or(true, |v| v.trim().is_empty()))
            .map(|(name, _)| name)
            .collect();
        if !missing.is_empty() {
            return Err(ServiceError::Validation(format!(
                "Missing required fields: {}",
                missing.join(", ")
            )));
        }

        let field = |value: Option<String>| value.unwrap_or_default().trim().to_string();
        let entry = Entry {
            id: self.next_id(),
            date: parse_date(command.date.as_deref().unwrap_or_default())?,
            month: field(command.month),
            origin_country: field(command.origin_country),
            main_impact_country: field(command.main_impact_country),
            relevant_exchange: field(command.relevant_exchange),
            event_type: field(command.event_type),
            who_input: field(command.who_input),
            when_input: parse_timestamp(command.when_input.as_deref().unwrap_or_default())?,
            details: field(command.details),
        };

        self.storage.store_entry(&entry).await?;
        info!("Created entry {}", entry.id);
        Ok(entry)
    }

    /// Merge the provided fields over the stored entry and write it back whole
    pub async fn update_entry(
        &self,
        entry_id: &str,
        command: EntryFieldsCommand,
    ) -> ServiceResult<Entry> {
        info!("Updating entry {}", entry_id);
        let mut entry = self
            .storage
            .get_entry(entry_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Entry not found".to_string()))?;

        let blank: Vec<&str> = command
            .named_fields()
            .into_iter()
            .filter(|(_, value)| value.is_some_and(|v| v.trim().is_empty()))
            .map(|(name, _)| name)
            .collect();
        if !blank.is_empty() {
            return Err(ServiceError::Validation(format!(
                "Fields cannot be blank: {}",
                blank.join(", ")
            )));
        }

        if let Some(date) = command.date.as_deref() {
            entry.date = parse_date(date)?;
        }
        if let Some(when_input) = command.when_input.as_deref() {
            entry.when_input = parse_timestamp(when_input)?;
        }
        let text_fields = [
            (&mut entry.month, command.month),
            (&mut entry.origin_country, command.origin_country),
            (&mut entry.main_impact_country, command.main_impact_country),
            (&mut entry.relevant_exchange, command.relevant_exchange),
            (&mut entry.event_type, command.event_type),
            (&mut entry.who_input, command.who_input),
            (&mut entry.details, command.details),
        ];
        for (slot, value) in text_fields {
            if let Some(value) = value {
                *slot = value.trim().to_string();
            }
        }

        if !self.storage.update_entry(&entry).await? {
            // Deleted between the read and the write
            warn!("Entry {} disappeared during update", entry_id);
            return Err(ServiceError::NotFound("Entry not found".to_string()));
        }
        info!("Updated entry {}", entry_id);
        Ok(entry)
    }

    pub async fn delete_entry(&self, entry_id: &str) -> ServiceResult<()> {
        info!("Deleting entry {}", entry_id);
        if !self.storage.delete_entry(entry_id).await? {
            warn!("Entry not found: {}", entry_id);
            return Err(ServiceError::NotFound("Entry not found".to_string()));
        }
        Ok(())
    }
}

fn parse_date(value: &str) -> ServiceResult<chrono::NaiveDate> {
    parse_entry_date(value).ok_or_else(|| {
        ServiceError::Validation(format!("Invalid date '{}': expected YYYY-MM-DD", value.trim()))
    })
}

fn parse_timestamp(value: &str) -> ServiceResult<chrono::NaiveDateTime> {
    parse_when_input(value).ok_or_else(|| {
        ServiceError::Validation(format!(
            "Invalid when_input '{}': expected an ISO 8601 timestamp",
            value.trim()
        ))
    })
}
