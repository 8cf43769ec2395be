use std::sync::Arc;

use chrono::{SubsecRound, Utc};
use tracing::info;

use crate::domain::commands::events::CreateEventCommand;
use crate::domain::errors::{ServiceError, ServiceResult};
use crate::domain::models::{Event, NewEvent};
use crate::storage::Storage;

/// Service for the append-only events log
#[derive(Clone)]
pub struct EventService {
    storage: Arc<dyn Storage>,
}

impl EventService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub async fn create_event(&self, command: CreateEventCommand) -> ServiceResult<Event> {
        let required = [
            ("event_name", command.event_name.as_deref()),
            ("month", command.month.as_deref()),
            ("year", command.year.as_deref()),
            ("description", command.description.as_deref()),
        ];
        let missing: Vec<&str> = required
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

        let year_text = command.year.unwrap_or_default();
        let year: i32 = year_text.trim().parse().map_err(|_| {
            ServiceError::Validation(format!("Invalid year '{}': expected an integer", year_text.trim()))
        })?;

        let event = NewEvent {
            event_name: trimmed(command.event_name),
            event_type: optional(command.event_type),
            origin_country: optional(command.origin_country),
            main_impact_country: optional(command.main_impact_country),
            relevant_exchange: optional(command.relevant_exchange),
            month: trimmed(command.month),
            year,
            description: trimmed(command.description),
            // Microseconds are the finest precision every backend stores
            created_at: Utc::now().trunc_subsecs(6),
        };

        let stored = self.storage.store_event(&event).await?;
        info!("Created event {} ({})", stored.id, stored.event_name);
        Ok(stored)
    }

    pub async fn list_events(&self) -> ServiceResult<Vec<Event>> {
        info!("Listing events");
        let events = self.storage.list_events().await?;
        info!("Found {} events", events.len());
        Ok(events)
    }
}

fn trimmed(value: Option<String>) -> String {
    value.unwrap_or_default().trim().to_string()
}

/// Blank optional references are stored as absent
fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
