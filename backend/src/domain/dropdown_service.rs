use std::collections::HashSet;
use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::commands::dropdowns::{DropdownValueCommand, ReorderDropdownCommand};
use crate::domain::errors::{ServiceError, ServiceResult};
use crate::domain::models::{DropdownKey, DropdownList, DropdownLists};
use crate::storage::Storage;

/// Service for the ordered dropdown lists
#[derive(Clone)]
pub struct DropdownService {
    storage: Arc<dyn Storage>,
}

impl DropdownService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub async fn list_all(&self) -> ServiceResult<DropdownLists> {
        info!("Listing all dropdowns");
        Ok(DropdownLists {
            countries: self.storage.list_dropdown(DropdownList::Countries).await?,
            exchanges: self.storage.list_dropdown(DropdownList::Exchanges).await?,
            event_types: self.storage.list_dropdown(DropdownList::EventTypes).await?,
        })
    }

    /// Append a value; adding one that is already present returns the list unchanged
    pub async fn add_value(&self, command: DropdownValueCommand) -> ServiceResult<Vec<String>> {
        let key: DropdownKey = command.key.parse()?;
        let value = required_value(command.value)?;
        info!("Adding '{}' to {}", value, key.list());
        let values = self.storage.add_dropdown_value(key.list(), &value).await?;
        Ok(values)
    }

    pub async fn delete_value(&self, command: DropdownValueCommand) -> ServiceResult<Vec<String>> {
        let key: DropdownKey = command.key.parse()?;
        let value = required_value(command.value)?;
        info!("Removing '{}' from {}", value, key.list());
        match self.storage.delete_dropdown_value(key.list(), &value).await? {
            Some(remaining) => Ok(remaining),
            None => {
                warn!("Value '{}' not found in {}", value, key.list());
                Err(ServiceError::NotFound("Value not found".to_string()))
            }
        }
    }

    /// Store `values` as the new order and echo them back
    pub async fn reorder(&self, command: ReorderDropdownCommand) -> ServiceResult<Vec<String>> {
        let key: DropdownKey = command.key.parse()?;
        let mut seen = HashSet::new();
        if let Some(duplicate) = command.values.iter().find(|v| !seen.insert(v.as_str())) {
            return Err(ServiceError::Validation(format!(
                "Duplicate value in reorder request: {}",
                duplicate
            )));
        }

        info!("Reordering {} ({} values)", key.list(), command.values.len());
        self.storage
            .reorder_dropdown(key.list(), &command.values)
            .await?;
        Ok(command.values)
    }
}

fn required_value(value: Option<String>) -> ServiceResult<String> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ServiceError::Validation("Value is required".to_string())),
    }
}
