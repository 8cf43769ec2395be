use std::collections::HashSet;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::CsvStorage;
use crate::domain::models::DropdownList;
use crate::storage::traits::check_permutation;
use crate::storage::{DropdownStorage, StorageResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(super) struct DropdownRow {
    pub value: String,
    /// Rows with a missing or unparsable index sort last, in file order
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub order_index: Option<i64>,
}

/// A value listed twice in the file appears once, at its first position
fn ordered_values(mut rows: Vec<DropdownRow>) -> Vec<String> {
    // sort_by_key is stable, so ties keep their file order
    rows.sort_by_key(|row| row.order_index.unwrap_or(i64::MAX));
    let mut seen = HashSet::new();
    rows.into_iter()
        .map(|row| row.value)
        .filter(|value| seen.insert(value.clone()))
        .collect()
}

#[async_trait]
impl DropdownStorage for CsvStorage {
    async fn list_dropdown(&self, list: DropdownList) -> StorageResult<Vec<String>> {
        let rows: Vec<DropdownRow> = self.connection.dropdown(list).read_rows()?;
        Ok(ordered_values(rows))
    }

    async fn add_dropdown_value(
        &self,
        list: DropdownList,
        value: &str,
    ) -> StorageResult<Vec<String>> {
        let file = self.connection.dropdown(list);
        let _guard = file.lock().await;
        let mut rows: Vec<DropdownRow> = file.read_rows()?;
        if !rows.iter().any(|row| row.value == value) {
            let next_index = rows
                .iter()
                .filter_map(|row| row.order_index)
                .max()
                .map_or(0, |max| max + 1);
            rows.push(DropdownRow {
                value: value.to_string(),
                order_index: Some(next_index),
            });
            file.write_rows(&rows)?;
        }
        Ok(ordered_values(rows))
    }

    async fn delete_dropdown_value(
        &self,
        list: DropdownList,
        value: &str,
    ) -> StorageResult<Option<Vec<String>>> {
        let file = self.connection.dropdown(list);
        let _guard = file.lock().await;
        let mut rows: Vec<DropdownRow> = file.read_rows()?;
        let before = rows.len();
        rows.retain(|row| row.value != value);
        if rows.len() == before {
            return Ok(None);
        }
        file.write_rows(&rows)?;
        Ok(Some(ordered_values(rows)))
    }

    async fn reorder_dropdown(&self, list: DropdownList, values: &[String]) -> StorageResult<()> {
        let file = self.connection.dropdown(list);
        let _guard = file.lock().await;
        let rows: Vec<DropdownRow> = file.read_rows()?;
        check_permutation(&ordered_values(rows), values)?;

        let reordered: Vec<DropdownRow> = values
            .iter()
            .enumerate()
            .map(|(index, value)| DropdownRow {
                value: value.clone(),
                order_index: Some(index as i64),
            })
            .collect();
        file.write_rows(&reordered)
    }
}
