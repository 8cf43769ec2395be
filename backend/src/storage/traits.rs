//! # Storage Traits
//!
//! The storage abstraction that lets CSV files, SQLite and PostgreSQL be used
//! interchangeably by the domain layer. All three implementations must show
//! identical externally observable behaviour: the same ordering, the same
//! idempotency rules and the same all-or-nothing reorder.

use async_trait::async_trait;

use super::{StorageKind, StorageResult};
use crate::domain::models::{DropdownList, Entry, Event, NewEvent};

#[async_trait]
pub trait EntryStorage: Send + Sync {
    /// Entries newest first by `when_input`, ties by id descending
    async fn list_entries(&self) -> StorageResult<Vec<Entry>>;

    async fn get_entry(&self, entry_id: &str) -> StorageResult<Option<Entry>>;

    async fn store_entry(&self, entry: &Entry) -> StorageResult<()>;

    /// Overwrite every field of the entry with the same id.
    /// Returns false if no such entry exists.
    async fn update_entry(&self, entry: &Entry) -> StorageResult<bool>;

    /// Returns false if no such entry exists
    async fn delete_entry(&self, entry_id: &str) -> StorageResult<bool>;
}

#[async_trait]
pub trait DropdownStorage: Send + Sync {
    /// Values ascending by `order_index`. Appends never produce equal
    /// indexes; ties in externally written data break by insertion order in
    /// SQLite, file order in CSV and by value in PostgreSQL.
    async fn list_dropdown(&self, list: DropdownList) -> StorageResult<Vec<String>>;

    /// Append `value` after the current maximum `order_index`.
    /// A value that is already present leaves the list untouched.
    async fn add_dropdown_value(&self, list: DropdownList, value: &str)
        -> StorageResult<Vec<String>>;

    /// Returns the remaining values, or None if `value` was not in the list
    async fn delete_dropdown_value(
        &self,
        list: DropdownList,
        value: &str,
    ) -> StorageResult<Option<Vec<String>>>;

    /// Give each value its position as `order_index`, all or nothing.
    /// Fails with `StorageError::Mismatch` unless `values` is a permutation
    /// of the stored list.
    async fn reorder_dropdown(&self, list: DropdownList, values: &[String]) -> StorageResult<()>;
}

#[async_trait]
pub trait EventStorage: Send + Sync {
    async fn store_event(&self, event: &NewEvent) -> StorageResult<Event>;

    /// Events newest first by `created_at`, ties by id descending
    async fn list_events(&self) -> StorageResult<Vec<Event>>;
}

/// A complete storage backend, opened once at startup
#[async_trait]
pub trait Storage: EntryStorage + DropdownStorage + EventStorage {
    fn kind(&self) -> StorageKind;

    /// Human readable `(label, location)` pairs for the API index page
    fn locations(&self) -> Vec<(String, String)>;

    /// Release connections; the storage must not be used afterwards
    async fn close(&self);
}

/// Reject a reorder request that is not a permutation of `current`
pub(crate) fn check_permutation(current: &[String], requested: &[String]) -> StorageResult<()> {
    let mut current_sorted: Vec<&String> = current.iter().collect();
    let mut requested_sorted: Vec<&String> = requested.iter().collect();
    current_sorted.sort();
    requested_sorted.sort();
    if current_sorted != requested_sorted {
        return Err(super::StorageError::Mismatch(
            "Reorder values must contain exactly the current list values".to_string(),
        ));
    }
    Ok(())
}
