//! # Domain Module
//!
//! Business rules for the events tracker, independent of HTTP and of the
//! storage backend in use.
//!
//! ## Module Organization
//!
//! - **entry_service**: entry validation, id generation, merge-on-update
//! - **dropdown_service**: dropdown key resolution and list maintenance
//! - **event_service**: event validation and year parsing
//! - **commands**: the inputs the services accept
//! - **models**: the typed records the storage layer reads and writes
//!
//! ## Business Rules
//!
//! - Every entry field is required on create; blank counts as missing
//! - `origin_country` and `main_impact_country` share the countries list
//! - Dropdown values are unique per list; re-adding one is a no-op
//! - Events are append-only

pub mod commands;
pub mod dropdown_service;
pub mod entry_service;
pub mod errors;
pub mod event_service;
pub mod models;

pub use dropdown_service::DropdownService;
pub use entry_service::EntryService;
pub use errors::{ServiceError, ServiceResult};
pub use event_service::EventService;
