//! # REST API Interface Layer
//!
//! HTTP endpoints for the events tracker. Handlers only extract JSON, map
//! DTOs to domain commands and translate domain errors into status codes;
//! every rule lives in the domain services.
//!
//! ## Key Responsibilities
//!
//! - **API Endpoints**: entries, dropdowns and events, plus an HTML index at `/`
//! - **Error Handling**: one `IntoResponse` impl turns `ServiceError` into
//!   `{"error": "..."}` with 400, 404 or 500
//! - **Request Logging**: every handler logs its method and path

pub mod dropdown_apis;
pub mod entry_apis;
pub mod error;
pub mod event_apis;
pub mod index_apis;
pub mod mappers;

pub use error::ApiError;
