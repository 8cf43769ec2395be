//! # REST API for Entries
//!
//! Endpoints for listing, creating, updating and deleting entries.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, put},
    Router,
};
use shared::{DeleteEntryResponse, EntryFields};
use tracing::{error, info};

use super::error::ApiError;
use super::mappers::EntryMapper;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_entries).post(create_entry))
        .route("/:id", put(update_entry).delete(delete_entry))
}

/// List every entry, newest first
pub async fn list_entries(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /entries");

    match state.entry_service.list_entries().await {
        Ok(entries) => (StatusCode::OK, Json(EntryMapper::to_dto_list(entries))).into_response(),
        Err(e) => {
            error!("Failed to list entries: {}", e);
            ApiError::from(e).into_response()
        }
    }
}

pub async fn create_entry(
    State(state): State<AppState>,
    Json(request): Json<EntryFields>,
) -> impl IntoResponse {
    info!("POST /entries");

    let command = EntryMapper::to_command(request);
    match state.entry_service.create_entry(command).await {
        Ok(entry) => (StatusCode::OK, Json(EntryMapper::to_dto(entry))).into_response(),
        Err(e) => {
            error!("Failed to create entry: {}", e);
            ApiError::from(e).into_response()
        }
    }
}

pub async fn update_entry(
    State(state): State<AppState>,
    Path(entry_id): Path<String>,
    Json(request): Json<EntryFields>,
) -> impl IntoResponse {
    info!("PUT /entries/{}", entry_id);

    let command = EntryMapper::to_command(request);
    match state.entry_service.update_entry(&entry_id, command).await {
        Ok(entry) => (StatusCode::OK, Json(EntryMapper::to_dto(entry))).into_response(),
        Err(e) => {
            error!("Failed to update entry {}: {}", entry_id, e);
            ApiError::from(e).into_response()
        }
    }
}

pub async fn delete_entry(
    State(state): State<AppState>,
    Path(entry_id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /entries/{}", entry_id);

    match state.entry_service.delete_entry(&entry_id).await {
        Ok(()) => (StatusCode::OK, Json(DeleteEntryResponse { success: true })).into_response(),
        Err(e) => {
            error!("Failed to delete entry {}: {}", entry_id, e);
            ApiError::from(e).into_response()
        }
    }
}
