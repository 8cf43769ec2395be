//! # REST API for Events

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use shared::CreateEventRequest;
use tracing::{error, info};

use super::error::ApiError;
use super::mappers::EventMapper;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_events).post(create_event))
}

pub async fn create_event(
    State(state): State<AppState>,
    Json(request): Json<CreateEventRequest>,
) -> impl IntoResponse {
    info!("POST /events");

    let command = EventMapper::to_command(request);
    match state.event_service.create_event(command).await {
        Ok(event) => (StatusCode::OK, Json(EventMapper::to_dto(event))).into_response(),
        Err(e) => {
            error!("Failed to create event: {}", e);
            ApiError::from(e).into_response()
        }
    }
}

pub async fn list_events(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /events");

    match state.event_service.list_events().await {
        Ok(events) => (StatusCode::OK, Json(EventMapper::to_dto_list(events))).into_response(),
        Err(e) => {
            error!("Failed to list events: {}", e);
            ApiError::from(e).into_response()
        }
    }
}
