//! # REST API for Dropdowns
//!
//! Endpoints for reading and maintaining the ordered dropdown lists. The
//! `:key` segment is one of `origin_country`, `main_impact_country`,
//! `relevant_exchange` or `event_type`.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post, put},
    Router,
};
use shared::{DropdownValueRequest, ReorderDropdownRequest};
use tracing::{error, info};

use super::error::ApiError;
use super::mappers::DropdownMapper;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_dropdowns))
        .route("/:key", post(add_dropdown_value).delete(delete_dropdown_value))
        .route("/:key/reorder", put(reorder_dropdown))
}

pub async fn list_dropdowns(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /dropdowns");

    match state.dropdown_service.list_all().await {
        Ok(lists) => (StatusCode::OK, Json(DropdownMapper::to_dto(lists))).into_response(),
        Err(e) => {
            error!("Failed to list dropdowns: {}", e);
            ApiError::from(e).into_response()
        }
    }
}

pub async fn add_dropdown_value(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(request): Json<DropdownValueRequest>,
) -> impl IntoResponse {
    info!("POST /dropdowns/{}", key);

    let command = DropdownMapper::to_value_command(key, request);
    match state.dropdown_service.add_value(command).await {
        Ok(values) => (StatusCode::OK, Json(values)).into_response(),
        Err(e) => {
            error!("Failed to add dropdown value: {}", e);
            ApiError::from(e).into_response()
        }
    }
}

pub async fn delete_dropdown_value(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(request): Json<DropdownValueRequest>,
) -> impl IntoResponse {
    info!("DELETE /dropdowns/{}", key);

    let command = DropdownMapper::to_value_command(key, request);
    match state.dropdown_service.delete_value(command).await {
        Ok(values) => (StatusCode::OK, Json(values)).into_response(),
        Err(e) => {
            error!("Failed to delete dropdown value: {}", e);
            ApiError::from(e).into_response()
        }
    }
}

pub async fn reorder_dropdown(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(request): Json<ReorderDropdownRequest>,
) -> impl IntoResponse {
    info!("PUT /dropdowns/{}/reorder", key);

    let command = DropdownMapper::to_reorder_command(key, request);
    match state.dropdown_service.reorder(command).await {
        Ok(values) => (StatusCode::OK, Json(values)).into_response(),
        Err(e) => {
            error!("Failed to reorder dropdown: {}", e);
            ApiError::from(e).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{csv_state, sqlite_state};
    use axum::{
        body::Body,
        http::{Method, Request},
    };
    use serde_json::{json, Value};
    use shared::{DropdownsResponse, ErrorResponse};
    use tempfile::TempDir;
    use tower::util::ServiceExt; // for `oneshot`

    fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    async fn add(app: &Router, key: &str, value: &str) -> (StatusCode, Value) {
        let response = app
            .clone()
            .oneshot(json_request(
                Method::POST,
                &format!("/{}", key),
                json!({ "value": value }),
            ))
            .await
            .unwrap();
        let status = response.status();
        (status, body_json(response).await)
    }

    #[tokio::test]
    async fn test_adding_twice_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let app = router().with_state(csv_state(temp_dir.path()));

        add(&app, "event_type", "IPO").await;
        let (status, first) = add(&app, "event_type", "Merger").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(first, json!(["IPO", "Merger"]));

        let (_, second) = add(&app, "event_type", "Merger").await;
        assert_eq!(second, first);
    }

    #[tokio::test]
    async fn test_country_keys_share_values() {
        let app = router().with_state(sqlite_state().await);
        add(&app, "origin_country", "USA").await;
        add(&app, "relevant_exchange", "NYSE").await;

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let lists: DropdownsResponse = body_json(response).await;
        assert_eq!(lists.origin_country, vec!["USA"]);
        assert_eq!(lists.main_impact_country, vec!["USA"]);
        assert_eq!(lists.relevant_exchange, vec!["NYSE"]);
        assert!(lists.event_type.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_key_is_400() {
        let app = router().with_state(sqlite_state().await);
        let (status, body) = add(&app, "planet", "Mars").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Invalid dropdown key"}));
    }

    #[tokio::test]
    async fn test_delete_and_reorder() {
        let app = router().with_state(sqlite_state().await);
        for value in ["NYSE", "LSE", "TSE"] {
            add(&app, "relevant_exchange", value).await;
        }

        let response = app
            .clone()
            .oneshot(json_request(
                Method::DELETE,
                "/relevant_exchange",
                json!({"value": "LSE"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let remaining: Vec<String> = body_json(response).await;
        assert_eq!(remaining, vec!["NYSE", "TSE"]);

        let response = app
            .clone()
            .oneshot(json_request(
                Method::DELETE,
                "/relevant_exchange",
                json!({"value": "LSE"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let error: ErrorResponse = body_json(response).await;
        assert_eq!(error.error, "Value not found");

        let response = app
            .clone()
            .oneshot(json_request(
                Method::PUT,
                "/relevant_exchange/reorder",
                json!({"values": ["TSE", "NYSE"]}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let echoed: Vec<String> = body_json(response).await;
        assert_eq!(echoed, vec!["TSE", "NYSE"]);

        let response = app
            .oneshot(json_request(
                Method::PUT,
                "/relevant_exchange/reorder",
                json!({"values": ["TSE"]}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
