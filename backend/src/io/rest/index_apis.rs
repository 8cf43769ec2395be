//! # API Index
//!
//! Plain HTML page at `/` listing the endpoints and where the active
//! storage backend keeps its data.

use std::fmt::Write;

use axum::{extract::State, response::Html, routing::get, Router};
use tracing::info;

use crate::AppState;

const ENDPOINTS: [(&str, &str); 11] = [
    ("GET /", "This API documentation"),
    ("GET /entries", "Retrieve all entries"),
    ("POST /entries", "Create a new entry"),
    ("PUT /entries/:id", "Update an entry by id"),
    ("DELETE /entries/:id", "Delete an entry by id"),
    ("GET /dropdowns", "Retrieve all dropdown lists"),
    ("POST /dropdowns/:key", "Add a new dropdown value for a given key"),
    ("DELETE /dropdowns/:key", "Remove a dropdown value for a given key"),
    ("PUT /dropdowns/:key/reorder", "Reorder dropdown values for a given key"),
    ("POST /events", "Create a new event"),
    ("GET /events", "Retrieve all events"),
];

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(api_index))
}

pub async fn api_index(State(state): State<AppState>) -> Html<String> {
    info!("GET /");
    Html(render_index(
        &state.storage.kind().to_string(),
        &state.storage.locations(),
    ))
}

fn render_index(storage_kind: &str, locations: &[(String, String)]) -> String {
    let mut page = String::new();
    page.push_str("<html>\n  <head><title>Events Tracker API</title></head>\n  <body>\n");
    page.push_str("    <h1>Events Tracker API</h1>\n    <h2>Available Endpoints:</h2>\n    <ul>\n");
    for (endpoint, description) in ENDPOINTS {
        let _ = writeln!(
            page,
            "      <li><strong>{}</strong> - {}</li>",
            escape_html(endpoint),
            escape_html(description)
        );
    }
    page.push_str("    </ul>\n");
    let _ = writeln!(
        page,
        "    <p>Storage backend: <strong>{}</strong></p>\n    <ul>",
        escape_html(storage_kind)
    );
    for (label, location) in locations {
        let _ = writeln!(
            page,
            "      <li>{}: {}</li>",
            escape_html(label),
            escape_html(location)
        );
    }
    page.push_str("    </ul>\n  </body>\n</html>\n");
    page
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
