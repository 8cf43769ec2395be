use serde::{Deserialize, Serialize};

pub mod entry_table;
pub mod timestamps;

pub use entry_table::*;
pub use timestamps::*;

/// Entry ID in format: epoch milliseconds at creation, e.g. "1718900000000"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub id: String,
    /// Calendar date of the business event (YYYY-MM-DD)
    pub date: String,
    pub month: String,
    pub origin_country: String,
    pub main_impact_country: String,
    pub relevant_exchange: String,
    pub event_type: String,
    /// Name of the person who logged the entry
    pub who_input: String,
    /// Timestamp the entry was logged (YYYY-MM-DDTHH:MM:SS)
    pub when_input: String,
    /// Free text description
    pub details: String,
}

/// Entry fields as sent by clients.
///
/// Used for both creation (every field required) and update (fields that are
/// absent keep their stored value).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntryFields {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub month: Option<String>,
    #[serde(default)]
    pub origin_country: Option<String>,
    #[serde(default)]
    pub main_impact_country: Option<String>,
    #[serde(default)]
    pub relevant_exchange: Option<String>,
    #[serde(default)]
    pub event_type: Option<String>,
    #[serde(default)]
    pub who_input: Option<String>,
    #[serde(default)]
    pub when_input: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteEntryResponse {
    pub success: bool,
}

/// Append-only event record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: i64,
    pub event_name: String,
    pub event_type: Option<String>,
    pub origin_country: Option<String>,
    pub main_impact_country: Option<String>,
    pub relevant_exchange: Option<String>,
    pub month: String,
    pub year: i32,
    pub description: String,
    /// Server-set creation time (RFC 3339, UTC)
    pub created_at: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateEventRequest {
    #[serde(default)]
    pub event_name: Option<String>,
    #[serde(default)]
    pub event_type: Option<String>,
    #[serde(default)]
    pub origin_country: Option<String>,
    #[serde(default)]
    pub main_impact_country: Option<String>,
    #[serde(default)]
    pub relevant_exchange: Option<String>,
    #[serde(default)]
    pub month: Option<String>,
    /// Browsers submit form numbers as strings, so both forms are accepted
    #[serde(default)]
    pub year: Option<YearInput>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Raw year value from a request body, either a JSON number or a string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum YearInput {
    Number(i64),
    Text(String),
}

/// All dropdown lists keyed the way entry forms address them.
///
/// `origin_country` and `main_impact_country` are both backed by the single
/// countries list, so they always carry the same values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DropdownsResponse {
    pub origin_country: Vec<String>,
    pub main_impact_country: Vec<String>,
    pub relevant_exchange: Vec<String>,
    pub event_type: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DropdownValueRequest {
    #[serde(default)]
    pub value: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReorderDropdownRequest {
    #[serde(default)]
    pub values: Vec<String>,
}

/// Body returned with every 4xx/5xx response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_event_request_accepts_numeric_and_string_year() {
        let numeric: CreateEventRequest =
            serde_json::from_str(r#"{"event_name":"IPO","year":2024}"#).unwrap();
        assert_eq!(numeric.year, Some(YearInput::Number(2024)));

        let text: CreateEventRequest =
            serde_json::from_str(r#"{"event_name":"IPO","year":"2024"}"#).unwrap();
        assert_eq!(text.year, Some(YearInput::Text("2024".to_string())));

        let missing: CreateEventRequest = serde_json::from_str(r#"{"event_name":"IPO"}"#).unwrap();
        assert_eq!(missing.year, None);
    }

    #[test]
    fn test_entry_fields_tolerate_partial_bodies() {
        let fields: EntryFields = serde_json::from_str(r#"{"details":"Updated"}"#).unwrap();
        assert_eq!(fields.details.as_deref(), Some("Updated"));
        assert!(fields.date.is_none());
        assert!(fields.when_input.is_none());
    }
}
