use std::cmp::Ordering;

use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq)]
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
    pub created_at: DateTime<Utc>,
}

/// An event that has not been assigned an id yet
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvent {
    pub event_name: String,
    pub event_type: Option<String>,
    pub origin_country: Option<String>,
    pub main_impact_country: Option<String>,
    pub relevant_exchange: Option<String>,
    pub month: String,
    pub year: i32,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl NewEvent {
    pub fn with_id(&self, id: i64) -> Event {
        Event {
            id,
            event_name: self.event_name.clone(),
            event_type: self.event_type.clone(),
            origin_country: self.origin_country.clone(),
            main_impact_country: self.main_impact_country.clone(),
            relevant_exchange: self.relevant_exchange.clone(),
            month: self.month.clone(),
            year: self.year,
            description: self.description.clone(),
            created_at: self.created_at,
        }
    }
}

impl Event {
    pub fn newest_first(a: &Event, b: &Event) -> Ordering {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    }
}
