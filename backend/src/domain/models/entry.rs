use std::cmp::Ordering;

use chrono::{NaiveDate, NaiveDateTime};

#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub id: String,
    pub date: NaiveDate,
    pub month: String,
    pub origin_country: String,
    pub main_impact_country: String,
    pub relevant_exchange: String,
    pub event_type: String,
    pub who_input: String,
    pub when_input: NaiveDateTime,
    pub details: String,
}

impl Entry {
    pub fn generate_id(now_millis: u64) -> String {
        now_millis.to_string()
    }

    /// Listing order shared by every backend: latest `when_input` first,
    /// then highest id
    pub fn newest_first(a: &Entry, b: &Entry) -> Ordering {
        b.when_input
            .cmp(&a.when_input)
            .then_with(|| b.id.cmp(&a.id))
    }
}
