//! Domain-level command types.
//!
//! Services accept these instead of the wire DTOs from the `shared` crate;
//! the REST layer does the mapping. Every field is optional so that the
//! services, not the JSON extractor, decide what is missing.

pub mod entries {
    /// Field values for creating or updating an entry.
    #[derive(Debug, Clone, Default)]
    pub struct EntryFieldsCommand {
        pub date: Option<String>,
        pub month: Option<String>,
        pub origin_country: Option<String>,
        pub main_impact_country: Option<String>,
        pub relevant_exchange: Option<String>,
        pub event_type: Option<String>,
        pub who_input: Option<String>,
        pub when_input: Option<String>,
        pub details: Option<String>,
    }

    impl EntryFieldsCommand {
        /// Each field paired with its wire name, in the order error messages list them
        pub fn named_fields(&self) -> [(&'static str, Option<&str>); 9] {
            [
                ("date", self.date.as_deref()),
                ("month", self.month.as_deref()),
                ("origin_country", self.origin_country.as_deref()),
                ("main_impact_country", self.main_impact_country.as_deref()),
                ("relevant_exchange", self.relevant_exchange.as_deref()),
                ("event_type", self.event_type.as_deref()),
                ("who_input", self.who_input.as_deref()),
                ("when_input", self.when_input.as_deref()),
                ("details", self.details.as_deref()),
            ]
        }
    }
}

pub mod dropdowns {
    #[derive(Debug, Clone)]
    pub struct DropdownValueCommand {
        pub key: String,
        pub value: Option<String>,
    }

    #[derive(Debug, Clone)]
    pub struct ReorderDropdownCommand {
        pub key: String,
        pub values: Vec<String>,
    }
}

pub mod events {
    #[derive(Debug, Clone, Default)]
    pub struct CreateEventCommand {
        pub event_name: Option<String>,
        pub event_type: Option<String>,
        pub origin_country: Option<String>,
        pub main_impact_country: Option<String>,
        pub relevant_exchange: Option<String>,
        pub month: Option<String>,
        /// Raw year text; parsed by the event service
        pub year: Option<String>,
        pub description: Option<String>,
    }
}
