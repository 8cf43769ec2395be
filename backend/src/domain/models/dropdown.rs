use std::fmt;
use std::str::FromStr;

use crate::domain::errors::ServiceError;

/// A stored dropdown list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DropdownList {
    Countries,
    Exchanges,
    EventTypes,
}

impl DropdownList {
    pub const ALL: [DropdownList; 3] = [
        DropdownList::Countries,
        DropdownList::Exchanges,
        DropdownList::EventTypes,
    ];

    /// Table name in SQL backends, also the CSV file stem
    pub fn table_name(&self) -> &'static str {
        match self {
            DropdownList::Countries => "countries",
            DropdownList::Exchanges => "exchanges",
            DropdownList::EventTypes => "event_types",
        }
    }
}

impl fmt::Display for DropdownList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table_name())
    }
}

/// The keys clients use to address dropdown lists.
///
/// Two keys share the countries list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropdownKey {
    OriginCountry,
    MainImpactCountry,
    RelevantExchange,
    EventType,
}

impl DropdownKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            DropdownKey::OriginCountry => "origin_country",
            DropdownKey::MainImpactCountry => "main_impact_country",
            DropdownKey::RelevantExchange => "relevant_exchange",
            DropdownKey::EventType => "event_type",
        }
    }

    pub fn list(&self) -> DropdownList {
        match self {
            DropdownKey::OriginCountry | DropdownKey::MainImpactCountry => DropdownList::Countries,
            DropdownKey::RelevantExchange => DropdownList::Exchanges,
            DropdownKey::EventType => DropdownList::EventTypes,
        }
    }
}

impl FromStr for DropdownKey {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "origin_country" => Ok(DropdownKey::OriginCountry),
            "main_impact_country" => Ok(DropdownKey::MainImpactCountry),
            "relevant_exchange" => Ok(DropdownKey::RelevantExchange),
            "event_type" => Ok(DropdownKey::EventType),
            _ => Err(ServiceError::Validation("Invalid dropdown key".to_string())),
        }
    }
}

/// Every dropdown list, ordered by `order_index`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DropdownLists {
    pub countries: Vec<String>,
    pub exchanges: Vec<String>,
    pub event_types: Vec<String>,
}
