use shared::timestamps::{format_entry_date, format_when_input};
use shared::{Entry as SharedEntry, EntryFields};

use crate::domain::commands::entries::EntryFieldsCommand;
use crate::domain::models::Entry as DomainEntry;

/// Mapper between the shared Entry DTOs and the domain Entry model
pub struct EntryMapper;

impl EntryMapper {
    pub fn to_dto(domain: DomainEntry) -> SharedEntry {
        SharedEntry {
            id: domain.id,
            date: format_entry_date(domain.date),
            month: domain.month,
            origin_country: domain.origin_country,
            main_impact_country: domain.main_impact_country,
            relevant_exchange: domain.relevant_exchange,
            event_type: domain.event_type,
            who_input: domain.who_input,
            when_input: format_when_input(domain.when_input),
            details: domain.details,
        }
    }

    pub fn to_dto_list(domain: Vec<DomainEntry>) -> Vec<SharedEntry> {
        domain.into_iter().map(Self::to_dto).collect()
    }

    pub fn to_command(fields: EntryFields) -> EntryFieldsCommand {
        EntryFieldsCommand {
            date: fields.date,
            month: fields.month,
            origin_country: fields.origin_country,
            main_impact_country: fields.main_impact_country,
            relevant_exchange: fields.relevant_exchange,
            event_type: fields.event_type,
            who_input: fields.who_input,
            when_input: fields.when_input,
            details: fields.details,
        }
    }
}
