use chrono::SecondsFormat;
use shared::{CreateEventRequest, Event as SharedEvent, YearInput};

use crate::domain::commands::events::CreateEventCommand;
use crate::domain::models::Event as DomainEvent;

/// Mapper between the shared Event DTOs and the domain Event model
pub struct EventMapper;

impl EventMapper {
    pub fn to_dto(domain: DomainEvent) -> SharedEvent {
        SharedEvent {
            id: domain.id,
            event_name: domain.event_name,
            event_type: domain.event_type,
            origin_country: domain.origin_country,
            main_impact_country: domain.main_impact_country,
            relevant_exchange: domain.relevant_exchange,
            month: domain.month,
            year: domain.year,
            description: domain.description,
            created_at: domain.created_at.to_rfc3339_opts(SecondsFormat::Micros, true),
        }
    }

    pub fn to_dto_list(domain: Vec<DomainEvent>) -> Vec<SharedEvent> {
        domain.into_iter().map(Self::to_dto).collect()
    }

    pub fn to_command(request: CreateEventRequest) -> CreateEventCommand {
        CreateEventCommand {
            event_name: request.event_name,
            event_type: request.event_type,
            origin_country: request.origin_country,
            main_impact_country: request.main_impact_country,
            relevant_exchange: request.relevant_exchange,
            month: request.month,
            year: request.year.map(|year| match year {
                YearInput::Number(n) => n.to_string(),
                YearInput::Text(text) => text,
            }),
            description: request.description,
        }
    }
}
