use shared::{DropdownValueRequest, DropdownsResponse, ReorderDropdownRequest};

use crate::domain::commands::dropdowns::{DropdownValueCommand, ReorderDropdownCommand};
use crate::domain::models::DropdownLists;

pub struct DropdownMapper;

impl DropdownMapper {
    /// Both country keys are served from the one countries list
    pub fn to_dto(domain: DropdownLists) -> DropdownsResponse {
        DropdownsResponse {
            origin_country: domain.countries.clone(),
            main_impact_country: domain.countries,
            relevant_exchange: domain.exchanges,
            event_type: domain.event_types,
        }
    }

    pub fn to_value_command(key: String, request: DropdownValueRequest) -> DropdownValueCommand {
        DropdownValueCommand {
            key,
            value: request.value,
        }
    }

    pub fn to_reorder_command(key: String, request: ReorderDropdownRequest) -> ReorderDropdownCommand {
        ReorderDropdownCommand {
            key,
            values: request.values,
        }
    }
}
