pub mod dropdown_mapper;
pub mod entry_mapper;
pub mod event_mapper;

pub use dropdown_mapper::DropdownMapper;
pub use entry_mapper::EntryMapper;
pub use event_mapper::EventMapper;
