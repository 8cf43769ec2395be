pub mod dropdown;
pub mod entry;
pub mod event;

pub use dropdown::{DropdownKey, DropdownList, DropdownLists};
pub use entry::Entry;
pub use event::{Event, NewEvent};
