//! Client-side table engine for the entries view.
//!
//! Operates on the full fetched entry set, never on the server. Handles the
//! free-text search box, per-column checkbox filters, single-column sorting
//! and interactive column resizing. The engine is UI agnostic: a frontend
//! keeps an [`EntryTableState`] and renders whatever [`EntryTableState::apply`]
//! returns.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::{parse_when_input, Entry};

/// Data columns of the entries table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryColumn {
    Date,
    Month,
    OriginCountry,
    MainImpactCountry,
    RelevantExchange,
    EventType,
    WhoInput,
    WhenInput,
    Details,
}

impl EntryColumn {
    pub const ALL: [EntryColumn; 9] = [
        EntryColumn::Date,
        EntryColumn::Month,
        EntryColumn::OriginCountry,
        EntryColumn::MainImpactCountry,
        EntryColumn::RelevantExchange,
        EntryColumn::EventType,
        EntryColumn::WhoInput,
        EntryColumn::WhenInput,
        EntryColumn::Details,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            EntryColumn::Date => "date",
            EntryColumn::Month => "month",
            EntryColumn::OriginCountry => "origin_country",
            EntryColumn::MainImpactCountry => "main_impact_country",
            EntryColumn::RelevantExchange => "relevant_exchange",
            EntryColumn::EventType => "event_type",
            EntryColumn::WhoInput => "who_input",
            EntryColumn::WhenInput => "when_input",
            EntryColumn::Details => "details",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EntryColumn::Date => "Date",
            EntryColumn::Month => "Month",
            EntryColumn::OriginCountry => "Origin Country",
            EntryColumn::MainImpactCountry => "Impact Country",
            EntryColumn::RelevantExchange => "Exchange",
            EntryColumn::EventType => "Event Type",
            EntryColumn::WhoInput => "Who Input",
            EntryColumn::WhenInput => "When Input",
            EntryColumn::Details => "Details",
        }
    }

    pub fn value<'a>(&self, entry: &'a Entry) -> &'a str {
        match self {
            EntryColumn::Date => &entry.date,
            EntryColumn::Month => &entry.month,
            EntryColumn::OriginCountry => &entry.origin_country,
            EntryColumn::MainImpactCountry => &entry.main_impact_country,
            EntryColumn::RelevantExchange => &entry.relevant_exchange,
            EntryColumn::EventType => &entry.event_type,
            EntryColumn::WhoInput => &entry.who_input,
            EntryColumn::WhenInput => &entry.when_input,
            EntryColumn::Details => &entry.details,
        }
    }
}

/// Every rendered column, including the trailing actions column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TableColumn {
    Data(EntryColumn),
    Actions,
}

impl TableColumn {
    pub fn min_width(&self) -> u32 {
        match self {
            TableColumn::Data(EntryColumn::Date) => 120,
            TableColumn::Data(EntryColumn::Month) => 100,
            TableColumn::Data(EntryColumn::OriginCountry) => 130,
            TableColumn::Data(EntryColumn::MainImpactCountry) => 130,
            TableColumn::Data(EntryColumn::RelevantExchange) => 110,
            TableColumn::Data(EntryColumn::EventType) => 130,
            TableColumn::Data(EntryColumn::WhoInput) => 120,
            TableColumn::Data(EntryColumn::WhenInput) => 180,
            TableColumn::Data(EntryColumn::Details) => 250,
            TableColumn::Actions => 140,
        }
    }

    pub fn all() -> impl Iterator<Item = TableColumn> {
        EntryColumn::ALL
            .into_iter()
            .map(TableColumn::Data)
            .chain(std::iter::once(TableColumn::Actions))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub column: EntryColumn,
    pub direction: SortDirection,
}

/// Column widths in pixels, never below each column's minimum
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnWidths {
    widths: BTreeMap<TableColumn, u32>,
}

impl Default for ColumnWidths {
    fn default() -> Self {
        Self {
            widths: TableColumn::all().map(|c| (c, c.min_width())).collect(),
        }
    }
}

impl ColumnWidths {
    pub fn width(&self, column: TableColumn) -> u32 {
        self.widths
            .get(&column)
            .copied()
            .unwrap_or_else(|| column.min_width())
    }

    /// Start dragging the right edge of `column` at pointer position `start_x`
    pub fn begin_resize(&self, column: TableColumn, start_x: i32) -> ColumnResize {
        ColumnResize {
            column,
            start_x,
            start_width: self.width(column),
        }
    }

    /// Apply a drag in progress; returns the new width
    pub fn resize(&mut self, drag: &ColumnResize, current_x: i32) -> u32 {
        let diff = i64::from(current_x) - i64::from(drag.start_x);
        let proposed = i64::from(drag.start_width) + diff;
        let min = i64::from(drag.column.min_width());
        let width = proposed.max(min).min(i64::from(u32::MAX)) as u32;
        self.widths.insert(drag.column, width);
        width
    }
}

/// An active column resize drag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnResize {
    pub column: TableColumn,
    pub start_x: i32,
    pub start_width: u32,
}

/// View state for the entries table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryTableState {
    pub search: String,
    pub filters: BTreeMap<EntryColumn, BTreeSet<String>>,
    pub sort: Option<SortState>,
    pub widths: ColumnWidths,
}

impl EntryTableState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
    }

    /// Check or uncheck one value in a column's filter
    pub fn set_filter_value(&mut self, column: EntryColumn, value: &str, checked: bool) {
        let selected = self.filters.entry(column).or_default();
        if checked {
            selected.insert(value.to_string());
        } else {
            selected.remove(value);
        }
        if selected.is_empty() {
            self.filters.remove(&column);
        }
    }

    pub fn clear_filter(&mut self, column: EntryColumn) {
        self.filters.remove(&column);
    }

    pub fn is_filtered(&self, column: EntryColumn) -> bool {
        self.filters.get(&column).is_some_and(|s| !s.is_empty())
    }

    /// Clicking a header: a new column sorts ascending, the same column flips
    pub fn toggle_sort(&mut self, column: EntryColumn) {
        let direction = match self.sort {
            Some(SortState {
                column: current,
                direction: SortDirection::Ascending,
            }) if current == column => SortDirection::Descending,
            _ => SortDirection::Ascending,
        };
        self.sort = Some(SortState { column, direction });
    }

    /// Search, then column filters, then sort
    pub fn apply<'a>(&self, entries: &'a [Entry]) -> Vec<&'a Entry> {
        let needle = self.search.to_lowercase();
        let mut rows: Vec<&Entry> = entries
            .iter()
            .filter(|entry| needle.is_empty() || matches_search(entry, &needle))
            .filter(|entry| {
                self.filters.iter().all(|(column, selected)| {
                    selected.is_empty() || selected.contains(column.value(entry))
                })
            })
            .collect();

        if let Some(sort) = self.sort {
            rows.sort_by(|a, b| {
                let ordering = compare_column(sort.column, a, b);
                match sort.direction {
                    SortDirection::Ascending => ordering,
                    SortDirection::Descending => ordering.reverse(),
                }
            });
        }
        rows
    }
}

/// Sorted distinct values of a column, the checkbox options of its filter
pub fn distinct_values(entries: &[Entry], column: EntryColumn) -> Vec<String> {
    entries
        .iter()
        .map(|e| column.value(e).to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Filter options narrowed by the search box inside a filter dropdown
pub fn filter_options(entries: &[Entry], column: EntryColumn, query: &str) -> Vec<String> {
    let query = query.to_lowercase();
    distinct_values(entries, column)
        .into_iter()
        .filter(|v| v.to_lowercase().contains(&query))
        .collect()
}

fn matches_search(entry: &Entry, needle: &str) -> bool {
    std::iter::once(entry.id.as_str())
        .chain(EntryColumn::ALL.iter().map(|c| c.value(entry)))
        .any(|value| value.to_lowercase().contains(needle))
}

fn compare_column(column: EntryColumn, a: &Entry, b: &Entry) -> Ordering {
    match column {
        // Unparsable timestamps sort before every valid one
        EntryColumn::WhenInput => {
            parse_when_input(&a.when_input).cmp(&parse_when_input(&b.when_input))
        }
        _ => column.value(a).cmp(column.value(b)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, country: &str, event_type: &str, when_input: &str, details: &str) -> Entry {
        Entry {
            id: id.to_string(),
            date: "2024-02-15".to_string(),
            month: "February".to_string(),
            origin_country: country.to_string(),
            main_impact_country: "China".to_string(),
            relevant_exchange: "NYSE".to_string(),
            event_type: event_type.to_string(),
            who_input: "Analyst".to_string(),
            when_input: when_input.to_string(),
            details: details.to_string(),
        }
    }

    fn sample() -> Vec<Entry> {
        vec![
            entry("1", "USA", "Merger", "2024-02-15T10:30:00", "Tech expansion"),
            entry("2", "Japan", "IPO", "2024-01-20T14:15:00", "Automotive merger"),
            entry("3", "Germany", "Merger", "2024-03-05T09:45:00", "Energy deal"),
        ]
    }

    fn ids(rows: &[&Entry]) -> Vec<String> {
        rows.iter().map(|e| e.id.clone()).collect()
    }

    #[test]
    fn test_search_is_case_insensitive_across_fields() {
        let entries = sample();
        let mut state = EntryTableState::new();

        state.set_search("MERGER");
        // Matches the event_type of 1 and 3 and the details of 2
        assert_eq!(ids(&state.apply(&entries)), vec!["1", "2", "3"]);

        state.set_search("germ");
        assert_eq!(ids(&state.apply(&entries)), vec!["3"]);
    }

    #[test]
    fn test_column_filters_narrow_to_selected_values() {
        let entries = sample();
        let mut state = EntryTableState::new();

        state.set_filter_value(EntryColumn::EventType, "Merger", true);
        assert_eq!(ids(&state.apply(&entries)), vec!["1", "3"]);

        state.set_filter_value(EntryColumn::OriginCountry, "Germany", true);
        state.set_filter_value(EntryColumn::OriginCountry, "Japan", true);
        assert_eq!(ids(&state.apply(&entries)), vec!["3"]);

        state.set_filter_value(EntryColumn::EventType, "Merger", false);
        assert!(!state.is_filtered(EntryColumn::EventType));
        assert_eq!(ids(&state.apply(&entries)), vec!["2", "3"]);

        state.clear_filter(EntryColumn::OriginCountry);
        assert_eq!(state.apply(&entries).len(), 3);
    }

    #[test]
    fn test_toggle_sort_flips_direction() {
        let entries = sample();
        let mut state = EntryTableState::new();

        state.toggle_sort(EntryColumn::OriginCountry);
        assert_eq!(ids(&state.apply(&entries)), vec!["3", "2", "1"]);

        state.toggle_sort(EntryColumn::OriginCountry);
        assert_eq!(
            state.sort.map(|s| s.direction),
            Some(SortDirection::Descending)
        );
        assert_eq!(ids(&state.apply(&entries)), vec!["1", "2", "3"]);

        state.toggle_sort(EntryColumn::Details);
        assert_eq!(
            state.sort.map(|s| s.direction),
            Some(SortDirection::Ascending)
        );
    }

    #[test]
    fn test_when_input_sorts_chronologically() {
        let entries = vec![
            entry("a", "USA", "IPO", "2024-02-15T10:30:00", ""),
            entry("b", "USA", "IPO", "2024-02-15T09:05", ""),
            entry("c", "USA", "IPO", "2024-02-15T10:00:00Z", ""),
        ];
        let mut state = EntryTableState::new();
        state.toggle_sort(EntryColumn::WhenInput);
        assert_eq!(ids(&state.apply(&entries)), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_distinct_values_and_filter_options() {
        let entries = sample();
        assert_eq!(
            distinct_values(&entries, EntryColumn::EventType),
            vec!["IPO", "Merger"]
        );
        assert_eq!(
            filter_options(&entries, EntryColumn::OriginCountry, "an"),
            vec!["Germany", "Japan"]
        );
    }

    #[test]
    fn test_resize_never_goes_below_minimum() {
        let mut widths = ColumnWidths::default();
        let column = TableColumn::Data(EntryColumn::Details);
        assert_eq!(widths.width(column), 250);

        let drag = widths.begin_resize(column, 500);
        assert_eq!(widths.resize(&drag, 580), 330);
        assert_eq!(widths.resize(&drag, 100), 250);
        assert_eq!(widths.width(column), 250);

        let drag = widths.begin_resize(TableColumn::Actions, 0);
        assert_eq!(widths.resize(&drag, 60), 200);
        assert_eq!(widths.width(TableColumn::Actions), 200);
    }
}
