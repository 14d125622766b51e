// BizDirectory - core/view_state.rs
//
// View state as a pure reducer plus a pure projector.
//
// The event loop only dispatches `ViewEvent`s through `reduce` and asks
// `project` for the filtered view list. Because both are pure, snapshots and
// user input can interleave in any order and the last event always fully
// determines the next rendered state.

use crate::core::filter::{apply_filters, FilterState, SortKey};
use crate::core::model::{DisplayMode, Record, RecordField};
use crate::core::view::ColumnSort;
use std::collections::HashSet;

/// Derived view configuration. Never persisted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    pub filter: FilterState,
    pub display_mode: DisplayMode,
    /// Table-only override of the pipeline sort key.
    pub column_sort: Option<ColumnSort>,
    /// Ordered report columns. Empty = the default seven.
    pub report_fields: Vec<RecordField>,
}

impl ViewState {
    pub fn with_display_mode(display_mode: DisplayMode) -> Self {
        Self {
            display_mode,
            ..Default::default()
        }
    }

    /// Report columns in effect: the selection, or every field by default.
    pub fn effective_report_fields(&self) -> Vec<RecordField> {
        if self.report_fields.is_empty() {
            RecordField::all().to_vec()
        } else {
            self.report_fields.clone()
        }
    }
}

/// Inputs that change the view state.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    SearchChanged(String),
    BusinessTypeToggled(String),
    IndustrySectorToggled(String),
    BusinessTypesSelected(HashSet<String>),
    IndustrySectorsSelected(HashSet<String>),
    SortKeyChanged(Option<SortKey>),
    DisplayModeToggled,
    ColumnClicked(RecordField),
    ReportFieldToggled(RecordField),
    ReportFieldsSelected(Vec<RecordField>),
    FiltersCleared,
}

/// Apply one event to the view state.
pub fn reduce(mut state: ViewState, event: ViewEvent) -> ViewState {
    match event {
        ViewEvent::SearchChanged(term) => state.filter.search_term = term,
        ViewEvent::BusinessTypeToggled(value) => toggle(&mut state.filter.business_types, value),
        ViewEvent::IndustrySectorToggled(value) => {
            toggle(&mut state.filter.industry_sectors, value)
        }
        ViewEvent::BusinessTypesSelected(values) => state.filter.business_types = values,
        ViewEvent::IndustrySectorsSelected(values) => state.filter.industry_sectors = values,
        ViewEvent::SortKeyChanged(key) => {
            state.filter.sort_key = key;
            // A freshly chosen pipeline key must be visible immediately.
            state.column_sort = None;
        }
        ViewEvent::DisplayModeToggled => {
            state.display_mode = state.display_mode.toggled();
            state.column_sort = None;
        }
        ViewEvent::ColumnClicked(column) => {
            if state.display_mode == DisplayMode::Table {
                state.column_sort = Some(ColumnSort::click(state.column_sort, column));
            }
        }
        ViewEvent::ReportFieldToggled(field) => {
            if let Some(pos) = state.report_fields.iter().position(|f| *f == field) {
                state.report_fields.remove(pos);
            } else {
                state.report_fields.push(field);
            }
        }
        ViewEvent::ReportFieldsSelected(fields) => {
            let mut unique: Vec<RecordField> = Vec::with_capacity(fields.len());
            for f in fields {
                if !unique.contains(&f) {
                    unique.push(f);
                }
            }
            state.report_fields = unique;
        }
        ViewEvent::FiltersCleared => {
            state.filter = FilterState::default();
            state.column_sort = None;
        }
    }
    state
}

/// The filtered view list for `records` under `state`.
pub fn project(records: &[Record], state: &ViewState) -> Vec<usize> {
    apply_filters(records, &state.filter)
}

fn toggle(set: &mut HashSet<String>, value: String) {
    if !set.remove(&value) {
        set.insert(value);
    }
}
