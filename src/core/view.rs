// BizDirectory - core/view.rs
//
// Read-only projections of the filtered view list into card or table form.
// Neither projection reorders or mutates the filtered list it is given;
// the table's column sort works on its own copy of the indices.

use crate::core::filter::compare_text;
use crate::core::model::{Record, RecordField};
use std::cmp::Ordering;

// =============================================================================
// Table column sort
// =============================================================================

/// Active table column sort. Two states per column: ascending, descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSort {
    pub column: RecordField,
    pub descending: bool,
}

impl ColumnSort {
    /// Next sort state after a header click on `column`.
    ///
    /// A new column starts ascending; clicking the active column flips the
    /// direction, so a third click is the same as the first.
    pub fn click(current: Option<ColumnSort>, column: RecordField) -> ColumnSort {
        match current {
            Some(active) if active.column == column => ColumnSort {
                column,
                descending: !active.descending,
            },
            _ => ColumnSort {
                column,
                descending: false,
            },
        }
    }

    /// Header arrow for the active column.
    pub fn indicator(&self) -> &'static str {
        if self.descending {
            " \u{25bc}"
        } else {
            " \u{25b2}"
        }
    }
}

/// Ascending comparison of two records on one column.
pub fn compare_column(column: RecordField, a: &Record, b: &Record) -> Ordering {
    match column {
        RecordField::OrganizationSize => a.organization_size.cmp_asc(&b.organization_size),
        RecordField::Timestamp => a.created_at.cmp(&b.created_at),
        other => compare_text(&other.cell(a), &other.cell(b)),
    }
}

/// Re-sort an already-filtered index list by a table column.
pub fn apply_column_sort(records: &[Record], indices: &[usize], sort: ColumnSort) -> Vec<usize> {
    let mut sorted = indices.to_vec();
    sorted.sort_by(|&a, &b| {
        let (ra, rb) = (&records[a], &records[b]);
        if sort.descending {
            descending(sort.column, ra, rb)
        } else {
            compare_column(sort.column, ra, rb)
        }
    });
    sorted
}

/// Descending order. Non-numeric sizes stay last, matching the pipeline.
fn descending(column: RecordField, a: &Record, b: &Record) -> Ordering {
    match column {
        RecordField::OrganizationSize => a.organization_size.cmp_desc(&b.organization_size),
        _ => compare_column(column, b, a),
    }
}

// =============================================================================
// Card projection
// =============================================================================

/// One rendered card: a record plus whether mutating actions are shown.
#[derive(Debug, Clone, Copy)]
pub struct CardView<'a> {
    pub record: &'a Record,
    /// Update/Delete affordances. True only when the admin gate is open.
    pub show_mutations: bool,
}

/// Project the filtered list into cards, in view order.
pub fn project_cards<'a>(records: &'a [Record], indices: &[usize], gate_open: bool) -> Vec<CardView<'a>> {
    indices
        .iter()
        .filter_map(|&i| records.get(i))
        .map(|record| CardView {
            record,
            show_mutations: gate_open,
        })
        .collect()
}

// =============================================================================
// Table projection
// =============================================================================

/// One table row: the record id plus one cell per column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub id: String,
    pub cells: Vec<String>,
}

/// Flat tabular projection with a fixed column set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableView {
    pub columns: Vec<RecordField>,
    pub rows: Vec<TableRow>,
    pub sort: Option<ColumnSort>,
}

impl TableView {
    /// Header labels including the sort arrow on the active column.
    pub fn headers(&self) -> Vec<String> {
        self.columns
            .iter()
            .map(|c| match self.sort {
                Some(s) if s.column == *c => format!("{}{}", c.label(), s.indicator()),
                _ => c.label().to_string(),
            })
            .collect()
    }
}

/// Project the filtered list into table rows, applying the column sort when
/// one is active.
pub fn project_table(records: &[Record], indices: &[usize], sort: Option<ColumnSort>) -> TableView {
    let order = match sort {
        Some(s) => apply_column_sort(records, indices, s),
        None => indices.to_vec(),
    };
    let columns = RecordField::all().to_vec();
    let rows = order
        .iter()
        .filter_map(|&i| records.get(i))
        .map(|r| TableRow {
            id: r.id.clone(),
            cells: columns.iter().map(|c| c.cell(r)).collect(),
        })
        .collect();
    TableView {
        columns,
        rows,
        sort,
    }
}
