// BizDirectory - core/export.rs
//
// Structured (JSON) export and tabular report export of the filtered view
// list. Core layer: writes to any Write trait object; the caller owns file
// creation and naming.

use crate::core::model::{OrganizationSize, Record, RecordField};
use crate::util::constants::{REPORT_COLUMN_GAP, REPORT_TITLE, TAG_JOINER};
use crate::util::error::ExportError;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;

// =============================================================================
// Structured export
// =============================================================================

/// One exported record: the seven listing fields with tags joined.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct ExportRow<'a> {
    name: &'a str,
    business_type: &'a str,
    info: &'a str,
    industry_sector: &'a str,
    organization_size: &'a OrganizationSize,
    timestamp: &'a str,
    tags: String,
}

impl<'a> From<&'a Record> for ExportRow<'a> {
    fn from(r: &'a Record) -> Self {
        Self {
            name: &r.name,
            business_type: &r.business_type,
            info: &r.info,
            industry_sector: &r.industry_sector,
            organization_size: &r.organization_size,
            timestamp: &r.timestamp,
            tags: r.tags.join(TAG_JOINER),
        }
    }
}

/// Export records to a pretty-printed JSON array of objects.
///
/// An empty slice produces `[]`. Returns the number of records written.
pub fn export_json<W: Write>(
    records: &[&Record],
    mut writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    let rows: Vec<ExportRow<'_>> = records.iter().map(|r| ExportRow::from(*r)).collect();
    serde_json::to_writer_pretty(&mut writer, &rows).map_err(|e| ExportError::Json {
        path: export_path.to_path_buf(),
        source: e,
    })?;
    writer.flush().map_err(|e| ExportError::Io {
        path: export_path.to_path_buf(),
        source: e,
    })?;
    Ok(rows.len())
}

// =============================================================================
// Report export
// =============================================================================

/// Output format for the report document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Paginated fixed-width text with a repeated header on every page.
    #[default]
    Text,
    /// Single header row plus data rows.
    Csv,
}

impl ReportFormat {
    pub fn file_name(&self) -> &'static str {
        match self {
            ReportFormat::Text => crate::util::constants::REPORT_TEXT_FILE_NAME,
            ReportFormat::Csv => crate::util::constants::REPORT_CSV_FILE_NAME,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Text => "txt",
            ReportFormat::Csv => "csv",
        }
    }

    pub fn from_name(name: &str) -> Option<ReportFormat> {
        match name.trim().to_lowercase().as_str() {
            "text" | "txt" => Some(ReportFormat::Text),
            "csv" => Some(ReportFormat::Csv),
            _ => None,
        }
    }
}

/// A built report: chosen columns plus cell values split into pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub columns: Vec<RecordField>,
    /// Always at least one page; the only page is empty when there are no rows.
    pub pages: Vec<Vec<Vec<String>>>,
}

impl Report {
    pub fn headers(&self) -> Vec<&'static str> {
        self.columns.iter().map(RecordField::label).collect()
    }

    pub fn row_count(&self) -> usize {
        self.pages.iter().map(Vec::len).sum()
    }
}

/// Build a report over `records`.
///
/// `fields` selects and orders the columns; empty means all seven in
/// default order. Cell values come verbatim from [`RecordField::cell`].
pub fn build_report(records: &[&Record], fields: &[RecordField], rows_per_page: usize) -> Report {
    let columns: Vec<RecordField> = if fields.is_empty() {
        RecordField::all().to_vec()
    } else {
        fields.to_vec()
    };
    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|r| columns.iter().map(|c| c.cell(r)).collect())
        .collect();

    let per_page = rows_per_page.max(1);
    let mut pages: Vec<Vec<Vec<String>>> = rows.chunks(per_page).map(<[_]>::to_vec).collect();
    if pages.is_empty() {
        pages.push(Vec::new());
    }
    Report { columns, pages }
}

/// Render a report as paginated fixed-width text.
///
/// Each page carries the title, `Page N of M`, and the column header; pages
/// are separated by a form feed. Returns the number of data rows written.
pub fn write_report_text<W: Write>(
    report: &Report,
    mut writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    let io_err = |e: std::io::Error| ExportError::Io {
        path: export_path.to_path_buf(),
        source: e,
    };

    let headers = report.headers();
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in report.pages.iter().flatten() {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(single_line(cell).chars().count());
        }
    }

    let total_pages = report.pages.len();
    for (page_idx, page) in report.pages.iter().enumerate() {
        if page_idx > 0 {
            writer.write_all(b"\x0c\n").map_err(io_err)?;
        }
        writeln!(writer, "{REPORT_TITLE}    Page {} of {total_pages}", page_idx + 1).map_err(io_err)?;
        writeln!(writer).map_err(io_err)?;

        let header_cells: Vec<String> = headers.iter().map(|h| (*h).to_string()).collect();
        writeln!(writer, "{}", layout_line(&header_cells, &widths)).map_err(io_err)?;
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        writeln!(writer, "{}", layout_line(&rule, &widths)).map_err(io_err)?;

        for row in page {
            let cells: Vec<String> = row.iter().map(|c| single_line(c)).collect();
            writeln!(writer, "{}", layout_line(&cells, &widths)).map_err(io_err)?;
        }
    }

    writer.flush().map_err(io_err)?;
    Ok(report.row_count())
}

/// Render a report as CSV: one header row, then every data row.
pub fn write_report_csv<W: Write>(
    report: &Report,
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    let csv_err = |e: csv::Error| ExportError::Csv {
        path: export_path.to_path_buf(),
        source: e,
    };
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(report.headers()).map_err(csv_err)?;

    for row in report.pages.iter().flatten() {
        csv_writer.write_record(row).map_err(csv_err)?;
    }

    csv_writer.flush().map_err(|e| ExportError::Io {
        path: export_path.to_path_buf(),
        source: e,
    })?;
    Ok(report.row_count())
}

/// Render a report in the requested format.
pub fn write_report<W: Write>(
    report: &Report,
    format: ReportFormat,
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    match format {
        ReportFormat::Text => write_report_text(report, writer, export_path),
        ReportFormat::Csv => write_report_csv(report, writer, export_path),
    }
}

/// Fixed-width rows cannot hold line breaks; they render as spaces.
fn single_line(cell: &str) -> String {
    cell.replace(['\r', '\n'], " ")
}

fn layout_line(cells: &[String], widths: &[usize]) -> String {
    let gap = " ".repeat(REPORT_COLUMN_GAP);
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, w)| format!("{cell:<w$}", w = *w))
        .collect();
    padded.join(&gap).trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::test_support::record;
    use std::path::PathBuf;

    fn out() -> PathBuf {
        PathBuf::from("out")
    }

    fn sample() -> Vec<Record> {
        let mut a = record("1", "Acme", "Widgets", &["x", "y"]);
        a.business_type = "Retail".to_string();
        a.organization_size = OrganizationSize::from(250);
        let mut z = record("2", "Zenith", "Optics", &["z"]);
        z.organization_size = OrganizationSize::from("10-50");
        vec![a, z]
    }

    #[test]
    fn test_json_export_fields_and_types() {
        let records = sample();
        let refs: Vec<&Record> = records.iter().collect();
        let mut buf = Vec::new();
        let count = export_json(&refs, &mut buf, &out()).unwrap();
        assert_eq!(count, 2);

        let parsed: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        let first = &parsed[0];
        assert_eq!(first["Name"], "Acme");
        assert_eq!(first["BusinessType"], "Retail");
        assert_eq!(first["OrganizationSize"], 250);
        assert_eq!(first["Tags"], "x, y");
        assert_eq!(parsed[1]["OrganizationSize"], "10-50");
        assert_eq!(first.as_object().unwrap().len(), 7);
    }

    #[test]
    fn test_json_export_empty_list() {
        let mut buf = Vec::new();
        let count = export_json(&[], &mut buf, &out()).unwrap();
        assert_eq!(count, 0);
        let parsed: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(parsed, serde_json::json!([]));
    }

    #[test]
    fn test_report_default_and_selected_columns() {
        let records = sample();
        let refs: Vec<&Record> = records.iter().collect();
        let report = build_report(&refs, &[], 10);
        assert_eq!(report.columns, RecordField::all().to_vec());

        let report = build_report(&refs, &[RecordField::Tags, RecordField::Name], 10);
        assert_eq!(report.headers(), vec!["Tags", "Name"]);
        assert_eq!(report.pages[0][0], vec!["x, y".to_string(), "Acme".to_string()]);
    }

    #[test]
    fn test_report_pagination() {
        let records: Vec<Record> = (0..5)
            .map(|i| record(&i.to_string(), &format!("R{i}"), "", &[]))
            .collect();
        let refs: Vec<&Record> = records.iter().collect();
        let report = build_report(&refs, &[RecordField::Name], 2);
        assert_eq!(report.pages.len(), 3);
        assert_eq!(report.row_count(), 5);

        let mut buf = Vec::new();
        write_report_text(&report, &mut buf, &out()).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.matches('\x0c').count(), 2);
        assert!(text.contains("Page 3 of 3"));
        // Header repeated on every page.
        assert_eq!(text.lines().filter(|l| l.trim() == "Name").count(), 3);
    }

    #[test]
    fn test_empty_report_is_header_only() {
        let report = build_report(&[], &[], 40);
        assert_eq!(report.pages.len(), 1);
        assert_eq!(report.row_count(), 0);

        let mut buf = Vec::new();
        assert_eq!(write_report_text(&report, &mut buf, &out()).unwrap(), 0);
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("Page 1 of 1"));
        assert!(text.contains("Organization Size"));

        let mut buf = Vec::new();
        assert_eq!(write_report_csv(&report, &mut buf, &out()).unwrap(), 0);
        let csv_text = String::from_utf8(buf).unwrap();
        assert_eq!(csv_text.lines().count(), 1);
    }

    #[test]
    fn test_csv_report_rows_verbatim() {
        let records = sample();
        let refs: Vec<&Record> = records.iter().collect();
        let report = build_report(&refs, &[RecordField::Name, RecordField::Tags], 1);
        let mut buf = Vec::new();
        let count = write_report(&report, ReportFormat::Csv, &mut buf, &out()).unwrap();
        assert_eq!(count, 2);
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("Name,Tags\n"));
        assert!(text.contains("Acme,\"x, y\""));
    }

    #[test]
    fn test_report_format_from_name() {
        assert_eq!(ReportFormat::from_name("CSV"), Some(ReportFormat::Csv));
        assert_eq!(ReportFormat::from_name("text"), Some(ReportFormat::Text));
        assert_eq!(ReportFormat::from_name("pdf"), None);
    }
}
