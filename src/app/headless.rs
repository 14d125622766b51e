// BizDirectory - app/headless.rs
//
// One-shot export without a window: fetch the collection once, run the
// filter/sort pipeline, and write the requested artifacts.

use crate::core::export::{self, ReportFormat};
use crate::core::filter::filtered_records;
use crate::core::model::RecordField;
use crate::core::normalize::normalize_all;
use crate::core::view_state::{project, ViewState};
use crate::platform::fs::atomic_write;
use crate::platform::store::DocumentStore;
use crate::util::error::{DirectoryError, ExportError, Result};
use std::path::{Path, PathBuf};

/// What a headless run produces.
#[derive(Debug, Clone, Default)]
pub struct HeadlessRequest {
    pub view: ViewState,
    pub json_path: Option<PathBuf>,
    pub report_path: Option<PathBuf>,
    pub report_format: ReportFormat,
    pub rows_per_page: usize,
}

/// Counts reported back to the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeadlessSummary {
    pub fetched: usize,
    pub skipped: usize,
    pub exported: usize,
}

/// Run the pipeline once against `store` and write the requested exports.
pub fn run(
    store: &dyn DocumentStore,
    collection: &str,
    request: &HeadlessRequest,
) -> Result<HeadlessSummary> {
    let docs = store.fetch(collection)?;
    let batch = normalize_all(&docs);
    let indices = project(&batch.records, &request.view);
    let visible = filtered_records(&batch.records, &indices);

    tracing::info!(
        collection,
        fetched = docs.len(),
        visible = visible.len(),
        "Headless pipeline complete"
    );

    if let Some(ref path) = request.json_path {
        let mut buf = Vec::new();
        export::export_json(&visible, &mut buf, path)?;
        write_file(path, &buf)?;
        tracing::info!(path = %path.display(), "JSON export written");
    }

    if let Some(ref path) = request.report_path {
        let fields: Vec<RecordField> = request.view.effective_report_fields();
        let report = export::build_report(&visible, &fields, request.rows_per_page);
        let mut buf = Vec::new();
        export::write_report(&report, request.report_format, &mut buf, path)?;
        write_file(path, &buf)?;
        tracing::info!(path = %path.display(), pages = report.pages.len(), "Report written");
    }

    Ok(HeadlessSummary {
        fetched: docs.len(),
        skipped: batch.skipped.len(),
        exported: visible.len(),
    })
}

/// Parse a comma-separated list of stored field keys (e.g. `name,tags`)
/// into report columns, in the given order. Duplicates are dropped.
///
/// Returns the first unknown key as the error.
pub fn parse_report_fields(list: &str) -> std::result::Result<Vec<RecordField>, String> {
    let mut fields: Vec<RecordField> = Vec::new();
    for key in list.split(',').map(str::trim).filter(|k| !k.is_empty()) {
        let field = RecordField::from_key(key).ok_or_else(|| key.to_string())?;
        if !fields.contains(&field) {
            fields.push(field);
        }
    }
    Ok(fields)
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    atomic_write(path, bytes).map_err(|e| {
        DirectoryError::from(ExportError::Io {
            path: path.to_path_buf(),
            source: e,
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::filter::SortKey;
    use crate::core::model::RawDocument;
    use crate::platform::store::MemoryStore;
    use serde_json::json;

    fn seeded() -> MemoryStore {
        let store = MemoryStore::new();
        for (id, name, tags) in [("1", "Acme", "x, y"), ("2", "Zenith", "z")] {
            store.insert(
                "users",
                RawDocument::from_value(
                    id,
                    json!({ "name": name, "tags": tags, "timestamp": "2024-01-01T00:00:00Z" }),
                ),
            );
        }
        store
    }

    #[test]
    fn test_headless_sorted_json_export() {
        let dir = tempfile::tempdir().unwrap();
        let mut request = HeadlessRequest {
            json_path: Some(dir.path().join("out.json")),
            rows_per_page: 40,
            ..Default::default()
        };
        request.view.filter.sort_key = Some(SortKey::NameDesc);

        let summary = run(&seeded(), "users", &request).unwrap();
        assert_eq!(summary.exported, 2);

        let parsed: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(dir.path().join("out.json")).unwrap())
                .unwrap();
        assert_eq!(parsed[0]["Name"], "Zenith");
        assert_eq!(parsed[1]["Name"], "Acme");
    }

    #[test]
    fn test_parse_report_fields() {
        assert_eq!(
            parse_report_fields("tags, Name,tags").unwrap(),
            vec![RecordField::Tags, RecordField::Name]
        );
        assert_eq!(
            parse_report_fields("organizationSize,industrySector").unwrap(),
            vec![RecordField::OrganizationSize, RecordField::IndustrySector]
        );
        assert!(parse_report_fields("").unwrap().is_empty());
        assert_eq!(parse_report_fields("name,email").unwrap_err(), "email");
    }

    #[test]
    fn test_headless_report_uses_selected_fields() {
        let dir = tempfile::tempdir().unwrap();
        let mut request = HeadlessRequest {
            report_path: Some(dir.path().join("report.csv")),
            report_format: ReportFormat::Csv,
            rows_per_page: 40,
            ..Default::default()
        };
        request.view.report_fields = parse_report_fields("tags,name").unwrap();
        request.view.filter.sort_key = Some(SortKey::NameAsc);

        run(&seeded(), "users", &request).unwrap();
        let text = std::fs::read_to_string(dir.path().join("report.csv")).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Tags,Name");
        assert_eq!(lines[1], "\"x, y\",Acme");
        assert_eq!(lines[2], "z,Zenith");
    }

    #[test]
    fn test_headless_report_of_empty_result() {
        let dir = tempfile::tempdir().unwrap();
        let mut request = HeadlessRequest {
            report_path: Some(dir.path().join("report.csv")),
            report_format: ReportFormat::Csv,
            rows_per_page: 40,
            ..Default::default()
        };
        request.view.filter.search_term = "no such business".into();

        let summary = run(&seeded(), "users", &request).unwrap();
        assert_eq!(summary.exported, 0);
        let text = std::fs::read_to_string(dir.path().join("report.csv")).unwrap();
        assert_eq!(text.lines().count(), 1);
    }
}
