// BizDirectory - tests/e2e_directory.rs
//
// End-to-end tests for the store -> synchroniser -> pipeline -> export path.
//
// These tests exercise the real filesystem, the real poll thread, real
// normalisation of every supported timestamp shape, and real export files.
// No mocks: fixture documents are copied into a temporary store root.

use bizdirectory::app::session::MemorySessionStore;
use bizdirectory::app::state::AppState;
use bizdirectory::app::sync::Synchronizer;
use bizdirectory::core::export::ReportFormat;
use bizdirectory::core::filter::SortKey;
use bizdirectory::core::normalize::normalize_all;
use bizdirectory::core::view_state::ViewEvent;
use bizdirectory::platform::config::AppConfig;
use bizdirectory::platform::store::{DocumentStore, FileStore};
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tempfile::TempDir;

// =============================================================================
// Helpers
// =============================================================================

/// Absolute path to the on-disk fixture collection.
fn fixture_collection() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("users")
}

/// Copy the fixture collection into a fresh store root.
fn seeded_root() -> TempDir {
    let root = TempDir::new().unwrap();
    let dest = root.path().join("users");
    fs::create_dir_all(&dest).unwrap();
    for entry in fs::read_dir(fixture_collection()).unwrap() {
        let entry = entry.unwrap();
        fs::copy(entry.path(), dest.join(entry.file_name())).unwrap();
    }
    root
}

fn fast_store(root: &Path) -> FileStore {
    FileStore::new(root).with_poll_interval(Duration::from_millis(100))
}

fn wait_for(mut check: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(10);
    while Instant::now() < deadline {
        if check() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(20));
    }
    false
}

fn state_for(root: &Path) -> AppState {
    let config = AppConfig::with_store_root(root.to_path_buf());
    AppState::new(config, Box::new(MemorySessionStore::new()), false)
}

fn visible_names(state: &AppState) -> Vec<String> {
    state.visible_records().iter().map(|r| r.name.clone()).collect()
}

// =============================================================================
// Store + normalisation
// =============================================================================

/// The corrupt file is left out of the fetch; the undated one is dropped by
/// normalisation. Every other timestamp shape resolves.
#[test]
fn e2e_fetch_and_normalise_fixtures() {
    let root = seeded_root();
    let store = fast_store(root.path());

    let docs = store.fetch("users").unwrap();
    assert_eq!(docs.len(), 4, "corrupt.json must be skipped");

    let batch = normalize_all(&docs);
    assert_eq!(batch.records.len(), 3);
    assert_eq!(batch.skipped.len(), 1, "undated document must be skipped");

    let acme = batch.records.iter().find(|r| r.id == "acme").unwrap();
    assert_eq!(acme.tags, vec!["widgets", "bulk"]);
    assert_eq!(acme.latitude, Some(40.7128));
    assert_eq!(acme.longitude, Some(-74.006));
    assert_eq!(acme.image_url.as_deref(), Some("https://acme.example/logo.png"));
    assert_eq!(acme.created_at.timestamp(), 1_704_067_200);
}

// =============================================================================
// Live synchronisation
// =============================================================================

/// A subscription delivers the initial snapshot and then picks up a new file.
#[test]
fn e2e_synchroniser_follows_store_changes() {
    let root = seeded_root();
    let store = fast_store(root.path());
    let mut sync = Synchronizer::new();
    sync.start(&store, "users");
    assert!(sync.is_loading());

    let mut errors = Vec::new();
    assert!(wait_for(|| {
        errors.extend(sync.poll(50).errors);
        !sync.is_loading()
    }));
    assert_eq!(sync.records().len(), 3);
    assert!(
        errors.iter().any(|e| e.contains("corrupt")),
        "malformed document must be reported: {errors:?}"
    );

    store
        .write_document(
            "users",
            "newcomer",
            &json!({ "name": "Newcomer Ltd", "timestamp": "2025-01-01T00:00:00Z" }),
        )
        .unwrap();
    assert!(wait_for(|| {
        sync.poll(50);
        sync.records().len() == 4
    }));

    sync.stop();
    assert!(!sync.is_active());
}

// =============================================================================
// Pipeline through AppState
// =============================================================================

#[test]
fn e2e_filter_sort_and_delete() {
    let root = seeded_root();
    let store = fast_store(root.path());
    let mut state = state_for(root.path());
    state.start_sync(&store);
    assert!(wait_for(|| {
        state.poll_sync(50);
        !state.is_loading()
    }));

    // Facets come from the full list in first-occurrence (id) order.
    assert_eq!(state.facets.business_types, vec!["Retail", "Services"]);

    state.dispatch(ViewEvent::SearchChanged("ORGANIC".into()));
    assert_eq!(visible_names(&state), vec!["bistro del mar"]);

    state.dispatch(ViewEvent::SearchChanged(String::new()));
    state.dispatch(ViewEvent::SortKeyChanged(Some(SortKey::NameAsc)));
    assert_eq!(
        visible_names(&state),
        vec!["Acme Supplies", "bistro del mar", "Zenith Optics"]
    );

    // Non-numeric sizes sort last in both directions.
    state.dispatch(ViewEvent::SortKeyChanged(Some(SortKey::OrganizationSizeDesc)));
    assert_eq!(
        visible_names(&state),
        vec!["Acme Supplies", "Zenith Optics", "bistro del mar"]
    );
    state.dispatch(ViewEvent::SortKeyChanged(Some(SortKey::OrganizationSizeAsc)));
    assert_eq!(
        visible_names(&state),
        vec!["Zenith Optics", "Acme Supplies", "bistro del mar"]
    );

    // Admin mode alone does not open the gate.
    state.set_admin_enabled(true);
    state.request_delete("zenith");
    assert!(state.pending_delete.is_none());

    // Delete through the real store once the gate is verified.
    state.set_admin_identity("Admin 2".into());
    state.set_admin_code("admin2code".into());
    state.request_delete("zenith");
    state.confirm_delete();
    let id = state.confirmed_delete.take().unwrap();
    assert!(state.delete_record(&store, &id));
    assert!(!root.path().join("users").join("zenith.json").exists());
    assert_eq!(state.records().len(), 2);

    // A delete the store refuses leaves the list alone.
    assert!(!state.delete_record(&store, "zenith"));
    assert_eq!(state.records().len(), 2);

    state.sync.stop();
}

// =============================================================================
// Export
// =============================================================================

#[test]
fn e2e_exports_follow_filtered_view() {
    let root = seeded_root();
    let store = fast_store(root.path());
    let mut state = state_for(root.path());
    state.start_sync(&store);
    assert!(wait_for(|| {
        state.poll_sync(50);
        !state.is_loading()
    }));
    let out = TempDir::new().unwrap();

    state.dispatch(ViewEvent::SortKeyChanged(Some(SortKey::TimestampDesc)));
    let json_path = out.path().join("exported_data.json");
    assert_eq!(state.export_json_to(&json_path).unwrap(), 3);
    let parsed: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(parsed[0]["Name"], "Zenith Optics");
    assert_eq!(parsed[0]["OrganizationSize"], "40");
    assert_eq!(parsed[1]["OrganizationSize"], 250);
    assert_eq!(parsed[1]["Tags"], "widgets, bulk");

    state.dispatch(ViewEvent::ReportFieldsSelected(vec![
        bizdirectory::core::model::RecordField::Name,
        bizdirectory::core::model::RecordField::IndustrySector,
    ]));
    let csv_path = out.path().join("report.csv");
    assert_eq!(state.export_report_to(&csv_path, ReportFormat::Csv).unwrap(), 3);
    let csv_text = fs::read_to_string(&csv_path).unwrap();
    assert!(csv_text.starts_with("Name,Industry Sector\n"));
    assert!(csv_text.contains("Zenith Optics,Healthcare"));

    // Zero visible records still produce valid artifacts.
    state.dispatch(ViewEvent::SearchChanged("no such business".into()));
    assert_eq!(state.export_json_to(&json_path).unwrap(), 0);
    assert_eq!(fs::read_to_string(&json_path).unwrap().trim(), "[]");
    let txt_path = out.path().join("report.txt");
    assert_eq!(state.export_report_to(&txt_path, ReportFormat::Text).unwrap(), 0);
    let report = fs::read_to_string(&txt_path).unwrap();
    assert!(report.contains("Page 1 of 1"));
    assert!(report.contains("Industry Sector"));

    state.sync.stop();
}
