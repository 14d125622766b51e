// BizDirectory - app/state.rs
//
// Application state management. Owns the synchroniser, the view state, the
// derived filtered list and facets, and the admin gate.
// Owned by the eframe::App implementation (or the headless runner).
//
// Every change to records or view state goes through `recompute`, so the
// filtered list and facets are always a pure function of the two.

use crate::app::session::SessionStore;
use crate::app::sync::{SyncPoll, Synchronizer};
use crate::core::admin::{AdminGateState, AdminRegistry, AdminSession};
use crate::core::export::{self, ReportFormat};
use crate::core::facets::{extract_facets, Facets};
use crate::core::filter::filtered_records;
use crate::core::model::Record;
use crate::core::view::{project_cards, project_table, CardView, TableView};
use crate::core::view_state::{project, reduce, ViewEvent, ViewState};
use crate::platform::config::AppConfig;
use crate::platform::fs::atomic_write;
use crate::platform::store::DocumentStore;
use crate::util::constants::MAX_WARNINGS;
use crate::util::error::{DirectoryError, ExportError};
use std::path::Path;

/// Top-level application state.
pub struct AppState {
    pub config: AppConfig,

    /// Sole owner of the record list.
    pub sync: Synchronizer,

    /// Current view configuration.
    pub view: ViewState,

    /// Indices into `sync.records()` in view order.
    pub filtered_indices: Vec<usize>,

    /// Facet options from the full record list.
    pub facets: Facets,

    /// Persisted gate toggle plus entered identity and code.
    pub admin: AdminSession,

    pub registry: AdminRegistry,

    /// Result of the last explicit verification ("Go"), cleared on edit.
    pub admin_feedback: Option<bool>,

    session_store: Box<dyn SessionStore>,

    /// Record shown in the detail modal.
    pub selected_id: Option<String>,

    /// Record awaiting delete confirmation.
    pub pending_delete: Option<String>,

    /// Confirmed delete, executed by the event loop that owns the store.
    pub confirmed_delete: Option<String>,

    /// Status message for the status bar.
    pub status_message: String,

    /// Non-fatal warnings (config, store errors, skipped records).
    pub warnings: Vec<String>,

    pub debug_mode: bool,
}

impl AppState {
    /// Create initial state, restoring the admin session from `session_store`.
    pub fn new(config: AppConfig, session_store: Box<dyn SessionStore>, debug_mode: bool) -> Self {
        let admin = session_store.load().unwrap_or_default();
        let registry = AdminRegistry::new(config.admin_accounts.clone());
        let view = ViewState::with_display_mode(config.display_mode);
        Self {
            config,
            sync: Synchronizer::new(),
            view,
            filtered_indices: Vec::new(),
            facets: Facets::default(),
            admin,
            registry,
            admin_feedback: None,
            session_store,
            selected_id: None,
            pending_delete: None,
            confirmed_delete: None,
            status_message: "Ready.".to_string(),
            warnings: Vec::new(),
            debug_mode,
        }
    }

    // -------------------------------------------------------------------------
    // Records and derived state
    // -------------------------------------------------------------------------

    pub fn records(&self) -> &[Record] {
        self.sync.records()
    }

    /// The filtered view list as record references.
    pub fn visible_records(&self) -> Vec<&Record> {
        filtered_records(self.sync.records(), &self.filtered_indices)
    }

    pub fn is_loading(&self) -> bool {
        self.sync.is_loading()
    }

    /// Recompute the filtered list and facets from records and view state.
    pub fn recompute(&mut self) {
        let records = self.sync.records();
        self.filtered_indices = project(records, &self.view);
        self.facets = extract_facets(records);

        // Drop selections that point at records no longer present.
        let exists = |id: &String| records.iter().any(|r| &r.id == id);
        if !self.selected_id.as_ref().is_some_and(exists) {
            self.selected_id = None;
        }
        if !self.pending_delete.as_ref().is_some_and(exists) {
            self.pending_delete = None;
        }
    }

    /// Apply a view event and recompute.
    pub fn dispatch(&mut self, event: ViewEvent) {
        self.view = reduce(std::mem::take(&mut self.view), event);
        self.recompute();
    }

    /// Subscribe to the configured collection.
    pub fn start_sync(&mut self, store: &dyn DocumentStore) {
        let collection = self.config.collection.clone();
        self.sync.start(store, &collection);
        self.status_message = format!("Loading '{collection}'...");
    }

    /// Drain synchroniser messages and recompute when the list changed.
    pub fn poll_sync(&mut self, max: usize) -> SyncPoll {
        let poll = self.sync.poll(max);
        for error in &poll.errors {
            self.push_warning(error.clone());
        }
        if poll.skipped > 0 {
            self.push_warning(format!(
                "{} stored record(s) could not be read and were left out",
                poll.skipped
            ));
        }
        if poll.changed() {
            self.recompute();
            self.status_message = self.count_summary();
        } else if let Some(last) = poll.errors.last() {
            self.status_message = format!("Sync error: {last}");
        }
        poll
    }

    /// "N of M records" for the status bar.
    pub fn count_summary(&self) -> String {
        format!(
            "{} of {} records",
            self.filtered_indices.len(),
            self.sync.records().len()
        )
    }

    pub fn push_warning(&mut self, warning: String) {
        if self.warnings.len() >= MAX_WARNINGS {
            self.warnings.remove(0);
        }
        self.warnings.push(warning);
    }

    // -------------------------------------------------------------------------
    // Projections
    // -------------------------------------------------------------------------

    pub fn cards(&self) -> Vec<CardView<'_>> {
        project_cards(self.sync.records(), &self.filtered_indices, self.gate_open())
    }

    pub fn table(&self) -> TableView {
        project_table(self.sync.records(), &self.filtered_indices, self.view.column_sort)
    }

    pub fn selected_record(&self) -> Option<&Record> {
        let id = self.selected_id.as_ref()?;
        self.sync.records().iter().find(|r| &r.id == id)
    }

    pub fn record_by_id(&self, id: &str) -> Option<&Record> {
        self.sync.records().iter().find(|r| r.id == id)
    }

    // -------------------------------------------------------------------------
    // Admin gate
    // -------------------------------------------------------------------------

    /// Whether mutating affordances are rendered and may run: admin mode
    /// on with a verified identity and code.
    pub fn gate_open(&self) -> bool {
        self.admin.allows_mutation(&self.registry)
    }

    pub fn gate_state(&self) -> AdminGateState {
        self.admin.gate_state(&self.registry)
    }

    pub fn set_admin_enabled(&mut self, enabled: bool) {
        self.admin.set_enabled(enabled);
        self.admin_feedback = None;
        if !enabled {
            self.pending_delete = None;
        }
        tracing::info!(admin_mode = enabled, "Admin gate toggled");
        self.persist_admin();
    }

    pub fn set_admin_identity(&mut self, identity: String) {
        self.admin.identity = identity;
        self.after_credentials_changed();
    }

    pub fn set_admin_code(&mut self, code: String) {
        self.admin.code = code;
        self.after_credentials_changed();
    }

    fn after_credentials_changed(&mut self) {
        self.admin_feedback = None;
        if !self.gate_open() {
            self.pending_delete = None;
        }
        self.persist_admin();
    }

    /// Evaluate the entered identity and code against the registry.
    pub fn verify_admin(&mut self) -> bool {
        let verified = self.admin.is_verified(&self.registry);
        self.admin_feedback = Some(verified);
        // The code itself is never logged.
        tracing::info!(identity = %self.admin.identity, verified, "Admin verification");
        verified
    }

    fn persist_admin(&mut self) {
        if let Err(e) = self.session_store.save(&self.admin) {
            tracing::warn!(error = %e, "Failed to save admin session");
            self.push_warning(format!("Could not save session: {e}"));
        }
    }

    /// Save the current admin session (called on exit).
    pub fn save_session(&mut self) {
        self.persist_admin();
    }

    // -------------------------------------------------------------------------
    // Mutating actions
    // -------------------------------------------------------------------------

    /// Ask for confirmation before deleting `id`. Ignored while the gate is
    /// closed.
    pub fn request_delete(&mut self, id: &str) {
        if self.gate_open() && self.record_by_id(id).is_some() {
            self.pending_delete = Some(id.to_string());
        }
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Hand the pending delete to the event loop.
    pub fn confirm_delete(&mut self) {
        if self.gate_open() {
            self.confirmed_delete = self.pending_delete.take();
        }
    }

    /// Delete `id` through the store.
    ///
    /// The record leaves the list only after the store confirms; a failure
    /// leaves both lists unchanged. Returns whether the record was removed.
    pub fn delete_record(&mut self, store: &dyn DocumentStore, id: &str) -> bool {
        if !self.gate_open() {
            tracing::debug!(id, "Delete ignored: admin gate closed");
            return false;
        }
        self.pending_delete = None;

        let Some(collection) = self.sync.collection().map(str::to_string) else {
            tracing::warn!(id, "Delete ignored: no active collection");
            return false;
        };

        match store.delete_document(&collection, id) {
            Ok(()) => {
                self.sync.remove_record(id);
                self.recompute();
                self.status_message = format!("Deleted record '{id}'. {}", self.count_summary());
                true
            }
            Err(e) => {
                tracing::warn!(id, error = %e, "Delete failed");
                self.status_message = format!("Delete failed: {e}");
                self.push_warning(format!("Delete of '{id}' failed: {e}"));
                false
            }
        }
    }

    /// Record an edit request for the external form collaborator.
    pub fn request_update(&mut self, id: &str) {
        if !self.gate_open() {
            return;
        }
        let name = self.record_by_id(id).map(|r| r.name.clone()).unwrap_or_default();
        tracing::info!(id, name = %name, "Update requested");
        self.status_message = format!("Update requested for '{name}'");
    }

    // -------------------------------------------------------------------------
    // Export
    // -------------------------------------------------------------------------

    /// Write the filtered list as JSON to `path`.
    pub fn export_json_to(&mut self, path: &Path) -> Result<usize, DirectoryError> {
        let mut buf = Vec::new();
        let count = export::export_json(&self.visible_records(), &mut buf, path)?;
        write_export(path, &buf)?;
        tracing::info!(path = %path.display(), records = count, "JSON export complete");
        self.status_message = format!("Exported {count} records to {}", path.display());
        Ok(count)
    }

    /// Write the filtered list as a report to `path` in `format`.
    pub fn export_report_to(&mut self, path: &Path, format: ReportFormat) -> Result<usize, DirectoryError> {
        let report = export::build_report(
            &self.visible_records(),
            &self.view.effective_report_fields(),
            self.config.rows_per_page,
        );
        let mut buf = Vec::new();
        let count = export::write_report(&report, format, &mut buf, path)?;
        write_export(path, &buf)?;
        tracing::info!(
            path = %path.display(),
            records = count,
            pages = report.pages.len(),
            "Report export complete"
        );
        self.status_message = format!("Report with {count} rows written to {}", path.display());
        Ok(count)
    }
}

fn write_export(path: &Path, bytes: &[u8]) -> Result<(), DirectoryError> {
    atomic_write(path, bytes).map_err(|e| {
        ExportError::Io {
            path: path.to_path_buf(),
            source: e,
        }
        .into()
    })
}
