// BizDirectory - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "BizDirectory";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "BizDirectory";

/// Current application version (updated by release script).
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Document store
// =============================================================================

/// Collection the directory listing subscribes to when none is configured.
pub const DEFAULT_COLLECTION: &str = "users";

/// Subdirectory of the platform data directory used as the default store root.
pub const STORE_DIR_NAME: &str = "store";

/// Glob pattern (file name only) identifying document files in a collection.
pub const DOCUMENT_FILE_PATTERN: &str = "*.json";

/// Maximum size of a single stored document in bytes. Larger files are
/// reported as store errors and left out of the snapshot.
pub const MAX_DOCUMENT_SIZE_BYTES: u64 = 1024 * 1024; // 1 MiB

/// How often the file store re-fingerprints a collection for changes (ms).
pub const STORE_POLL_INTERVAL_MS: u64 = 1_000;

/// How often the cancel flag is checked within each store poll sleep (ms).
pub const STORE_CANCEL_CHECK_INTERVAL_MS: u64 = 100;

/// Minimum user-configurable store poll interval (ms).
pub const MIN_STORE_POLL_INTERVAL_MS: u64 = 100;

/// Maximum user-configurable store poll interval (ms).
pub const MAX_STORE_POLL_INTERVAL_MS: u64 = 60_000; // 60 s

// =============================================================================
// Record normalisation
// =============================================================================

/// Separator used by the stored comma-delimited tag string.
pub const TAG_SEPARATOR: char = ',';

/// Separator used when tags are rendered back into a single cell.
pub const TAG_JOINER: &str = ", ";

/// Facet option label for records that leave the field blank.
pub const EMPTY_FACET_LABEL: &str = "(none)";

/// chrono format used for the locale display string of a record timestamp.
/// Produces e.g. `4/3/2024, 1:05:09 PM`.
pub const DISPLAY_TIMESTAMP_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

// =============================================================================
// Per-frame UI message budgets
// =============================================================================

/// Maximum number of synchroniser messages processed by the UI update loop
/// per frame. Remaining messages stay queued for the next frame.
pub const MAX_SYNC_MESSAGES_PER_FRAME: usize = 50;

/// Maximum number of non-fatal warnings kept in application state.
pub const MAX_WARNINGS: usize = 1_000;

// =============================================================================
// Export
// =============================================================================

/// File name suggested for the structured (JSON) export.
pub const EXPORT_JSON_FILE_NAME: &str = "exported_data.json";

/// File name suggested for the paginated text report.
pub const REPORT_TEXT_FILE_NAME: &str = "report.txt";

/// File name suggested for the CSV report.
pub const REPORT_CSV_FILE_NAME: &str = "report.csv";

/// Title printed at the top of every report page.
pub const REPORT_TITLE: &str = "Business Directory Report";

/// Default number of data rows per report page.
pub const DEFAULT_REPORT_ROWS_PER_PAGE: usize = 40;

/// Minimum configurable rows per report page.
pub const MIN_REPORT_ROWS_PER_PAGE: usize = 1;

/// Maximum configurable rows per report page.
pub const MAX_REPORT_ROWS_PER_PAGE: usize = 500;

/// Spaces between adjacent columns in the text report.
pub const REPORT_COLUMN_GAP: usize = 2;

// =============================================================================
// Admin visibility gate
// =============================================================================

/// Built-in admin registry used when config.toml supplies no accounts.
pub const DEFAULT_ADMIN_ACCOUNTS: &[(&str, &str)] =
    &[("Admin 1", "admin1code"), ("Admin 2", "admin2code")];

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Session persistence file name (stored in the platform data directory).
pub const SESSION_FILE_NAME: &str = "session.json";
