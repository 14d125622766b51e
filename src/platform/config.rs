// BizDirectory - platform/config.rs
//
// Platform data directory resolution and config.toml loading with startup
// validation against the named constants in util::constants.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::core::admin::AdminAccount;
use crate::core::export::ReportFormat;
use crate::core::model::DisplayMode;
use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Resolved platform paths for BizDirectory data and configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory holding config.toml.
    pub config_dir: PathBuf,

    /// Data directory for the session file and the default store.
    pub data_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            let data_dir = proj_dirs.data_dir().to_path_buf();

            tracing::debug!(
                config = %config_dir.display(),
                data = %data_dir.display(),
                "Platform paths resolved"
            );

            Self {
                config_dir,
                data_dir,
            }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            Self {
                config_dir: PathBuf::from("."),
                data_dir: PathBuf::from("."),
            }
        }
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(constants::CONFIG_FILE_NAME)
    }

    pub fn session_file(&self) -> PathBuf {
        self.data_dir.join(constants::SESSION_FILE_NAME)
    }

    pub fn default_store_root(&self) -> PathBuf {
        self.data_dir.join(constants::STORE_DIR_NAME)
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored for forward compatibility.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    pub store: StoreSection,
    pub export: ExportSection,
    pub admin: AdminSection,
    pub ui: UiSection,
    pub logging: LoggingSection,
}

/// `[store]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct StoreSection {
    /// Directory holding one subdirectory per collection.
    pub root: Option<String>,
    /// Collection the listing subscribes to.
    pub collection: Option<String>,
    /// Change-detection poll interval in ms.
    pub poll_interval_ms: Option<u64>,
}

/// `[export]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ExportSection {
    pub rows_per_page: Option<usize>,
    /// "text" or "csv".
    pub report_format: Option<String>,
}

/// `[admin]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct AdminSection {
    pub accounts: Option<Vec<AdminAccount>>,
}

/// `[ui]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct UiSection {
    /// Theme: "dark" or "light".
    pub theme: Option<String>,
    /// Initial display mode: "card" or "table".
    pub display_mode: Option<String>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
    /// Log file path (empty = stderr only).
    pub file: Option<String>,
}

/// Validated application configuration derived from `config.toml`.
///
/// Invalid values produce actionable warnings and fall back to defaults.
#[derive(Debug, Clone)]
pub struct AppConfig {
    // -- Store --
    pub store_root: PathBuf,
    pub collection: String,
    pub poll_interval_ms: u64,

    // -- Export --
    pub rows_per_page: usize,
    pub report_format: ReportFormat,

    // -- Admin --
    /// Empty means the built-in registry.
    pub admin_accounts: Vec<AdminAccount>,

    // -- UI --
    /// Dark mode (true) or light mode (false).
    pub dark_mode: bool,
    pub display_mode: DisplayMode,

    // -- Logging --
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
    pub log_file: Option<String>,
}

impl AppConfig {
    /// Defaults with the store rooted at `store_root`.
    pub fn with_store_root(store_root: PathBuf) -> Self {
        Self {
            store_root,
            collection: constants::DEFAULT_COLLECTION.to_string(),
            poll_interval_ms: constants::STORE_POLL_INTERVAL_MS,
            rows_per_page: constants::DEFAULT_REPORT_ROWS_PER_PAGE,
            report_format: ReportFormat::default(),
            admin_accounts: Vec::new(),
            dark_mode: true,
            display_mode: DisplayMode::default(),
            log_level: None,
            log_file: None,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::with_store_root(PathBuf::from(constants::STORE_DIR_NAME))
    }
}

/// Load and validate `config.toml` from the platform config directory.
///
/// Returns `AppConfig` with validated values and a list of non-fatal warnings.
/// If the file does not exist, returns defaults with no warnings (first-run).
/// If the file is unparseable, returns defaults with a warning so the
/// application still starts but the user is informed.
pub fn load_config(paths: &PlatformPaths) -> (AppConfig, Vec<String>) {
    let config_path = paths.config_file();
    let defaults = AppConfig::with_store_root(paths.default_store_root());

    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "No config.toml found; using defaults");
        return (defaults, Vec::new());
    }

    let content = match std::fs::read_to_string(&config_path) {
        Ok(c) => c,
        Err(e) => {
            let err = ConfigError::Io {
                path: config_path.clone(),
                source: e,
            };
            tracing::warn!(error = %err, "Using default configuration");
            return (defaults, vec![format!("{err}. Using defaults.")]);
        }
    };

    tracing::info!(path = %config_path.display(), "Loaded config.toml");
    parse_config(&content, &config_path, defaults)
}

/// Parse and validate config text on top of `defaults`.
pub fn parse_config(content: &str, config_path: &Path, defaults: AppConfig) -> (AppConfig, Vec<String>) {
    let mut warnings: Vec<String> = Vec::new();

    let raw: RawConfig = match toml::from_str(content) {
        Ok(r) => r,
        Err(e) => {
            let err = ConfigError::TomlParse {
                path: config_path.to_path_buf(),
                source: e,
            };
            tracing::warn!(error = %err, "Using default configuration");
            warnings.push(format!("{err}. Using defaults."));
            return (defaults, warnings);
        }
    };

    let mut config = defaults;

    // -- Store: root --
    if let Some(ref root) = raw.store.root {
        if root.trim().is_empty() {
            warnings.push("[store] root is empty. Using the default store directory.".to_string());
        } else {
            config.store_root = PathBuf::from(root);
        }
    }

    // -- Store: collection --
    if let Some(ref collection) = raw.store.collection {
        let name = collection.trim();
        if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
            warnings.push(format!(
                "[store] collection = \"{collection}\" is not a valid collection name. Using default ({}).",
                constants::DEFAULT_COLLECTION,
            ));
        } else {
            config.collection = name.to_string();
        }
    }

    // -- Store: poll_interval_ms --
    if let Some(ms) = raw.store.poll_interval_ms {
        if (constants::MIN_STORE_POLL_INTERVAL_MS..=constants::MAX_STORE_POLL_INTERVAL_MS).contains(&ms) {
            config.poll_interval_ms = ms;
        } else {
            warnings.push(format!(
                "[store] poll_interval_ms = {ms} is out of range ({}-{}). Using default ({}).",
                constants::MIN_STORE_POLL_INTERVAL_MS,
                constants::MAX_STORE_POLL_INTERVAL_MS,
                constants::STORE_POLL_INTERVAL_MS,
            ));
        }
    }

    // -- Export: rows_per_page --
    if let Some(rows) = raw.export.rows_per_page {
        if (constants::MIN_REPORT_ROWS_PER_PAGE..=constants::MAX_REPORT_ROWS_PER_PAGE).contains(&rows) {
            config.rows_per_page = rows;
        } else {
            warnings.push(format!(
                "[export] rows_per_page = {rows} is out of range ({}-{}). Using default ({}).",
                constants::MIN_REPORT_ROWS_PER_PAGE,
                constants::MAX_REPORT_ROWS_PER_PAGE,
                constants::DEFAULT_REPORT_ROWS_PER_PAGE,
            ));
        }
    }

    // -- Export: report_format --
    if let Some(ref format) = raw.export.report_format {
        match ReportFormat::from_name(format) {
            Some(f) => config.report_format = f,
            None => warnings.push(format!(
                "[export] report_format = \"{format}\" is not recognised. \
                 Expected \"text\" or \"csv\". Using default (text).",
            )),
        }
    }

    // -- Admin: accounts --
    if let Some(accounts) = raw.admin.accounts {
        let (valid, invalid): (Vec<AdminAccount>, Vec<AdminAccount>) = accounts
            .into_iter()
            .partition(|a| !a.name.trim().is_empty() && !a.code.is_empty());
        if !invalid.is_empty() {
            warnings.push(format!(
                "[admin] {} account(s) with an empty name or code were ignored.",
                invalid.len()
            ));
        }
        config.admin_accounts = valid;
    }

    // -- UI: theme --
    if let Some(ref theme) = raw.ui.theme {
        match theme.to_lowercase().as_str() {
            "dark" => config.dark_mode = true,
            "light" => config.dark_mode = false,
            other => {
                warnings.push(format!(
                    "[ui] theme = \"{other}\" is not recognised. Expected \"dark\" or \"light\". Using default (dark).",
                ));
            }
        }
    }

    // -- UI: display_mode --
    if let Some(ref mode) = raw.ui.display_mode {
        match mode.to_lowercase().as_str() {
            "card" | "cards" => config.display_mode = DisplayMode::Card,
            "table" => config.display_mode = DisplayMode::Table,
            other => {
                warnings.push(format!(
                    "[ui] display_mode = \"{other}\" is not recognised. Expected \"card\" or \"table\". Using default (card).",
                ));
            }
        }
    }

    // -- Logging: level --
    if let Some(ref level) = raw.logging.level {
        let valid = ["error", "warn", "info", "debug", "trace"];
        if valid.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.clone());
        } else {
            warnings.push(format!(
                "[logging] level = \"{level}\" is not recognised. \
                 Valid values: error, warn, info, debug, trace. Using default (info).",
            ));
        }
    }

    // -- Logging: file --
    if let Some(ref file) = raw.logging.file {
        if !file.is_empty() {
            config.log_file = Some(file.clone());
        }
    }

    if !warnings.is_empty() {
        tracing::warn!(
            count = warnings.len(),
            "Config validation produced warnings"
        );
    }

    (config, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> (AppConfig, Vec<String>) {
        parse_config(content, Path::new("config.toml"), AppConfig::default())
    }

    #[test]
    fn test_empty_config_is_defaults() {
        let (config, warnings) = parse("");
        assert!(warnings.is_empty());
        assert_eq!(config.collection, constants::DEFAULT_COLLECTION);
        assert_eq!(config.rows_per_page, constants::DEFAULT_REPORT_ROWS_PER_PAGE);
        assert_eq!(config.display_mode, DisplayMode::Card);
        assert!(config.admin_accounts.is_empty());
    }

    #[test]
    fn test_full_config() {
        let (config, warnings) = parse(
            r#"
            [store]
            root = "/srv/directory"
            collection = "businesses"
            poll_interval_ms = 250

            [export]
            rows_per_page = 20
            report_format = "csv"

            [[admin.accounts]]
            name = "Ops"
            code = "opscode"

            [ui]
            theme = "light"
            display_mode = "table"

            [logging]
            level = "debug"
            file = "/tmp/bizdirectory.log"
            "#,
        );
        assert!(warnings.is_empty(), "{warnings:?}");
        assert_eq!(config.store_root, PathBuf::from("/srv/directory"));
        assert_eq!(config.collection, "businesses");
        assert_eq!(config.poll_interval_ms, 250);
        assert_eq!(config.rows_per_page, 20);
        assert_eq!(config.report_format, ReportFormat::Csv);
        assert_eq!(config.admin_accounts, vec![AdminAccount::new("Ops", "opscode")]);
        assert!(!config.dark_mode);
        assert_eq!(config.display_mode, DisplayMode::Table);
        assert_eq!(config.log_level.as_deref(), Some("debug"));
        assert_eq!(config.log_file.as_deref(), Some("/tmp/bizdirectory.log"));
    }

    #[test]
    fn test_out_of_range_values_warn_and_fall_back() {
        let (config, warnings) = parse(
            r#"
            [store]
            poll_interval_ms = 5
            collection = "../etc"

            [export]
            rows_per_page = 0
            report_format = "pdf"
            "#,
        );
        assert_eq!(warnings.len(), 4);
        assert_eq!(config.poll_interval_ms, constants::STORE_POLL_INTERVAL_MS);
        assert_eq!(config.collection, constants::DEFAULT_COLLECTION);
        assert_eq!(config.rows_per_page, constants::DEFAULT_REPORT_ROWS_PER_PAGE);
        assert_eq!(config.report_format, ReportFormat::Text);
    }

    #[test]
    fn test_blank_admin_accounts_ignored() {
        let (config, warnings) = parse(
            r#"
            [admin]
            accounts = [{ name = "", code = "x" }, { name = "Ok", code = "y" }]
            "#,
        );
        assert_eq!(warnings.len(), 1);
        assert_eq!(config.admin_accounts.len(), 1);
    }

    #[test]
    fn test_unparseable_config_uses_defaults() {
        let (config, warnings) = parse("[store\nroot=");
        assert_eq!(warnings.len(), 1);
        assert_eq!(config.collection, constants::DEFAULT_COLLECTION);
    }

    #[test]
    fn test_missing_file_is_silent() {
        let dir = tempfile::tempdir().unwrap();
        let paths = PlatformPaths {
            config_dir: dir.path().to_path_buf(),
            data_dir: dir.path().join("data"),
        };
        let (config, warnings) = load_config(&paths);
        assert!(warnings.is_empty());
        assert_eq!(config.store_root, dir.path().join("data").join(constants::STORE_DIR_NAME));
    }
}
