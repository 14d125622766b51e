// BizDirectory - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. Configuration loading and logging initialisation
// 3. Headless export when an export flag is given
// 4. eframe GUI launch otherwise

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod gui;

// Re-export modules from the library crate so that `gui.rs` and other
// binary-side code can still use `crate::app::...`, `crate::core::...` etc.
pub use bizdirectory::app;

pub use bizdirectory::core;
pub use bizdirectory::platform;
pub use bizdirectory::ui;
pub use bizdirectory::util;

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// BizDirectory - Live business directory with filtering, facets, and export.
///
/// Point BizDirectory at a store directory (one subdirectory per collection,
/// one JSON file per record) to browse, filter, and export its listings.
#[derive(Parser, Debug)]
#[command(name = "BizDirectory", version, about)]
struct Cli {
    /// Store root directory (overrides `[store] root`).
    store_dir: Option<PathBuf>,

    /// Collection to list (overrides `[store] collection`).
    #[arg(short = 'c', long = "collection")]
    collection: Option<String>,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,

    /// Write the filtered list as JSON to PATH and exit without a window.
    #[arg(long = "export-json", value_name = "PATH")]
    export_json: Option<PathBuf>,

    /// Write the filtered list as a report to PATH and exit without a window.
    #[arg(long = "export-report", value_name = "PATH")]
    export_report: Option<PathBuf>,

    /// Report columns for a headless report, as comma-separated field keys
    /// (e.g. name,tags). Defaults to all seven.
    #[arg(long = "report-fields", value_name = "KEYS")]
    report_fields: Option<String>,

    /// Search term applied before a headless export.
    #[arg(long = "search", value_name = "TERM")]
    search: Option<String>,

    /// Sort key applied before a headless export (e.g. nameAsc, timestampDesc).
    #[arg(long = "sort", value_name = "KEY")]
    sort: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    // Resolve platform paths and config before logging so the configured
    // level and file apply from the first line. Warnings are replayed below.
    let platform_paths = platform::config::PlatformPaths::resolve();
    let (mut config, config_warnings) = platform::config::load_config(&platform_paths);

    util::logging::init(cli.debug, config.log_level.as_deref(), config.log_file.as_deref());

    tracing::info!(
        version = util::constants::APP_VERSION,
        debug = cli.debug,
        "BizDirectory starting"
    );
    for warning in &config_warnings {
        tracing::warn!("{}", warning);
    }

    if let Some(dir) = cli.store_dir.clone() {
        config.store_root = dir;
    }
    if let Some(ref collection) = cli.collection {
        if let Err(e) = platform::store::validate_id(collection) {
            eprintln!("Error: invalid collection name: {e}");
            std::process::exit(2);
        }
        config.collection = collection.clone();
    }

    let store = platform::store::FileStore::new(config.store_root.clone())
        .with_poll_interval(Duration::from_millis(config.poll_interval_ms));

    tracing::info!(
        store = %config.store_root.display(),
        collection = %config.collection,
        "Store configured"
    );

    if cli.export_json.is_some() || cli.export_report.is_some() {
        std::process::exit(run_headless(&cli, &config, &store));
    }

    // Create application state
    let session_store = app::session::FileSessionStore::new(platform_paths.session_file());
    let mut state = app::state::AppState::new(config, Box::new(session_store), cli.debug);
    for warning in config_warnings {
        state.push_warning(warning);
    }

    let dark_mode = state.config.dark_mode;
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(format!(
                "{} v{}",
                util::constants::APP_NAME,
                util::constants::APP_VERSION
            ))
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    let result = eframe::run_native(
        util::constants::APP_NAME,
        native_options,
        Box::new(move |cc| {
            ui::theme::apply(&cc.egui_ctx, dark_mode);
            Ok(Box::new(gui::DirectoryApp::new(state, Box::new(store))))
        }),
    );

    if let Err(e) = result {
        tracing::error!(error = %e, "Failed to launch GUI");
        eprintln!("Error: Failed to launch BizDirectory GUI: {e}");
        std::process::exit(1);
    }
}

/// Run a one-shot export and return the process exit code.
fn run_headless(
    cli: &Cli,
    config: &platform::config::AppConfig,
    store: &platform::store::FileStore,
) -> i32 {
    let mut request = app::headless::HeadlessRequest {
        json_path: cli.export_json.clone(),
        report_path: cli.export_report.clone(),
        report_format: config.report_format,
        rows_per_page: config.rows_per_page,
        ..Default::default()
    };
    request.view.display_mode = config.display_mode;
    if let Some(ref term) = cli.search {
        request.view.filter.search_term = term.clone();
    }
    if let Some(ref list) = cli.report_fields {
        match app::headless::parse_report_fields(list) {
            Ok(fields) => request.view.report_fields = fields,
            Err(unknown) => {
                let valid: Vec<&str> = core::model::RecordField::all().iter().map(|f| f.key()).collect();
                eprintln!("Error: unknown report field '{unknown}'. Valid fields: {}", valid.join(", "));
                return 2;
            }
        }
    }
    if let Some(ref key) = cli.sort {
        match core::filter::SortKey::from_key(key) {
            Some(k) => request.view.filter.sort_key = Some(k),
            None => {
                let valid: Vec<&str> = core::filter::SortKey::all().iter().map(|k| k.key()).collect();
                eprintln!("Error: unknown sort key '{key}'. Valid keys: {}", valid.join(", "));
                return 2;
            }
        }
    }

    match app::headless::run(store, &config.collection, &request) {
        Ok(summary) => {
            println!(
                "Exported {} of {} records ({} skipped).",
                summary.exported, summary.fetched, summary.skipped
            );
            0
        }
        Err(e) => {
            tracing::error!(error = %e, "Headless export failed");
            eprintln!("Error: {e}");
            1
        }
    }
}
