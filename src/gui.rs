// BizDirectory - gui.rs
//
// Top-level eframe::App implementation.
// Wires together all UI panels, drains the synchroniser each frame, and
// performs the store and file actions that panels request.

use crate::app::state::AppState;
use crate::core::model::DisplayMode;
use crate::core::view_state::ViewEvent;
use crate::platform::store::DocumentStore;
use crate::ui;
use crate::util::constants::{EXPORT_JSON_FILE_NAME, MAX_SYNC_MESSAGES_PER_FRAME};
use std::path::PathBuf;
use std::time::Duration;

/// The BizDirectory application.
pub struct DirectoryApp {
    pub state: AppState,
    store: Box<dyn DocumentStore>,
    /// Last export written, for "Show in folder".
    last_export: Option<PathBuf>,
}

impl DirectoryApp {
    /// Create the application and start the live subscription.
    pub fn new(mut state: AppState, store: Box<dyn DocumentStore>) -> Self {
        state.start_sync(store.as_ref());
        Self {
            state,
            store,
            last_export: None,
        }
    }

    fn export_json(&mut self) {
        let Some(dest) = rfd::FileDialog::new()
            .add_filter("JSON", &["json"])
            .set_file_name(EXPORT_JSON_FILE_NAME)
            .save_file()
        else {
            return;
        };
        match self.state.export_json_to(&dest) {
            Ok(_) => self.last_export = Some(dest),
            Err(e) => {
                tracing::warn!(error = %e, "JSON export failed");
                self.state.status_message = format!("JSON export failed: {e}");
            }
        }
    }

    fn export_report(&mut self) {
        let format = self.state.config.report_format;
        let Some(dest) = rfd::FileDialog::new()
            .add_filter("Report", &[format.extension()])
            .set_file_name(format.file_name())
            .save_file()
        else {
            return;
        };
        match self.state.export_report_to(&dest, format) {
            Ok(_) => self.last_export = Some(dest),
            Err(e) => {
                tracing::warn!(error = %e, "Report export failed");
                self.state.status_message = format!("Report export failed: {e}");
            }
        }
    }
}

impl eframe::App for DirectoryApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Drain store snapshots within the per-frame budget.
        let poll = self.state.poll_sync(MAX_SYNC_MESSAGES_PER_FRAME);
        if poll.changed() || !poll.errors.is_empty() {
            ctx.request_repaint();
        }
        // Snapshots arrive from a background thread; keep polling even when
        // the user is idle.
        ctx.request_repaint_after(Duration::from_millis(self.state.config.poll_interval_ms));

        // confirmed_delete: the confirmation dialog approved a delete.
        if let Some(id) = self.state.confirmed_delete.take() {
            self.state.delete_record(self.store.as_ref(), &id);
        }

        // Top menu bar
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    // Empty lists still export (header-only report, `[]` JSON).
                    if ui.button("Export JSON\u{2026}").clicked() {
                        ui.close_menu();
                        self.export_json();
                    }
                    if ui.button("Export Report\u{2026}").clicked() {
                        ui.close_menu();
                        self.export_report();
                    }
                    let has_export = self.last_export.is_some();
                    ui.add_enabled_ui(has_export, |ui| {
                        if ui.button("Show Last Export in Folder").clicked() {
                            if let Some(ref path) = self.last_export {
                                crate::platform::fs::reveal_in_file_manager(path);
                            }
                            ui.close_menu();
                        }
                    });
                    ui.separator();
                    if ui.button("Exit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });
                ui.menu_button("View", |ui| {
                    for mode in [DisplayMode::Card, DisplayMode::Table] {
                        let active = self.state.view.display_mode == mode;
                        if ui.radio(active, mode.label()).clicked() && !active {
                            self.state.dispatch(ViewEvent::DisplayModeToggled);
                            ui.close_menu();
                        }
                    }
                    ui.separator();
                    let mut dark = self.state.config.dark_mode;
                    if ui.checkbox(&mut dark, "Dark theme").changed() {
                        self.state.config.dark_mode = dark;
                        ui::theme::apply(ctx, dark);
                    }
                });
            });
        });

        // Status bar
        egui::TopBottomPanel::bottom("status_bar")
            .frame(egui::Frame::default().fill(ui::theme::STATUS_BG).inner_margin(4.0))
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(
                        egui::RichText::new(&self.state.status_message).color(ui::theme::STATUS_TEXT),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(
                            egui::RichText::new(self.state.count_summary())
                                .color(ui::theme::STATUS_TEXT),
                        );
                        if !self.state.warnings.is_empty() {
                            ui.label(
                                egui::RichText::new(format!("{} warning(s)", self.state.warnings.len()))
                                    .color(ui::theme::UNVERIFIED),
                            )
                            .on_hover_text(self.state.warnings.join("\n"));
                        }
                    });
                });
            });

        // Left sidebar
        egui::SidePanel::left("sidebar")
            .default_width(ui::theme::SIDEBAR_WIDTH)
            .resizable(true)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .auto_shrink([false; 2])
                    .show(ui, |ui| {
                        ui::panels::admin::render(ui, &mut self.state);
                        ui.separator();
                        ui::panels::controls::render(ui, &mut self.state);
                    });
            });

        // Central panel
        egui::CentralPanel::default().show(ctx, |ui| match self.state.view.display_mode {
            DisplayMode::Card => ui::panels::cards::render(ui, &mut self.state),
            DisplayMode::Table => ui::panels::table::render(ui, &mut self.state),
        });

        // Windows
        ui::panels::detail::render(ctx, &mut self.state);
        ui::panels::detail::render_delete_confirm(ctx, &mut self.state);
    }

    /// Called by eframe when the application window is about to close.
    ///
    /// Releases the store subscription and saves the admin session.
    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.state.sync.stop();
        self.state.save_session();
    }
}
