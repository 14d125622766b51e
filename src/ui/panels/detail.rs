// BizDirectory - ui/panels/detail.rs
//
// Record detail window ("View") and the delete confirmation dialog.

use crate::app::state::AppState;
use crate::core::model::Record;
use crate::ui::theme;

/// Render the detail window for `state.selected_id`, if any.
pub fn render(ctx: &egui::Context, state: &mut AppState) {
    let Some(record) = state.selected_record().cloned() else {
        return;
    };

    let mut open = true;
    egui::Window::new(&record.name)
        .id(egui::Id::new("record_detail"))
        .open(&mut open)
        .collapsible(false)
        .resizable(true)
        .default_width(theme::DETAIL_WINDOW_WIDTH)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            detail_grid(ui, &record);
            if !record.additional_notes.is_empty() {
                ui.separator();
                ui.label("Additional notes:");
                egui::ScrollArea::vertical().max_height(120.0).show(ui, |ui| {
                    ui.label(&record.additional_notes);
                });
            }
        });

    if !open {
        state.selected_id = None;
    }
}

fn detail_grid(ui: &mut egui::Ui, record: &Record) {
    egui::Grid::new("detail_grid")
        .num_columns(2)
        .spacing([8.0, 4.0])
        .show(ui, |ui| {
            let mut row = |label: &str, value: &str| {
                if !value.is_empty() {
                    ui.label(format!("{label}:"));
                    ui.label(value);
                    ui.end_row();
                }
            };
            row("Business type", &record.business_type);
            row("Industry sector", &record.industry_sector);
            row("Organization size", &record.organization_size.display());
            row("Info", &record.info);
            row("Email", &record.email);
            row("Contact", &record.contact);
            row("Website", &record.website);
            row("Availability", &record.availability);
            row("Tags", &record.tags.join(", "));
            row("Created", &record.timestamp);
            if let (Some(lat), Some(long)) = (record.latitude, record.longitude) {
                row("Location", &format!("{lat:.5}, {long:.5}"));
            }
            if let Some(ref url) = record.image_url {
                row("Image", url);
            }
        });
}

/// Render the delete confirmation dialog for `state.pending_delete`.
pub fn render_delete_confirm(ctx: &egui::Context, state: &mut AppState) {
    let Some(id) = state.pending_delete.clone() else {
        return;
    };
    let name = state
        .record_by_id(&id)
        .map(|r| r.name.clone())
        .unwrap_or_else(|| id.clone());

    let mut confirm = false;
    let mut cancel = false;
    egui::Window::new("Delete record?")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.label(format!("Delete '{name}' from the directory? This cannot be undone."));
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                if ui
                    .button(egui::RichText::new("Delete").color(theme::DANGER))
                    .clicked()
                {
                    confirm = true;
                }
                if ui.button("Cancel").clicked() {
                    cancel = true;
                }
            });
        });

    if confirm {
        state.confirm_delete();
    } else if cancel {
        state.cancel_delete();
    }
}
