// BizDirectory - ui/panels/cards.rs
//
// Card grid for the filtered view list. Update and Delete buttons appear
// only on cards whose projection carries `show_mutations`.

use crate::app::state::AppState;
use crate::core::view::CardView;
use crate::ui::panels::{truncate, RecordAction};
use crate::ui::theme;

/// Render the card grid (central area).
pub fn render(ui: &mut egui::Ui, state: &mut AppState) {
    if empty_placeholder(ui, state) {
        return;
    }

    let mut action: Option<RecordAction> = None;
    {
        let cards = state.cards();
        egui::ScrollArea::vertical()
            .auto_shrink([false; 2])
            .show(ui, |ui| {
                ui.horizontal_wrapped(|ui| {
                    for card in &cards {
                        card_frame(ui, card, &mut action);
                    }
                });
            });
    }

    if let Some(action) = action {
        action.apply(state);
    }
}

/// Loading and empty-list messages shared with the table view.
pub(crate) fn empty_placeholder(ui: &mut egui::Ui, state: &AppState) -> bool {
    if state.is_loading() {
        ui.centered_and_justified(|ui| {
            ui.spinner();
        });
        return true;
    }
    if state.filtered_indices.is_empty() {
        ui.centered_and_justified(|ui| {
            if state.records().is_empty() {
                ui.label("The directory is empty.");
            } else {
                ui.label("No businesses match the current filters.");
            }
        });
        return true;
    }
    false
}

fn card_frame(ui: &mut egui::Ui, card: &CardView<'_>, action: &mut Option<RecordAction>) {
    let record = card.record;
    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.set_width(theme::CARD_WIDTH);
        ui.vertical(|ui| {
            ui.label(egui::RichText::new(&record.name).strong().size(16.0));
            if !record.business_type.is_empty() || !record.industry_sector.is_empty() {
                ui.label(
                    egui::RichText::new(format!(
                        "{} \u{00b7} {}",
                        record.business_type, record.industry_sector
                    ))
                    .weak(),
                );
            }
            if !record.info.is_empty() {
                ui.label(truncate(&record.info, theme::CARD_INFO_PREVIEW_CHARS));
            }
            if !record.tags.is_empty() {
                ui.horizontal_wrapped(|ui| {
                    for tag in &record.tags {
                        ui.label(egui::RichText::new(tag).small().background_color(theme::TAG_BG));
                    }
                });
            }
            ui.label(egui::RichText::new(&record.timestamp).small().weak());

            ui.horizontal(|ui| {
                if ui.button("View").clicked() {
                    *action = Some(RecordAction::View(record.id.clone()));
                }
                if card.show_mutations {
                    if ui.button("Update").clicked() {
                        *action = Some(RecordAction::Update(record.id.clone()));
                    }
                    if ui
                        .button(egui::RichText::new("Delete").color(theme::DANGER))
                        .clicked()
                    {
                        *action = Some(RecordAction::Delete(record.id.clone()));
                    }
                }
            });
        });
    });
}
