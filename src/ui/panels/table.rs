// BizDirectory - ui/panels/table.rs
//
// Table view with clickable column headers. A header click dispatches a
// column-sort event; the sorted order lives only in the projection.

use crate::app::state::AppState;
use crate::core::view_state::ViewEvent;
use crate::ui::panels::cards::empty_placeholder;
use crate::ui::panels::{truncate, RecordAction};
use crate::ui::theme;

/// Render the table (central area).
pub fn render(ui: &mut egui::Ui, state: &mut AppState) {
    if empty_placeholder(ui, state) {
        return;
    }

    let view = state.table();
    let gate_open = state.gate_open();
    let headers = view.headers();
    let mut clicked_column = None;
    let mut action: Option<RecordAction> = None;

    egui::ScrollArea::both()
        .auto_shrink([false; 2])
        .show(ui, |ui| {
            egui::Grid::new("records_table")
                .striped(true)
                .spacing([12.0, 6.0])
                .show(ui, |ui| {
                    for (column, header) in view.columns.iter().zip(&headers) {
                        if ui
                            .add(egui::Button::new(egui::RichText::new(header).strong()).frame(false))
                            .on_hover_text("Sort by this column")
                            .clicked()
                        {
                            clicked_column = Some(*column);
                        }
                    }
                    ui.label(egui::RichText::new("Actions").strong());
                    ui.end_row();

                    for row in &view.rows {
                        for cell in &row.cells {
                            let shown = truncate(cell, theme::TABLE_CELL_MAX_CHARS);
                            if shown.len() == cell.len() {
                                ui.label(shown);
                            } else {
                                ui.label(shown).on_hover_text(cell);
                            }
                        }
                        ui.horizontal(|ui| {
                            if ui.small_button("View").clicked() {
                                action = Some(RecordAction::View(row.id.clone()));
                            }
                            if gate_open {
                                if ui.small_button("Update").clicked() {
                                    action = Some(RecordAction::Update(row.id.clone()));
                                }
                                if ui
                                    .small_button(egui::RichText::new("Delete").color(theme::DANGER))
                                    .clicked()
                                {
                                    action = Some(RecordAction::Delete(row.id.clone()));
                                }
                            }
                        });
                        ui.end_row();
                    }
                });
        });

    if let Some(column) = clicked_column {
        state.dispatch(ViewEvent::ColumnClicked(column));
    }
    if let Some(action) = action {
        action.apply(state);
    }
}
