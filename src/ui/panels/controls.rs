// BizDirectory - ui/panels/controls.rs
//
// Sidebar view controls: search, facet checkboxes, pipeline sort, and the
// report column selection. Every change goes through `AppState::dispatch`.

use crate::app::state::AppState;
use crate::core::filter::SortKey;
use crate::core::model::RecordField;
use crate::core::view_state::ViewEvent;
use crate::util::constants::EMPTY_FACET_LABEL;

/// Render the view controls.
pub fn render(ui: &mut egui::Ui, state: &mut AppState) {
    // Events are collected first and dispatched after rendering so the
    // facet and filter borrows are released.
    let mut events: Vec<ViewEvent> = Vec::new();

    ui.heading("Search");
    let mut term = state.view.filter.search_term.clone();
    let response = ui.add(
        egui::TextEdit::singleline(&mut term)
            .hint_text("Name, info, or tag")
            .desired_width(f32::INFINITY),
    );
    if response.changed() {
        events.push(ViewEvent::SearchChanged(term));
    }

    ui.separator();

    // -- Sort --
    ui.label("Sort by:");
    let current = state.view.filter.sort_key;
    let selected_text = current.map(|k| k.label()).unwrap_or("Collection order");
    egui::ComboBox::from_id_salt("sort_key")
        .selected_text(selected_text)
        .width(ui.available_width())
        .show_ui(ui, |ui| {
            let mut choice = current;
            ui.selectable_value(&mut choice, None, "Collection order");
            for key in SortKey::all() {
                ui.selectable_value(&mut choice, Some(*key), key.label());
            }
            if choice != current {
                events.push(ViewEvent::SortKeyChanged(choice));
            }
        });

    ui.separator();

    // -- Facets --
    facet_section(
        ui,
        "Business type",
        &state.facets.business_types,
        |v| state.view.filter.business_types.contains(v),
        |v| events.push(ViewEvent::BusinessTypeToggled(v)),
    );
    ui.add_space(4.0);
    facet_section(
        ui,
        "Industry sector",
        &state.facets.industry_sectors,
        |v| state.view.filter.industry_sectors.contains(v),
        |v| events.push(ViewEvent::IndustrySectorToggled(v)),
    );

    ui.add_space(4.0);
    let has_filters = !state.view.filter.is_empty();
    ui.add_enabled_ui(has_filters, |ui| {
        if ui.button("Clear Filters").clicked() {
            events.push(ViewEvent::FiltersCleared);
        }
    });

    ui.separator();

    // -- Report columns --
    ui.collapsing("Report columns", |ui| {
        if state.view.report_fields.is_empty() {
            ui.label(egui::RichText::new("All columns (default)").weak());
        }
        for field in RecordField::all() {
            let mut checked = state.view.report_fields.contains(field);
            if ui.checkbox(&mut checked, field.label()).changed() {
                events.push(ViewEvent::ReportFieldToggled(*field));
            }
        }
        if !state.view.report_fields.is_empty() && ui.small_button("Reset").clicked() {
            events.push(ViewEvent::ReportFieldsSelected(Vec::new()));
        }
    });

    for event in events {
        state.dispatch(event);
    }
}

fn facet_section(
    ui: &mut egui::Ui,
    title: &str,
    options: &[String],
    is_selected: impl Fn(&str) -> bool,
    mut on_toggle: impl FnMut(String),
) {
    ui.label(format!("{title}:"));
    if options.is_empty() {
        ui.label(egui::RichText::new("No values yet").weak());
        return;
    }
    for option in options {
        let mut checked = is_selected(option);
        let label = if option.is_empty() {
            EMPTY_FACET_LABEL
        } else {
            option.as_str()
        };
        if ui.checkbox(&mut checked, label).changed() {
            on_toggle(option.clone());
        }
    }
}
