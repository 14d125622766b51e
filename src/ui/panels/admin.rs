// BizDirectory - ui/panels/admin.rs
//
// Admin gate controls: the toggle, identity picker, code entry, and the
// explicit "Go" feedback. Update and delete buttons render only while the
// toggle is on and the identity and code match the registry.

use crate::app::state::AppState;
use crate::core::admin::AdminGateState;
use crate::ui::theme;

/// Render the admin gate section of the sidebar.
pub fn render(ui: &mut egui::Ui, state: &mut AppState) {
    ui.heading("Admin");

    let mut enabled = state.admin.enabled;
    if ui.checkbox(&mut enabled, "Admin mode").changed() {
        state.set_admin_enabled(enabled);
    }

    if !state.admin.enabled {
        return;
    }

    let current = state.admin.identity.clone();
    let mut identity = current.clone();
    let selected_text = if identity.is_empty() {
        "Select admin".to_string()
    } else {
        identity.clone()
    };
    let names: Vec<String> = state.registry.names().map(str::to_string).collect();
    egui::ComboBox::from_id_salt("admin_identity")
        .selected_text(selected_text)
        .width(ui.available_width())
        .show_ui(ui, |ui| {
            for name in &names {
                ui.selectable_value(&mut identity, name.clone(), name);
            }
        });
    if identity != current {
        state.set_admin_identity(identity);
    }

    let mut code = state.admin.code.clone();
    let mut go = false;
    ui.horizontal(|ui| {
        let response = ui.add(
            egui::TextEdit::singleline(&mut code)
                .password(true)
                .hint_text("Secret code")
                .desired_width(ui.available_width() - 40.0),
        );
        if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
            go = true;
        }
        if ui.button("Go").clicked() {
            go = true;
        }
    });
    if code != state.admin.code {
        state.set_admin_code(code);
    }
    if go {
        state.verify_admin();
    }

    match state.admin_feedback {
        Some(true) => {
            ui.colored_label(theme::gate_colour(Some(true)), "Verified");
        }
        Some(false) => {
            ui.colored_label(theme::gate_colour(Some(false)), "Identity or code not recognised");
        }
        None => {
            if state.gate_state() == AdminGateState::EnabledUnverified {
                ui.label(egui::RichText::new("Not verified").weak());
            }
        }
    }
}
