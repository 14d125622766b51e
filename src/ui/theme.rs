// BizDirectory - ui/theme.rs
//
// Colour scheme, visuals selection, and layout constants.
// No dependencies on app state or business logic.

use egui::Color32;

/// Apply dark or light visuals to the context.
pub fn apply(ctx: &egui::Context, dark_mode: bool) {
    let visuals = if dark_mode {
        egui::Visuals::dark()
    } else {
        egui::Visuals::light()
    };
    ctx.set_visuals(visuals);
}

/// Colour of the admin gate badge for the current verification result.
pub fn gate_colour(verified: Option<bool>) -> Color32 {
    match verified {
        Some(true) => VERIFIED,
        Some(false) => UNVERIFIED,
        None => Color32::GRAY,
    }
}

pub const VERIFIED: Color32 = Color32::from_rgb(34, 197, 94); // Green 500
pub const UNVERIFIED: Color32 = Color32::from_rgb(217, 119, 6); // Amber 600
pub const DANGER: Color32 = Color32::from_rgb(220, 38, 38); // Red 600
pub const TAG_BG: Color32 = Color32::from_rgba_premultiplied(59, 130, 246, 40); // Blue 500

/// Status bar colours.
pub const STATUS_BG: Color32 = Color32::from_rgb(31, 41, 55); // Gray 800
pub const STATUS_TEXT: Color32 = Color32::from_rgb(209, 213, 219); // Gray 300

/// Layout constants.
pub const SIDEBAR_WIDTH: f32 = 260.0;
pub const CARD_WIDTH: f32 = 280.0;
pub const CARD_INFO_PREVIEW_CHARS: usize = 120;
pub const TABLE_CELL_MAX_CHARS: usize = 60;
pub const DETAIL_WINDOW_WIDTH: f32 = 420.0;
