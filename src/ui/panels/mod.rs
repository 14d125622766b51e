// BizDirectory - ui/panels/mod.rs

pub mod admin;
pub mod cards;
pub mod controls;
pub mod detail;
pub mod table;

use crate::app::state::AppState;

/// A per-record button press, collected while rendering and applied after
/// the record borrow ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordAction {
    View(String),
    Update(String),
    Delete(String),
}

impl RecordAction {
    pub fn apply(self, state: &mut AppState) {
        match self {
            RecordAction::View(id) => state.selected_id = Some(id),
            RecordAction::Update(id) => state.request_update(&id),
            RecordAction::Delete(id) => state.request_delete(&id),
        }
    }
}

/// Shorten `text` to at most `max` characters for previews.
pub(crate) fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max.saturating_sub(1)).collect();
    out.push('\u{2026}');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdef", 4), "abc\u{2026}");
        assert_eq!(truncate("", 0), "");
    }
}
