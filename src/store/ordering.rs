//! Ordering Controller: applies a drag-completion reorder to the panel
//! sequence, purely in terms of panel identifiers.

use crate::types::Panel;

/// Move the panel `active_id` to the position of `over_id`, preserving all
/// other relative positions. No-op (returns false) when `over_id` is
/// absent, equals `active_id`, or either id is unknown.
pub fn reorder(panels: &mut Vec<Panel>, active_id: &str, over_id: Option<&str>) -> bool {
    let Some(over_id) = over_id else {
        return false;
    };
    if over_id == active_id {
        return false;
    }

    let Some(from) = panels.iter().position(|p| p.id == active_id) else {
        return false;
    };
    let Some(to) = panels.iter().position(|p| p.id == over_id) else {
        return false;
    };

    let panel = panels.remove(from);
    panels.insert(to, panel);
    true
}
