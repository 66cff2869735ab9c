//! Configurable key bindings for the two logical scroll actions.

use super::ScrollAction;
use crate::config::SyncConfig;

/// Resolve a pressed key token against the configured bindings. Tokens are
/// compared case-insensitively; an empty binding falls back to the default
/// (`j` forward, `k` backward).
pub fn scroll_action_for_key(config: &SyncConfig, pressed: &str) -> Option<ScrollAction> {
    let pressed = pressed.trim().to_ascii_lowercase();
    if pressed.is_empty() {
        return None;
    }
    if binding_matches(&config.key_scroll_forward, "j", &pressed) {
        Some(ScrollAction::Forward)
    } else if binding_matches(&config.key_scroll_backward, "k", &pressed) {
        Some(ScrollAction::Backward)
    } else {
        None
    }
}

fn binding_matches(raw: &str, fallback: &str, pressed: &str) -> bool {
    let normalized = raw.trim().to_ascii_lowercase();
    let expected = if normalized.is_empty() {
        fallback
    } else {
        normalized.as_str()
    };
    pressed == expected
}
