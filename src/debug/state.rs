//! Debug domain: state for the developer hotkeys.

use bevy::prelude::*;

/// Resource tracking debug mode state
#[derive(Resource, Debug, Default)]
pub struct DebugState {
    /// Whether the hero ignores every hit, hazards included
    pub invincible: bool,
    /// Whether to show the hero info overlay
    pub show_info: bool,
    /// Message to display temporarily in the overlay
    pub status_message: Option<(String, f32)>,
}

impl DebugState {
    /// Set a status message that will fade after a duration
    pub fn set_message(&mut self, message: impl Into<String>, duration: f32) {
        self.status_message = Some((message.into(), duration));
    }
}

/// Actions bound to Ctrl chords
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebugAction {
    ToggleInvincible,
    FullHeal,
    Kill,
    ToggleControl,
    DumpSnapshot,
    ToggleInfo,
}

impl DebugAction {
    pub const BINDINGS: [(KeyCode, DebugAction); 6] = [
        (KeyCode::KeyI, DebugAction::ToggleInvincible),
        (KeyCode::KeyH, DebugAction::FullHeal),
        (KeyCode::KeyK, DebugAction::Kill),
        (KeyCode::KeyR, DebugAction::ToggleControl),
        (KeyCode::KeyJ, DebugAction::DumpSnapshot),
        (KeyCode::KeyO, DebugAction::ToggleInfo),
    ];
}
