//! Debug domain: developer hotkeys for exercising the hero controller.
//!
//! All chords are Ctrl+key:
//! - I: toggle invincibility
//! - H: full heal
//! - K: kill
//! - R: relinquish/regain control
//! - J: dump a JSON snapshot of the hero to the log
//! - O: toggle the info overlay

mod state;
mod systems;
mod ui;


pub use state::{DebugAction, DebugState};
pub use systems::HeroSnapshot;

use bevy::prelude::*;

use crate::debug::systems::{handle_debug_hotkeys, log_hero_events, update_status_message};
use crate::debug::ui::update_debug_info_overlay;

pub struct DebugPlugin;

impl Plugin for DebugPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DebugState>().add_systems(
            Update,
            (
                handle_debug_hotkeys,
                update_status_message,
                update_debug_info_overlay,
                log_hero_events,
            )
                .chain(),
        );
    }
}
