//! Core domain: app-wide setup shared by every other plugin.

mod resources;
mod systems;

use bevy::prelude::*;

pub use resources::{GameplayPaused, gameplay_active};

pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GameplayPaused>()
            .add_systems(Startup, systems::setup_camera)
            .add_systems(Update, (systems::toggle_pause, systems::follow_hero));
    }
}
