//! Level domain: the test room and its triggers.

mod components;
mod spawn;
mod systems;

pub use components::{
    Ground, HazardRespawnMarker, PendingSceneEntry, RespawnMarker, SceneGate, WalkZone, Wall,
};

use bevy::prelude::*;

use crate::core::gameplay_active;

pub struct LevelPlugin;

impl Plugin for LevelPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn::spawn_test_room).add_systems(
            FixedUpdate,
            (
                systems::apply_level_markers,
                systems::detect_scene_gates,
                systems::advance_scene_entry,
            )
                .chain()
                .run_if(gameplay_active),
        );
    }
}
