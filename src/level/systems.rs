//! Level domain: triggers that feed the hero controller.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::hero::{HeroController, HeroFlag, Player};
use crate::level::components::{
    HazardRespawnMarker, PendingSceneEntry, RespawnMarker, SceneGate, WalkZone,
};

/// Delay between walking out of a gate and the room being "reloaded".
const SCENE_SWAP_TIME: f32 = 0.35;
/// Time the hero waits at the entry gate before walking in.
const ENTRY_DELAY: f32 = 0.2;

/// Respawn markers, hazard respawn markers and walk zones the hero overlaps.
pub(crate) fn apply_level_markers(
    mut heroes: Query<(&CollidingEntities, &mut HeroController), With<Player>>,
    respawns: Query<&RespawnMarker>,
    hazard_respawns: Query<&HazardRespawnMarker>,
    walk_zones: Query<(), With<WalkZone>>,
) {
    for (colliding, mut controller) in &mut heroes {
        let mut in_walk_zone = false;
        for &entity in colliding.iter() {
            if let Ok(marker) = respawns.get(entity) {
                controller.set_respawn_point(marker.point);
            }
            if let Ok(marker) = hazard_respawns.get(entity) {
                controller.set_hazard_respawn_point(marker.point);
            }
            in_walk_zone |= walk_zones.contains(entity);
        }
        if controller.flag(HeroFlag::InWalkZone) != in_walk_zone {
            controller.set_flag(HeroFlag::InWalkZone, in_walk_zone);
        }
    }
}

/// Start a scene exit when the hero touches a gate.
pub(crate) fn detect_scene_gates(
    mut commands: Commands,
    pending: Option<Res<PendingSceneEntry>>,
    mut heroes: Query<(&CollidingEntities, &mut HeroController), With<Player>>,
    gates: Query<&SceneGate>,
) {
    if pending.is_some() {
        return;
    }

    for (colliding, mut controller) in &mut heroes {
        if controller.flag(HeroFlag::Transitioning)
            || controller.flags().any_death()
            || controller.is_respawning()
        {
            continue;
        }
        let Some(gate) = colliding.iter().find_map(|&entity| gates.get(entity).ok()) else {
            continue;
        };

        controller.leave_scene(gate.edge);
        commands.insert_resource(PendingSceneEntry {
            destination: gate.destination,
            remaining: SCENE_SWAP_TIME,
        });
    }
}

/// Count down the scene swap and bring the hero back in.
pub(crate) fn advance_scene_entry(
    mut commands: Commands,
    time: Res<Time>,
    pending: Option<ResMut<PendingSceneEntry>>,
    mut heroes: Query<&mut HeroController, With<Player>>,
) {
    let Some(mut pending) = pending else {
        return;
    };

    pending.remaining -= time.delta_secs();
    if pending.remaining > 0.0 {
        return;
    }

    for mut controller in &mut heroes {
        controller.enter_scene(pending.destination, ENTRY_DELAY);
    }
    info!("Scene swap complete, entering at {:?}", pending.destination.position);
    commands.remove_resource::<PendingSceneEntry>();
}
