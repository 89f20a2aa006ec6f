//! Level domain: markers and triggers the hero reacts to.

use bevy::prelude::*;

use crate::hero::{EntryGate, SceneEdge};

/// Marker for ground colliders
#[derive(Component, Debug)]
pub struct Ground;

/// Marker for wall colliders
#[derive(Component, Debug)]
pub struct Wall;

/// Touching this sends the hero out through `edge` and back in at
/// `destination`.
#[derive(Component, Debug, Clone, Copy)]
pub struct SceneGate {
    pub edge: SceneEdge,
    pub destination: EntryGate,
}

/// Sets where the hero reappears after a lethal hazard.
#[derive(Component, Debug, Clone, Copy)]
pub struct HazardRespawnMarker {
    pub point: Vec2,
}

/// Sets where the hero reappears after dying.
#[derive(Component, Debug, Clone, Copy)]
pub struct RespawnMarker {
    pub point: Vec2,
}

/// The hero walks instead of runs inside this volume.
#[derive(Component, Debug)]
pub struct WalkZone;

/// Scene swap in progress: the hero re-enters once the timer runs out.
#[derive(Resource, Debug)]
pub struct PendingSceneEntry {
    pub destination: EntryGate,
    pub remaining: f32,
}
