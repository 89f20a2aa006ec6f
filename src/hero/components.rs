//! Hero domain: ECS components and physics layers around the controller.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::hero::combat::{AttackDirection, SlashKind};
use crate::hero::damage::{CollisionSide, HazardKind, HitEvent};

/// Physics layers for collision filtering
#[derive(PhysicsLayer, Clone, Copy, Debug, Default)]
pub enum GameLayer {
    #[default]
    Default,
    /// Ground surfaces (floors, platforms)
    Ground,
    /// Wall surfaces
    Wall,
    /// The hero's body
    Player,
    /// Things the hero can strike and bounce off
    Enemy,
    /// Damage volumes (spikes, acid)
    Hazard,
    /// Sensors (gates, markers, zones) - should not block movement
    Sensor,
    /// Hero slashes
    PlayerHitbox,
    /// Terrain a strike rebounds off. Always paired with Ground or Wall
    SoftTerrain,
}

/// Layers for a static terrain piece. Soft terrain also joins `SoftTerrain`
/// so strikes into it recoil the hero.
pub fn terrain_layers(surface: GameLayer, soft: bool) -> CollisionLayers {
    if soft {
        CollisionLayers::new([surface, GameLayer::SoftTerrain], [GameLayer::Player])
    } else {
        CollisionLayers::new(surface, [GameLayer::Player])
    }
}

pub fn soft_terrain_filter() -> SpatialQueryFilter {
    SpatialQueryFilter::from_mask(GameLayer::SoftTerrain)
}

#[derive(Component, Debug)]
pub struct Player;

/// Layers the hero's body collides with while present in the world.
pub fn hero_collision_layers() -> CollisionLayers {
    CollisionLayers::new(
        GameLayer::Player,
        [
            GameLayer::Ground,
            GameLayer::Wall,
            GameLayer::Enemy,
            GameLayer::Hazard,
            GameLayer::Sensor,
        ],
    )
}

/// Hurts the hero on contact.
#[derive(Component, Debug, Clone, Copy)]
pub struct DamageHero {
    pub amount: u32,
    pub hazard: HazardKind,
}

impl DamageHero {
    /// The hit this damager deals on contact. The side comes from which way
    /// the damager sits horizontally.
    pub fn hit_from(&self, source: Entity, hero_x: f32, damager_x: f32) -> HitEvent {
        let side = if damager_x > hero_x {
            CollisionSide::Right
        } else {
            CollisionSide::Left
        };
        HitEvent {
            source: Some(source),
            side,
            amount: self.amount,
            hazard: self.hazard,
        }
    }
}

/// The hero's hurtbox. Ordinary contact hits are held until after the
/// controller has ticked; hazards apply immediately.
#[derive(Component, Debug, Default)]
pub struct HeroHurtbox {
    pub inactive: bool,
    pub buffered: Option<HitEvent>,
}

impl HeroHurtbox {
    /// Route one contact. Hazards come back for immediate use; only the first
    /// ordinary hit of a step is held. An inactive hurtbox drops everything.
    pub fn receive(&mut self, hit: HitEvent) -> Option<HitEvent> {
        if self.inactive {
            self.buffered = None;
            return None;
        }
        if hit.hazard != HazardKind::None {
            return Some(hit);
        }
        if self.buffered.is_none() {
            self.buffered = Some(hit);
        }
        None
    }

    pub fn take_buffered(&mut self) -> Option<HitEvent> {
        let hit = self.buffered.take();
        if self.inactive { None } else { hit }
    }
}

/// Downward strikes on this entity bounce the hero.
#[derive(Component, Debug)]
pub struct Bounceable;

/// A live slash spawned from the slash library.
#[derive(Component, Debug)]
pub struct SlashHitbox {
    pub owner: Entity,
    pub kind: SlashKind,
    pub direction: AttackDirection,
    pub hit_entities: Vec<Entity>,
}

#[derive(Component, Debug)]
pub struct SlashLifetime(pub f32);

/// Short-lived visual effect (landing dust, terrain spark, hazard splash).
#[derive(Component, Debug)]
pub struct HeroEffect {
    pub lifetime: f32,
    pub total: f32,
}
