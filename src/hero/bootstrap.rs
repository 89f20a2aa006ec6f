//! Hero domain: spawning the hero from loaded content.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::content::SlashLibrary;
use crate::hero::components::{HeroHurtbox, Player, hero_collision_layers};
use crate::hero::controller::HeroController;
use crate::hero::tuning::HeroTuning;

pub const HERO_SIZE: Vec2 = Vec2::new(24.0, 48.0);
pub const HERO_SPAWN: Vec2 = Vec2::new(0.0, 100.0);

pub(crate) fn spawn_hero(
    mut commands: Commands,
    tuning: Res<HeroTuning>,
    slashes: Res<SlashLibrary>,
    existing: Query<Entity, With<Player>>,
) {
    if !existing.is_empty() {
        info!("Hero already exists, skipping spawn");
        return;
    }

    commands.insert_resource(Gravity(Vec2::NEG_Y * tuning.gravity));

    let controller = HeroController::new(tuning.clone(), HERO_SPAWN, slashes.kinds());
    info!(
        "Spawning hero: health={}, run_speed={}, slashes={}",
        tuning.max_health,
        tuning.run_speed,
        slashes.len()
    );

    commands.spawn((
        // Identity & control
        (Player, controller, HeroHurtbox::default()),
        // Rendering
        Sprite {
            color: Color::srgb(0.9, 0.9, 0.9),
            custom_size: Some(HERO_SIZE),
            ..default()
        },
        Transform::from_xyz(HERO_SPAWN.x, HERO_SPAWN.y, 0.0),
        Visibility::default(),
        // Physics
        (
            RigidBody::Dynamic,
            Collider::rectangle(HERO_SIZE.x, HERO_SIZE.y),
            LockedAxes::ROTATION_LOCKED,
            LinearVelocity::default(),
            GravityScale(1.0),
            Friction::new(0.0),
            CollidingEntities::default(),
            CollisionEventsEnabled,
            hero_collision_layers(),
        ),
    ));
}
