//! Level domain: the test room.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::hero::bootstrap::HERO_SPAWN;
use crate::hero::components::terrain_layers;
use crate::hero::{Bounceable, DamageHero, EntryGate, GameLayer, HazardKind, SceneEdge};
use crate::level::components::{
    Ground, HazardRespawnMarker, RespawnMarker, SceneGate, WalkZone, Wall,
};

pub(crate) fn spawn_test_room(mut commands: Commands) {
    let wall_color = Color::srgb(0.3, 0.3, 0.4);
    let soft_wall_color = Color::srgb(0.35, 0.3, 0.45);
    let ground_color = Color::srgb(0.4, 0.5, 0.4);
    let platform_color = Color::srgb(0.5, 0.4, 0.3);

    let ground_layers = terrain_layers(GameLayer::Ground, false);
    let wall_layers = terrain_layers(GameLayer::Wall, false);
    let sensor_layers = CollisionLayers::new(GameLayer::Sensor, [GameLayer::Player]);

    // Ground, running past the doorway on the right
    commands.spawn((
        Ground,
        Sprite {
            color: ground_color,
            custom_size: Some(Vec2::new(1200.0, 40.0)),
            ..default()
        },
        Transform::from_xyz(0.0, -200.0, 0.0),
        RigidBody::Static,
        Collider::rectangle(1200.0, 40.0),
        ground_layers,
    ));

    // Left wall, full height. Soft, so slashes into it recoil the hero
    commands.spawn((
        Wall,
        Sprite {
            color: soft_wall_color,
            custom_size: Some(Vec2::new(40.0, 500.0)),
            ..default()
        },
        Transform::from_xyz(-420.0, 50.0, 0.0),
        RigidBody::Static,
        Collider::rectangle(40.0, 500.0),
        terrain_layers(GameLayer::Wall, true),
    ));

    // Right wall, leaving a doorway at floor level
    commands.spawn((
        Wall,
        Sprite {
            color: wall_color,
            custom_size: Some(Vec2::new(40.0, 340.0)),
            ..default()
        },
        Transform::from_xyz(420.0, 130.0, 0.0),
        RigidBody::Static,
        Collider::rectangle(40.0, 340.0),
        wall_layers,
    ));

    // Platforms
    for (x, y, width) in [(-250.0, -60.0, 140.0), (180.0, 40.0, 160.0)] {
        commands.spawn((
            Ground,
            Sprite {
                color: platform_color,
                custom_size: Some(Vec2::new(width, 16.0)),
                ..default()
            },
            Transform::from_xyz(x, y, 0.0),
            RigidBody::Static,
            Collider::rectangle(width, 16.0),
            ground_layers,
        ));
    }

    // Spike strip
    commands.spawn((
        DamageHero {
            amount: 1,
            hazard: HazardKind::Spikes,
        },
        Sprite {
            color: Color::srgb(0.85, 0.85, 0.9),
            custom_size: Some(Vec2::new(80.0, 12.0)),
            ..default()
        },
        Transform::from_xyz(60.0, -174.0, 0.0),
        RigidBody::Static,
        Collider::rectangle(80.0, 12.0),
        Sensor,
        CollisionLayers::new(GameLayer::Hazard, [GameLayer::Player]),
    ));

    // Hazard respawn markers on either side of the spikes
    for x in [-40.0, 160.0] {
        commands.spawn((
            HazardRespawnMarker {
                point: Vec2::new(x, -150.0),
            },
            Transform::from_xyz(x, -150.0, 0.0),
            Collider::rectangle(40.0, 60.0),
            Sensor,
            sensor_layers,
        ));
    }

    // Training dummy: hurts on contact, bounces downward strikes
    commands.spawn((
        Bounceable,
        DamageHero {
            amount: 1,
            hazard: HazardKind::None,
        },
        Sprite {
            color: Color::srgb(0.7, 0.3, 0.3),
            custom_size: Some(Vec2::new(32.0, 40.0)),
            ..default()
        },
        Transform::from_xyz(-120.0, -160.0, 0.0),
        RigidBody::Static,
        Collider::rectangle(32.0, 40.0),
        CollisionEventsEnabled,
        CollisionLayers::new(GameLayer::Enemy, [GameLayer::Player, GameLayer::PlayerHitbox]),
    ));

    // Walk zone by the left wall
    commands.spawn((
        WalkZone,
        Sprite {
            color: Color::srgba(0.4, 0.4, 0.8, 0.15),
            custom_size: Some(Vec2::new(140.0, 120.0)),
            ..default()
        },
        Transform::from_xyz(-330.0, -120.0, -1.0),
        Collider::rectangle(140.0, 120.0),
        Sensor,
        sensor_layers,
    ));

    // Respawn point at the hero's spawn
    commands.spawn((
        RespawnMarker { point: HERO_SPAWN },
        Transform::from_xyz(HERO_SPAWN.x, HERO_SPAWN.y, 0.0),
        Collider::rectangle(40.0, 60.0),
        Sensor,
        sensor_layers,
    ));

    // Doorway gate: leave right, come back in from the left
    commands.spawn((
        SceneGate {
            edge: SceneEdge::Right,
            destination: EntryGate {
                edge: SceneEdge::Left,
                position: Vec2::new(-390.0, -150.0),
            },
        },
        Sprite {
            color: Color::srgba(0.9, 0.8, 0.3, 0.2),
            custom_size: Some(Vec2::new(40.0, 120.0)),
            ..default()
        },
        Transform::from_xyz(500.0, -120.0, -1.0),
        Collider::rectangle(40.0, 120.0),
        Sensor,
        sensor_layers,
    ));
}
