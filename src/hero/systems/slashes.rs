//! Hero domain: slash hitboxes spawned from the slash library.

use avian2d::prelude::*;
use bevy::ecs::message::MessageReader;
use bevy::prelude::*;

use crate::content::SlashLibrary;
use crate::hero::combat::{AttackDirection, SlashKind};
use crate::hero::components::{Bounceable, GameLayer, Player, SlashHitbox, SlashLifetime};
use crate::hero::controller::HeroController;
use crate::hero::events::SlashRequest;
use crate::hero::flags::RecoilSide;
use crate::hero::body::Facing;

/// Hitbox center offset and size for a slash.
pub(crate) fn slash_geometry(
    kind: SlashKind,
    direction: AttackDirection,
    facing: Facing,
    length: f32,
    width: f32,
    offset: f32,
) -> (Vec2, Vec2) {
    if let SlashKind::Thrust(dir) = kind {
        let unit = dir.unit_vector();
        let size = if unit.x == 0.0 {
            Vec2::new(width, length)
        } else if unit.y == 0.0 {
            Vec2::new(length, width)
        } else {
            Vec2::splat(length * 0.75)
        };
        return (unit * offset, size);
    }
    match direction {
        AttackDirection::Normal => (
            Vec2::new(facing.sign() * offset, 0.0),
            Vec2::new(length, width),
        ),
        AttackDirection::Upward => (Vec2::new(0.0, offset), Vec2::new(width, length)),
        AttackDirection::Downward => (Vec2::new(0.0, -offset), Vec2::new(width, length)),
    }
}

pub(crate) fn spawn_slashes(
    mut commands: Commands,
    mut requests: MessageReader<SlashRequest>,
    library: Res<SlashLibrary>,
    owners: Query<&Transform, With<Player>>,
) {
    for request in requests.read() {
        let Some(def) = library.get(request.kind) else {
            warn!("No slash definition for {:?}", request.kind);
            continue;
        };
        let Ok(owner_transform) = owners.get(request.owner) else {
            continue;
        };

        let (offset, size) = slash_geometry(
            request.kind,
            request.direction,
            request.facing,
            def.length,
            def.width,
            def.offset,
        );
        let position = owner_transform.translation.truncate() + offset;
        let color = def
            .color
            .map(|(r, g, b)| Color::srgba(r, g, b, 0.6))
            .unwrap_or(Color::srgba(1.0, 1.0, 1.0, 0.5));

        commands.spawn((
            SlashHitbox {
                owner: request.owner,
                kind: request.kind,
                direction: request.direction,
                hit_entities: Vec::new(),
            },
            SlashLifetime(def.lifetime),
            Sprite {
                color,
                custom_size: Some(size),
                ..default()
            },
            Transform::from_xyz(position.x, position.y, 1.0),
            Collider::rectangle(size.x, size.y),
            Sensor,
            CollisionEventsEnabled,
            CollisionLayers::new(GameLayer::PlayerHitbox, [GameLayer::Enemy]),
        ));

        debug!("Slash {:?} at {:?} size {:?}", request.kind, position, size);
    }
}

pub(crate) fn cleanup_expired_slashes(
    mut commands: Commands,
    time: Res<Time>,
    mut query: Query<(Entity, &mut SlashLifetime)>,
) {
    let dt = time.delta_secs();
    for (entity, mut lifetime) in &mut query {
        lifetime.0 -= dt;
        if lifetime.0 <= 0.0 {
            commands.entity(entity).despawn();
        }
    }
}

/// Downward strikes bounce off bounceables; horizontal strikes push the hero
/// back from whatever they hit.
pub(crate) fn detect_slash_contacts(
    mut collision_events: MessageReader<CollisionStart>,
    mut slashes: Query<&mut SlashHitbox>,
    bounceables: Query<(), With<Bounceable>>,
    mut heroes: Query<&mut HeroController, With<Player>>,
) {
    for event in collision_events.read() {
        let pairs = [
            (event.collider1, event.collider2),
            (event.collider2, event.collider1),
        ];

        for (slash_entity, target) in pairs {
            let Ok(mut slash) = slashes.get_mut(slash_entity) else {
                continue;
            };
            if slash.owner == target || slash.hit_entities.contains(&target) {
                continue;
            }
            slash.hit_entities.push(target);

            let Ok(mut controller) = heroes.get_mut(slash.owner) else {
                continue;
            };
            if matches!(slash.kind, SlashKind::Thrust(_)) {
                continue;
            }
            match slash.direction {
                AttackDirection::Downward if bounceables.contains(target) => controller.bounce(),
                AttackDirection::Normal => {
                    let side = RecoilSide::away_from(controller.facing());
                    controller.recoil(side, false);
                }
                _ => {}
            }
        }
    }
}
