//! Hero domain: placeholder presentation for effects and clip requests.

use bevy::ecs::message::MessageReader;
use bevy::prelude::*;

use crate::hero::components::{HeroEffect, Player};
use crate::hero::damage::HazardKind;
use crate::hero::events::{ClipAction, ClipRequest, EffectKind, HeroClip, HeroEffectRequest};

const HERO_COLOR: Color = Color::srgb(0.9, 0.9, 0.9);

pub(crate) fn spawn_hero_effects(
    mut commands: Commands,
    mut requests: MessageReader<HeroEffectRequest>,
) {
    for request in requests.read() {
        let (color, size, lifetime, offset) = match request.kind {
            EffectKind::LandingDust => (
                Color::srgba(0.8, 0.75, 0.65, 0.7),
                Vec2::new(36.0, 6.0),
                0.25,
                Vec2::new(0.0, -24.0),
            ),
            EffectKind::TerrainThunk => (
                Color::srgba(1.0, 0.95, 0.6, 0.9),
                Vec2::splat(10.0),
                0.12,
                Vec2::ZERO,
            ),
            EffectKind::Hazard(hazard) => (
                hazard_color(hazard),
                Vec2::splat(40.0),
                0.5,
                Vec2::ZERO,
            ),
        };
        let position = request.at + offset;

        commands.spawn((
            HeroEffect {
                lifetime,
                total: lifetime,
            },
            Sprite {
                color,
                custom_size: Some(size),
                ..default()
            },
            Transform::from_xyz(position.x, position.y, 2.0),
        ));
    }
}

fn hazard_color(hazard: HazardKind) -> Color {
    match hazard {
        HazardKind::Acid => Color::srgba(0.4, 0.9, 0.2, 0.8),
        HazardKind::Lava => Color::srgba(1.0, 0.4, 0.1, 0.8),
        HazardKind::Pit => Color::srgba(0.1, 0.1, 0.15, 0.8),
        HazardKind::Spikes | HazardKind::None => Color::srgba(0.9, 0.9, 0.95, 0.8),
    }
}

pub(crate) fn fade_hero_effects(
    mut commands: Commands,
    time: Res<Time>,
    mut query: Query<(Entity, &mut HeroEffect, &mut Sprite)>,
) {
    let dt = time.delta_secs();
    for (entity, mut effect, mut sprite) in &mut query {
        effect.lifetime -= dt;
        if effect.lifetime <= 0.0 {
            commands.entity(entity).despawn();
            continue;
        }
        let alpha = (effect.lifetime / effect.total).clamp(0.0, 1.0);
        sprite.color = sprite.color.with_alpha(alpha);
    }
}

/// Stand-in for an animator: tint the hero for the clips that matter most.
pub(crate) fn apply_clip_tint(
    mut requests: MessageReader<ClipRequest>,
    mut heroes: Query<&mut Sprite, With<Player>>,
) {
    for request in requests.read() {
        let color = match (request.action, request.clip) {
            (ClipAction::Play, HeroClip::Recoil) => Color::srgb(1.0, 0.4, 0.4),
            (ClipAction::Play, HeroClip::Death | HeroClip::HazardDeath) => {
                Color::srgb(0.35, 0.35, 0.35)
            }
            (ClipAction::Play, HeroClip::Thrust) => Color::srgb(1.0, 0.85, 0.3),
            (ClipAction::Play, HeroClip::ParryFlash) => Color::srgb(0.6, 0.9, 1.0),
            (ClipAction::Play, HeroClip::Dash | HeroClip::BackDash) => Color::srgb(0.7, 0.8, 1.0),
            (ClipAction::Play, _) | (ClipAction::Stop, _) => HERO_COLOR,
        };
        for mut sprite in &mut heroes {
            sprite.color = color;
        }
    }
}
