//! Hero domain: hurtbox contact handling.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::hero::components::{DamageHero, HeroHurtbox, Player};
use crate::hero::controller::HeroController;

/// Hazards hurt immediately; the first ordinary contact of the step is held
/// for `flush_buffered_hits`.
pub(crate) fn collect_hurtbox_hits(
    mut heroes: Query<
        (
            &Transform,
            &CollidingEntities,
            &mut HeroHurtbox,
            &mut HeroController,
        ),
        With<Player>,
    >,
    damagers: Query<(&Transform, &DamageHero)>,
) {
    for (transform, colliding, mut hurtbox, mut controller) in &mut heroes {
        if hurtbox.inactive {
            hurtbox.buffered = None;
            continue;
        }

        let hero_x = transform.translation.x;
        for &entity in colliding.iter() {
            let Ok((damager_transform, damage)) = damagers.get(entity) else {
                continue;
            };
            let hit = damage.hit_from(entity, hero_x, damager_transform.translation.x);
            if let Some(hazard_hit) = hurtbox.receive(hit) {
                controller.take_damage(hazard_hit);
            }
        }
    }
}

/// Apply the held contact hit after the controller has stepped.
pub(crate) fn flush_buffered_hits(
    mut heroes: Query<(&mut HeroHurtbox, &mut HeroController), With<Player>>,
) {
    for (mut hurtbox, mut controller) in &mut heroes {
        if let Some(hit) = hurtbox.take_buffered() {
            controller.take_damage(hit);
        }
    }
}
