//! Hero domain: turns queued controller signals into messages and world
//! changes.

use avian2d::prelude::*;
use bevy::ecs::message::MessageWriter;
use bevy::prelude::*;

use crate::core::GameplayPaused;
use crate::hero::components::{HeroHurtbox, Player, hero_collision_layers};
use crate::hero::controller::HeroController;
use crate::hero::events::{
    ClipRequest, EffectKind, HealthChangedEvent, HeroDamagedEvent, HeroDeathEvent,
    HeroEffectRequest, HeroMilestoneEvent, HeroSignal, SlashRequest,
};
use crate::hero::flags::HeroFlag;

#[allow(clippy::too_many_arguments)]
pub(crate) fn dispatch_hero_signals(
    mut heroes: Query<
        (
            Entity,
            &Transform,
            &mut HeroController,
            &mut HeroHurtbox,
            &mut Visibility,
            &mut CollisionLayers,
        ),
        With<Player>,
    >,
    mut milestones: MessageWriter<HeroMilestoneEvent>,
    mut damaged: MessageWriter<HeroDamagedEvent>,
    mut deaths: MessageWriter<HeroDeathEvent>,
    mut clips: MessageWriter<ClipRequest>,
    mut slashes: MessageWriter<SlashRequest>,
    mut effects: MessageWriter<HeroEffectRequest>,
    mut health_changes: MessageWriter<HealthChangedEvent>,
) {
    for (entity, transform, mut controller, mut hurtbox, mut visibility, mut layers) in &mut heroes
    {
        let at = transform.translation.truncate();
        for signal in controller.drain_signals() {
            match signal {
                HeroSignal::Milestone(milestone) => {
                    milestones.write(HeroMilestoneEvent { entity, milestone });
                }
                HeroSignal::Clip(action, clip) => {
                    clips.write(ClipRequest { action, clip });
                }
                HeroSignal::Damaged {
                    amount,
                    health,
                    hazard,
                } => {
                    damaged.write(HeroDamagedEvent {
                        amount,
                        health,
                        hazard,
                    });
                }
                HeroSignal::Died => {
                    deaths.write(HeroDeathEvent { entity });
                }
                HeroSignal::Slash {
                    kind,
                    direction,
                    facing,
                } => {
                    slashes.write(SlashRequest {
                        owner: entity,
                        kind,
                        direction,
                        facing,
                    });
                }
                HeroSignal::TerrainThunk { at } => {
                    effects.write(HeroEffectRequest {
                        kind: EffectKind::TerrainThunk,
                        at,
                    });
                }
                HeroSignal::HazardEffect(hazard) => {
                    effects.write(HeroEffectRequest {
                        kind: EffectKind::Hazard(hazard),
                        at,
                    });
                }
                HeroSignal::LandingDust => {
                    effects.write(HeroEffectRequest {
                        kind: EffectKind::LandingDust,
                        at,
                    });
                }
                HeroSignal::Presence(present) => {
                    *visibility = if present {
                        Visibility::Inherited
                    } else {
                        Visibility::Hidden
                    };
                    *layers = if present {
                        hero_collision_layers()
                    } else {
                        CollisionLayers::NONE
                    };
                    hurtbox.inactive = !present;
                }
                HeroSignal::HealthChanged(health) => {
                    health_changes.write(HealthChangedEvent { health });
                }
            }
        }
    }
}

/// Mirror the global pause into the hero's flags. Runs while paused, when the
/// controller itself is not ticking.
pub(crate) fn sync_pause_flag(
    paused: Res<GameplayPaused>,
    mut heroes: Query<&mut HeroController, With<Player>>,
) {
    let is_paused = paused.is_paused();
    for mut controller in &mut heroes {
        if controller.flag(HeroFlag::IsPaused) != is_paused {
            controller.set_flag(HeroFlag::IsPaused, is_paused);
        }
    }
}
