//! Hero domain: the player character controller and its ECS wiring.

pub mod body;
pub(crate) mod bootstrap;
pub mod combat;
pub mod components;
pub mod controller;
pub mod damage;
pub mod events;
pub mod flags;
pub mod input;
pub mod motion;
pub mod state;
pub(crate) mod systems;
pub mod timers;
pub mod transition;
pub mod tuning;

#[cfg(test)]
mod tests;

use bevy::prelude::*;

use crate::core::gameplay_active;

pub use components::{Bounceable, DamageHero, GameLayer, Player};
pub use controller::HeroController;
pub use damage::{CollisionSide, DamageMode, HazardKind, HitEvent};
pub use events::{
    ClipRequest, HealthChangedEvent, HeroDamagedEvent, HeroDeathEvent, HeroEffectRequest,
    HeroMilestoneEvent, Milestone, SlashRequest,
};
pub use flags::HeroFlag;
pub use input::HeroInput;
pub use transition::{EntryGate, SceneEdge};
pub use tuning::HeroTuning;

pub struct HeroPlugin;

impl Plugin for HeroPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<HeroInput>()
            .add_message::<HeroMilestoneEvent>()
            .add_message::<HeroDamagedEvent>()
            .add_message::<HeroDeathEvent>()
            .add_message::<ClipRequest>()
            .add_message::<SlashRequest>()
            .add_message::<HeroEffectRequest>()
            .add_message::<HealthChangedEvent>()
            .add_systems(Startup, bootstrap::spawn_hero)
            .add_systems(Update, systems::read_input.run_if(gameplay_active))
            .add_systems(
                FixedUpdate,
                (
                    systems::collect_hurtbox_hits,
                    systems::tick_hero,
                    systems::flush_buffered_hits,
                    systems::dispatch_hero_signals,
                )
                    .chain()
                    .run_if(gameplay_active),
            )
            .add_systems(
                Update,
                (
                    systems::spawn_slashes,
                    systems::detect_slash_contacts,
                    systems::cleanup_expired_slashes,
                    systems::spawn_hero_effects,
                    systems::fade_hero_effects,
                    systems::apply_clip_tint,
                    systems::sync_pause_flag,
                ),
            );
    }
}
