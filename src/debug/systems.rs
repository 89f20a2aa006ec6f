//! Debug domain: hotkeys and hero event logging.

use bevy::ecs::message::MessageReader;
use bevy::prelude::*;
use serde::Serialize;

use crate::debug::state::{DebugAction, DebugState};
use crate::hero::flags::ConditionFlags;
use crate::hero::state::CoarseState;
use crate::hero::timers::TimerBank;
use crate::hero::{
    DamageMode, HealthChangedEvent, HeroController, HeroDamagedEvent, HeroDeathEvent,
    HeroMilestoneEvent, Player,
};

/// Point-in-time dump of the hero's observable state.
#[derive(Debug, Serialize)]
pub struct HeroSnapshot<'a> {
    pub position: [f32; 2],
    pub state: CoarseState,
    pub health: u32,
    pub max_health: u32,
    pub damage_mode: DamageMode,
    pub flags: &'a ConditionFlags,
    pub timers: &'a TimerBank,
}

impl<'a> HeroSnapshot<'a> {
    pub fn capture(position: Vec2, hero: &'a HeroController) -> Self {
        Self {
            position: position.to_array(),
            state: hero.state(),
            health: hero.health(),
            max_health: hero.max_health(),
            damage_mode: hero.damage_mode(),
            flags: hero.flags(),
            timers: hero.timers(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Handle Ctrl chords for debug actions
pub(crate) fn handle_debug_hotkeys(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut debug_state: ResMut<DebugState>,
    mut hero_query: Query<(&Transform, &mut HeroController), With<Player>>,
) {
    let ctrl = keyboard.pressed(KeyCode::ControlLeft) || keyboard.pressed(KeyCode::ControlRight);
    if !ctrl {
        return;
    }

    for (key, action) in DebugAction::BINDINGS {
        if !keyboard.just_pressed(key) {
            continue;
        }
        let Some((transform, mut hero)) = hero_query.iter_mut().next() else {
            return;
        };

        let msg = match action {
            DebugAction::ToggleInvincible => {
                debug_state.invincible = !debug_state.invincible;
                hero.set_global_invincible(debug_state.invincible);
                if debug_state.invincible {
                    "Invincibility ON".to_string()
                } else {
                    "Invincibility OFF".to_string()
                }
            }
            DebugAction::FullHeal => {
                let missing = hero.max_health().saturating_sub(hero.health());
                hero.add_health(missing);
                "Full heal".to_string()
            }
            DebugAction::Kill => {
                let health = hero.health();
                hero.take_health(health);
                "Killed hero".to_string()
            }
            DebugAction::ToggleControl => {
                if hero.flags().control_relinquished {
                    hero.regain_control();
                    "Control regained".to_string()
                } else {
                    hero.relinquish_control();
                    "Control relinquished".to_string()
                }
            }
            DebugAction::DumpSnapshot => {
                let snapshot = HeroSnapshot::capture(transform.translation.truncate(), &hero);
                match snapshot.to_json() {
                    Ok(json) => info!("[DEBUG] Hero snapshot:\n{}", json),
                    Err(e) => warn!("[DEBUG] Snapshot failed: {}", e),
                }
                "Snapshot written to log".to_string()
            }
            DebugAction::ToggleInfo => {
                debug_state.show_info = !debug_state.show_info;
                format!("Info overlay {}", if debug_state.show_info { "ON" } else { "OFF" })
            }
        };
        info!("[DEBUG] {}", msg);
        debug_state.set_message(msg, 2.0);
    }
}

pub(crate) fn update_status_message(time: Res<Time>, mut debug_state: ResMut<DebugState>) {
    if let Some((_, ref mut duration)) = debug_state.status_message {
        *duration -= time.delta_secs();
        if *duration <= 0.0 {
            debug_state.status_message = None;
        }
    }
}

pub(crate) fn log_hero_events(
    mut milestones: MessageReader<HeroMilestoneEvent>,
    mut damaged: MessageReader<HeroDamagedEvent>,
    mut deaths: MessageReader<HeroDeathEvent>,
    mut health: MessageReader<HealthChangedEvent>,
) {
    for event in milestones.read() {
        debug!("[DEBUG] Milestone {:?}", event.milestone);
    }
    for event in damaged.read() {
        info!(
            "[DEBUG] Hero took {} damage ({:?}), {} left",
            event.amount, event.hazard, event.health
        );
    }
    for event in deaths.read() {
        info!("[DEBUG] Hero {:?} died", event.entity);
    }
    for event in health.read() {
        debug!("[DEBUG] Health now {}", event.health);
    }
}
