//! Hero domain: tuning resource for locomotion, combat and recovery.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Every speed is in pixels per second and every duration in seconds unless the
/// field name says `steps` (fixed ticks).
#[derive(Resource, Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct HeroTuning {
    pub max_health: u32,

    // Locomotion
    pub run_speed: f32,
    pub walk_speed: f32,
    pub gravity: f32,
    pub max_fall_speed: f32,
    pub jump_speed: f32,
    /// Ticks of upward injection for a full hop
    pub jump_steps: u32,
    /// Ticks that must elapse before a release can cut the jump
    pub jump_steps_min: u32,
    pub ledge_buffer_time: f32,
    pub dash_speed: f32,
    pub dash_time: f32,
    pub dash_cooldown: f32,
    pub down_dash_speed: f32,
    pub back_dash_speed: f32,
    pub back_dash_time: f32,
    pub back_dash_cooldown: f32,
    pub wall_slide_enabled: bool,
    pub wall_slide_speed: f32,
    /// Fraction of the gap to the slide speed closed per tick
    pub wall_slide_blend: f32,
    pub wall_sticky_steps: u32,
    pub wall_jump_speed: f32,
    pub wall_lock_time: f32,
    pub bounce_speed: f32,
    pub bounce_time: f32,

    // Landings
    pub big_fall_time: f32,
    pub hard_landing_time: f32,
    pub dash_landing_time: f32,
    pub landing_failsafe_time: f32,
    pub floating_check_time: f32,

    // Input buffering
    pub jump_queue_steps: u32,
    pub dash_queue_steps: u32,
    pub attack_queue_steps: u32,
    pub input_deadzone: f32,

    // Combat
    pub attack_duration: f32,
    pub attack_cooldown: f32,
    pub slash_reach: f32,
    pub thunk_window: f32,
    pub recoil_speed: f32,
    pub recoil_speed_long: f32,
    pub recoil_time: f32,
    /// Fraction of the gap to the recoil speed closed per tick
    pub recoil_blend: f32,
    pub parry_window: f32,
    pub parry_cooldown: f32,
    pub parry_success_invulnerability: f32,
    pub parry_bounce_multiplier: f32,
    pub empower_duration: f32,
    pub empower_base_speed: f32,
    pub empower_multiplier: f32,

    // Damage and recovery
    pub invulnerability_time: f32,
    pub freeze_time: f32,
    pub knockback_duration: f32,
    pub knockback_speed_x: f32,
    pub knockback_speed_y: f32,
    pub death_wait: f32,
    pub respawn_time: f32,
    pub hazard_death_time: f32,
    pub hazard_respawn_time: f32,

    // Scene transitions
    pub scene_enter_time: f32,
    pub scene_enter_jump_speed: f32,
    pub scene_entry_offset: f32,
}

impl Default for HeroTuning {
    fn default() -> Self {
        Self {
            max_health: 5,

            run_speed: 265.0,
            walk_speed: 192.0,
            gravity: 1600.0,
            max_fall_speed: 670.0,
            jump_speed: 530.0,
            jump_steps: 9,
            jump_steps_min: 4,
            ledge_buffer_time: 0.1,
            dash_speed: 640.0,
            dash_time: 0.25,
            dash_cooldown: 0.6,
            down_dash_speed: 800.0,
            back_dash_speed: 440.0,
            back_dash_time: 0.15,
            back_dash_cooldown: 0.5,
            wall_slide_enabled: true,
            wall_slide_speed: 256.0,
            wall_slide_blend: 0.35,
            wall_sticky_steps: 4,
            wall_jump_speed: 410.0,
            wall_lock_time: 0.12,
            bounce_speed: 380.0,
            bounce_time: 0.25,

            big_fall_time: 1.1,
            hard_landing_time: 0.8,
            dash_landing_time: 0.2,
            landing_failsafe_time: 0.1,
            floating_check_time: 0.18,

            jump_queue_steps: 2,
            dash_queue_steps: 2,
            attack_queue_steps: 5,
            input_deadzone: 0.3,

            attack_duration: 0.35,
            attack_cooldown: 0.41,
            slash_reach: 48.0,
            thunk_window: 0.12,
            recoil_speed: 240.0,
            recoil_speed_long: 480.0,
            recoil_time: 0.08,
            recoil_blend: 0.5,
            parry_window: 0.25,
            parry_cooldown: 1.2,
            parry_success_invulnerability: 0.5,
            parry_bounce_multiplier: 1.5,
            empower_duration: 0.25,
            empower_base_speed: 640.0,
            empower_multiplier: 1.5,

            invulnerability_time: 1.3,
            freeze_time: 0.1,
            knockback_duration: 0.2,
            knockback_speed_x: 240.0,
            knockback_speed_y: 320.0,
            death_wait: 2.0,
            respawn_time: 0.5,
            hazard_death_time: 0.8,
            hazard_respawn_time: 0.6,

            scene_enter_time: 0.4,
            scene_enter_jump_speed: 600.0,
            scene_entry_offset: 24.0,
        }
    }
}

impl HeroTuning {
    /// Apex of a full hop, ignoring gravity during the injection ticks.
    pub fn full_hop_height(&self, fixed_dt: f32) -> f32 {
        let rise = self.jump_speed * self.jump_steps as f32 * fixed_dt;
        rise + self.jump_speed * self.jump_speed / (2.0 * self.gravity)
    }

    /// Returns a list of problems with this tuning, empty if it is usable.
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();

        if self.jump_steps_min > self.jump_steps {
            problems.push(format!(
                "jump_steps_min ({}) exceeds jump_steps ({})",
                self.jump_steps_min, self.jump_steps
            ));
        }
        if self.max_health == 0 {
            problems.push("max_health must be at least 1".to_string());
        }

        let durations = [
            ("dash_time", self.dash_time),
            ("back_dash_time", self.back_dash_time),
            ("attack_duration", self.attack_duration),
            ("invulnerability_time", self.invulnerability_time),
            ("knockback_duration", self.knockback_duration),
            ("parry_window", self.parry_window),
            ("empower_duration", self.empower_duration),
            ("bounce_time", self.bounce_time),
            ("scene_enter_time", self.scene_enter_time),
        ];
        for (name, value) in durations {
            if value <= 0.0 {
                problems.push(format!("{} must be positive, got {}", name, value));
            }
        }

        for (name, blend) in [
            ("wall_slide_blend", self.wall_slide_blend),
            ("recoil_blend", self.recoil_blend),
        ] {
            if !(0.0..=1.0).contains(&blend) {
                problems.push(format!("{} must be within 0..=1, got {}", name, blend));
            }
        }

        problems
    }
}
