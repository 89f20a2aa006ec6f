//! Hero domain: health, incoming hits, recoil, death, hazard death and respawn.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::hero::combat::CombatState;
use crate::hero::controller::HeroController;
use crate::hero::events::{HeroClip, HeroSignal, Milestone};
use crate::hero::flags::{ConditionFlags, DeathKind};
use crate::hero::input::InputQueues;
use crate::hero::motion::{JumpTracker, WallTracker};
use crate::hero::body::TerrainSensor;
use crate::hero::state::CoarseState;
use crate::hero::timers::TimerId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DamageMode {
    #[default]
    FullDamage,
    /// Only lethal hazards hurt.
    HazardOnly,
    NoDamage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HazardKind {
    /// Ordinary contact damage.
    #[default]
    None,
    Spikes,
    Acid,
    Lava,
    Pit,
}

impl HazardKind {
    /// Lethal hazards send the hero back to the hazard respawn point.
    pub fn is_lethal(self) -> bool {
        !matches!(self, HazardKind::None)
    }
}

/// Where the hit came from relative to the hero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollisionSide {
    Left,
    Right,
    Top,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitEvent {
    pub source: Option<Entity>,
    pub side: CollisionSide,
    pub amount: u32,
    pub hazard: HazardKind,
}

impl HitEvent {
    pub fn contact(side: CollisionSide, amount: u32) -> Self {
        Self {
            source: None,
            side,
            amount,
            hazard: HazardKind::None,
        }
    }

    pub fn hazard(side: CollisionSide, amount: u32, hazard: HazardKind) -> Self {
        Self {
            source: None,
            side,
            amount,
            hazard,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HealthPool {
    pub current: u32,
    pub max: u32,
}

impl HealthPool {
    pub fn new(max: u32) -> Self {
        Self { current: max, max }
    }

    /// Returns the health left.
    pub fn take(&mut self, amount: u32) -> u32 {
        self.current = self.current.saturating_sub(amount);
        self.current
    }

    pub fn heal(&mut self, amount: u32) -> u32 {
        self.current = (self.current + amount).min(self.max);
        self.current
    }

    pub fn refill(&mut self) {
        self.current = self.max;
    }

    pub fn is_empty(&self) -> bool {
        self.current == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RespawnStage {
    /// Death presentation; the hero is frozen where it fell.
    Dying,
    /// Moved to the respawn point and reforming.
    Reforming,
}

/// Resumable death or hazard-death sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RespawnSequence {
    pub kind: DeathKind,
    pub stage: RespawnStage,
    pub elapsed: f32,
}

impl RespawnSequence {
    pub fn new(kind: DeathKind) -> Self {
        Self {
            kind,
            stage: RespawnStage::Dying,
            elapsed: 0.0,
        }
    }
}

impl HeroController {
    pub fn can_take_damage(&self) -> bool {
        self.damage_mode != DamageMode::NoDamage
            && !self.flags.invulnerable
            && !self.flags.recoiling
            && !self.flags.any_death()
            && !self.global_invincible
    }

    /// True from death until control is handed back, reform stage included.
    pub fn is_respawning(&self) -> bool {
        self.respawn.is_some()
    }

    pub fn take_damage(&mut self, hit: HitEvent) {
        if hit.amount == 0 || self.flags.any_death() || self.respawn.is_some() {
            return;
        }
        // Damage mode gates every outcome, parries included.
        match self.damage_mode {
            DamageMode::NoDamage => return,
            DamageMode::HazardOnly if !hit.hazard.is_lethal() => return,
            _ => {}
        }
        self.refresh_invulnerability();

        if self.parry_invulnerability_active() && !hit.hazard.is_lethal() {
            self.parry_success();
            return;
        }

        if self.can_take_damage() {
            self.apply_hit(hit);
        } else if hit.hazard.is_lethal() && self.flags.invulnerable && !self.global_invincible {
            debug!("Lethal hazard {:?} overrides invulnerability", hit.hazard);
            self.apply_hit(hit);
        }
    }

    fn apply_hit(&mut self, hit: HitEvent) {
        self.cancel_attack();
        self.cancel_wall_slide();
        self.cancel_bounce();
        self.finish_dash();
        self.cancel_jump();
        self.cancel_horizontal_recoil();
        self.queues.clear();

        let health = self.health.take(hit.amount);
        info!(
            "Hero took {} damage from {:?} ({:?}), health {}",
            hit.amount, hit.source, hit.side, health
        );
        self.emit(HeroSignal::Damaged {
            amount: hit.amount,
            health,
            hazard: hit.hazard,
        });
        self.emit(HeroSignal::HealthChanged(health));
        self.milestone(Milestone::Damaged);

        if health == 0 {
            self.begin_death();
        } else if hit.hazard.is_lethal() {
            self.begin_hazard_death(hit.hazard);
        } else {
            self.begin_recoil(hit);
        }
    }

    pub fn add_health(&mut self, amount: u32) {
        if self.flags.any_death() || amount == 0 {
            return;
        }
        let health = self.health.heal(amount);
        self.emit(HeroSignal::HealthChanged(health));
    }

    /// Direct health loss with no recoil. Reaching zero starts the death
    /// sequence.
    pub fn take_health(&mut self, amount: u32) {
        if self.flags.any_death() || self.respawn.is_some() || amount == 0 {
            return;
        }
        let health = self.health.take(amount);
        self.emit(HeroSignal::HealthChanged(health));
        self.check_death();
    }

    /// Start the death sequence if health is gone. Safe to call repeatedly.
    pub fn check_death(&mut self) {
        if self.health.is_empty() {
            self.begin_death();
        }
    }

    // ------------------------------------------------------------------------
    // Recoil
    // ------------------------------------------------------------------------

    fn begin_recoil(&mut self, hit: HitEvent) {
        self.flags.recoiling = true;
        self.flags.recoil_frozen = true;
        self.flags.on_ground = false;
        self.knockback_side = hit.side;
        self.knockback = None;
        self.set_state(CoarseState::NoInput);
        self.timers.arm(TimerId::FreezeFrame, self.tuning.freeze_time);
        self.timers
            .arm(TimerId::Invulnerability, self.tuning.invulnerability_time);
        self.timers.cancel(TimerId::FloatingCheck);
        self.refresh_invulnerability();
        self.play(HeroClip::Recoil);
    }

    /// Freeze over: push the hero away from the hit.
    pub(crate) fn begin_knockback(&mut self) {
        self.flags.recoil_frozen = false;
        let away = match self.knockback_side {
            CollisionSide::Left => 1.0,
            CollisionSide::Right => -1.0,
            CollisionSide::Top | CollisionSide::Bottom => -self.facing.sign(),
        };
        let vertical = match self.knockback_side {
            CollisionSide::Top => 0.0,
            _ => self.tuning.knockback_speed_y,
        };
        self.knockback = Some(Vec2::new(away * self.tuning.knockback_speed_x, vertical));
        self.timers
            .arm(TimerId::Knockback, self.tuning.knockback_duration);
        self.timers.cancel(TimerId::FloatingCheck);
    }

    pub(crate) fn end_recoil(&mut self, terrain: &impl TerrainSensor) {
        if self.flags.recoiling {
            self.end_recoil_grounded(terrain.touching_ground());
        }
    }

    /// End recoil using an already known ground check result.
    pub(crate) fn end_recoil_grounded(&mut self, grounded: bool) {
        if !self.flags.recoiling {
            return;
        }
        self.clear_recoil();
        self.stop(HeroClip::Recoil);
        self.last_grounded = grounded;
        if !self.flags.control_relinquished && !self.no_input_owned() {
            self.exit_no_input(grounded);
        }
    }

    fn clear_recoil(&mut self) {
        self.flags.recoiling = false;
        self.flags.recoil_frozen = false;
        self.knockback = None;
        for id in [
            TimerId::FreezeFrame,
            TimerId::Knockback,
            TimerId::FloatingCheck,
        ] {
            self.timers.cancel(id);
        }
    }

    /// Stop everything in flight ahead of a sequence that takes over.
    pub(crate) fn cancel_all_actions(&mut self) {
        self.cancel_attack();
        self.end_thrust();
        self.finish_dash();
        self.cancel_jump();
        self.cancel_wall_slide();
        self.cancel_bounce();
        self.cancel_horizontal_recoil();
        self.clear_recoil();
        self.timers.cancel(TimerId::ParryWindow);
        self.refresh_invulnerability();
        self.queues.clear();
    }

    // ------------------------------------------------------------------------
    // Death and respawn
    // ------------------------------------------------------------------------

    fn begin_death(&mut self) {
        if self.flags.dead() {
            return;
        }
        self.cancel_all_actions();
        self.flags.death = Some(DeathKind::Dead);
        self.flags.hazard_respawning = false;
        self.set_state(CoarseState::NoInput);
        self.respawn = Some(RespawnSequence::new(DeathKind::Dead));
        self.refresh_invulnerability();
        info!("Hero died");
        self.emit(HeroSignal::Died);
        self.milestone(Milestone::Died);
        self.play(HeroClip::Death);
    }

    fn begin_hazard_death(&mut self, hazard: HazardKind) {
        if self.flags.any_death() {
            return;
        }
        self.cancel_all_actions();
        self.flags.death = Some(DeathKind::HazardDeath);
        self.set_state(CoarseState::NoInput);
        self.respawn = Some(RespawnSequence::new(DeathKind::HazardDeath));
        self.refresh_invulnerability();
        info!("Hero hit hazard {:?}", hazard);
        self.emit(HeroSignal::HazardEffect(hazard));
        self.emit(HeroSignal::Presence(false));
        self.milestone(Milestone::HazardDied);
        self.play(HeroClip::HazardDeath);
    }

    /// Advance the death or hazard sequence. Returns true on the tick control
    /// is handed back.
    pub(crate) fn step_respawn(&mut self, dt: f32, terrain: &impl TerrainSensor) -> bool {
        let Some(mut sequence) = self.respawn.take() else {
            return false;
        };
        sequence.elapsed += dt;

        match sequence.stage {
            RespawnStage::Dying => {
                let wait = match sequence.kind {
                    DeathKind::Dead => self.tuning.death_wait,
                    DeathKind::HazardDeath => self.tuning.hazard_death_time,
                };
                if sequence.elapsed >= wait {
                    self.reform(sequence.kind);
                    sequence.stage = RespawnStage::Reforming;
                    sequence.elapsed = 0.0;
                }
            }
            RespawnStage::Reforming => {
                let wait = match sequence.kind {
                    DeathKind::Dead => self.tuning.respawn_time,
                    DeathKind::HazardDeath => self.tuning.hazard_respawn_time,
                };
                if sequence.elapsed >= wait {
                    self.finish_respawn(terrain);
                    return true;
                }
            }
        }

        self.respawn = Some(sequence);
        false
    }

    fn reform(&mut self, kind: DeathKind) {
        self.flags.death = None;
        match kind {
            DeathKind::Dead => {
                self.pending_teleport = Some(self.respawn_point);
                self.health.refill();
                self.emit(HeroSignal::HealthChanged(self.health.current));
            }
            DeathKind::HazardDeath => {
                self.pending_teleport = Some(self.hazard_respawn_point);
                self.flags.hazard_respawning = true;
                self.emit(HeroSignal::Presence(true));
            }
        }
        self.play(HeroClip::Respawn);
    }

    fn finish_respawn(&mut self, terrain: &impl TerrainSensor) {
        self.flags = ConditionFlags::default();
        self.timers.clear();
        self.state.reset();
        self.queues = InputQueues::default();
        self.jump = JumpTracker::default();
        self.wall = WallTracker::default();
        self.combat = CombatState::default();
        self.knockback = None;
        self.air_dashed = false;
        self.external_invulnerable = false;
        self.damage_mode = DamageMode::FullDamage;
        self.transition = None;

        let grounded = terrain.touching_ground();
        self.last_grounded = grounded;
        if !grounded {
            self.set_state(CoarseState::Airborne);
        }
        info!("Hero respawned");
        self.milestone(Milestone::Respawned);
    }
}
