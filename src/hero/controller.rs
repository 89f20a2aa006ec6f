//! Hero domain: the controller that owns motion, combat and survival state.
//!
//! One `HeroController` lives on the player entity. Each fixed step runs a
//! gameplay phase (timers, sequences, contacts, input, actions) followed by a
//! physics phase (velocity resolution). Collaborators only influence it through
//! the public operations below; everything it wants to tell the world is queued
//! as `HeroSignal`s and drained by the dispatch system.

use bevy::prelude::*;
use std::collections::HashSet;

use crate::hero::combat::{CombatState, SlashKind};
use crate::hero::damage::{CollisionSide, DamageMode, HealthPool, RespawnSequence};
use crate::hero::events::{ClipAction, HeroClip, HeroSignal, Milestone};
use crate::hero::flags::{ConditionFlags, DashKind, HeroFlag, RecoilSide, UnknownFlag};
use crate::hero::input::{FilteredInput, HeroInput, InputQueues};
use crate::hero::motion::{JumpTracker, MotionPlan, WallTracker};
use crate::hero::body::{Facing, HeroBody, TerrainSensor};
use crate::hero::state::{CoarseState, StateMachine, StateRequest};
use crate::hero::timers::{TimerBank, TimerId};
use crate::hero::transition::SceneTransition;
use crate::hero::tuning::HeroTuning;

#[derive(Component, Debug)]
pub struct HeroController {
    pub(crate) tuning: HeroTuning,
    pub(crate) flags: ConditionFlags,
    pub(crate) state: StateMachine,
    pub(crate) timers: TimerBank,
    pub(crate) health: HealthPool,
    pub(crate) damage_mode: DamageMode,
    pub(crate) facing: Facing,
    pub(crate) input: FilteredInput,
    pub(crate) queues: InputQueues,
    pub(crate) jump: JumpTracker,
    pub(crate) wall: WallTracker,
    pub(crate) air_dashed: bool,
    pub(crate) dash_sign: f32,
    pub(crate) recoil_long: bool,
    pub(crate) bounce_multiplier: f32,
    pub(crate) combat: CombatState,
    pub(crate) knockback: Option<Vec2>,
    pub(crate) knockback_side: CollisionSide,
    pub(crate) respawn: Option<RespawnSequence>,
    pub(crate) transition: Option<SceneTransition>,
    pub(crate) respawn_point: Vec2,
    pub(crate) hazard_respawn_point: Vec2,
    pub(crate) external_invulnerable: bool,
    pub(crate) global_invincible: bool,
    pub(crate) slash_catalog: HashSet<SlashKind>,
    pub(crate) last_grounded: bool,
    pub(crate) last_velocity: Vec2,
    pub(crate) last_position: Vec2,
    pub(crate) pending_teleport: Option<Vec2>,
    pub(crate) pending_stop: bool,
    outbox: Vec<HeroSignal>,
}

impl HeroController {
    /// Only the hero spawn system creates controllers.
    pub(crate) fn new(
        tuning: HeroTuning,
        spawn_point: Vec2,
        slash_catalog: impl IntoIterator<Item = SlashKind>,
    ) -> Self {
        let health = HealthPool::new(tuning.max_health);
        Self {
            tuning,
            flags: ConditionFlags::default(),
            state: StateMachine::default(),
            timers: TimerBank::default(),
            health,
            damage_mode: DamageMode::FullDamage,
            facing: Facing::Right,
            input: FilteredInput::default(),
            queues: InputQueues::default(),
            jump: JumpTracker::default(),
            wall: WallTracker::default(),
            air_dashed: false,
            dash_sign: 1.0,
            recoil_long: false,
            bounce_multiplier: 1.0,
            combat: CombatState::default(),
            knockback: None,
            knockback_side: CollisionSide::Left,
            respawn: None,
            transition: None,
            respawn_point: spawn_point,
            hazard_respawn_point: spawn_point,
            external_invulnerable: false,
            global_invincible: false,
            slash_catalog: slash_catalog.into_iter().collect(),
            last_grounded: false,
            last_velocity: Vec2::ZERO,
            last_position: spawn_point,
            pending_teleport: None,
            pending_stop: false,
            outbox: Vec::new(),
        }
    }

    // ------------------------------------------------------------------------
    // Tick
    // ------------------------------------------------------------------------

    /// One fixed step: gameplay phase, then physics phase.
    pub fn tick(
        &mut self,
        dt: f32,
        input: &HeroInput,
        body: &mut impl HeroBody,
        terrain: &impl TerrainSensor,
    ) {
        self.gameplay_phase(dt, input, &*body, terrain);
        self.physics_phase(body);
        debug_assert!(
            self.flags.validate().is_ok(),
            "invalid hero flags: {:?}",
            self.flags.validate()
        );
    }

    pub fn gameplay_phase(
        &mut self,
        dt: f32,
        input: &HeroInput,
        body: &impl HeroBody,
        terrain: &impl TerrainSensor,
    ) {
        self.last_velocity = body.velocity();
        self.last_position = body.position();

        // Hit stop: nothing but the freeze itself advances.
        if self.flags.recoil_frozen {
            if self.timers.tick_one(TimerId::FreezeFrame, dt) {
                self.begin_knockback();
            }
            return;
        }

        for id in self.timers.tick(dt) {
            self.on_timer_expired(id, terrain);
        }

        if self.step_respawn(dt, terrain) {
            // Control is handed back on the next tick with a clean slate.
            return;
        }
        self.step_transition(dt, terrain);

        self.update_contacts(terrain);
        self.update_landing_states();

        self.sample_input(input);
        self.update_facing();
        self.process_actions();
        self.update_wall_slide();
        self.step_terrain_thunk(terrain);

        self.refresh_invulnerability();
    }

    pub fn physics_phase(&mut self, body: &mut impl HeroBody) {
        if let Some(position) = self.pending_teleport.take() {
            body.teleport(position);
        }

        if self.is_frozen() {
            body.set_velocity(Vec2::ZERO);
            body.set_gravity_enabled(false);
            return;
        }

        let mut plan = MotionPlan::new(body.velocity());
        self.propose_motion(&mut plan);
        body.set_velocity(plan.resolve(self.tuning.max_fall_speed));
        body.set_gravity_enabled(self.wants_gravity());
    }

    fn is_frozen(&self) -> bool {
        self.flags.recoil_frozen || self.flags.any_death() || self.respawn.is_some()
    }

    pub(crate) fn wants_gravity(&self) -> bool {
        !(self.flags.dash.is_some()
            || self.flags.empowered
            || self.flags.recoil_frozen
            || self.flags.any_death()
            || self.flags.hazard_respawning
            || self.respawn.is_some()
            || self
                .transition
                .as_ref()
                .is_some_and(SceneTransition::suspends_gravity))
    }

    fn on_timer_expired(&mut self, id: TimerId, terrain: &impl TerrainSensor) {
        match id {
            TimerId::AttackDuration => self.end_attack(),
            TimerId::DashDuration => self.finish_dash(),
            TimerId::HorizontalRecoil => self.cancel_horizontal_recoil(),
            TimerId::BounceDuration => self.cancel_bounce(),
            TimerId::Knockback => self.end_recoil(terrain),
            TimerId::EmpowerDuration => self.end_thrust(),
            TimerId::TerrainThunk => self.combat.thunk = None,
            TimerId::HardLanding | TimerId::DashLanding => self.finish_landing(),
            TimerId::ParryWindow => debug!("Parry window closed"),
            _ => {}
        }
    }

    // ------------------------------------------------------------------------
    // Input
    // ------------------------------------------------------------------------

    fn sample_input(&mut self, input: &HeroInput) {
        if self.state.current() == CoarseState::NoInput {
            self.input = FilteredInput::default();
            self.queues.clear();
            return;
        }
        self.input = FilteredInput::from_signal(input, self.tuning.input_deadzone);

        if matches!(
            self.state.current(),
            CoarseState::Idle | CoarseState::Running
        ) && self.flags.on_ground
        {
            self.set_state(StateRequest::Grounded);
        }
    }

    fn update_facing(&mut self) {
        if self.flags.dash.is_some()
            || self.flags.wall_sliding
            || self.flags.empowered
            || self.flags.attacking
            || self.flags.recoil.is_some()
            || self.timers.is_active(TimerId::WallLock)
            || !self.state.current().accepts_actions()
        {
            return;
        }
        if self.input.move_x > 0.0 {
            self.facing = Facing::Right;
        } else if self.input.move_x < 0.0 {
            self.facing = Facing::Left;
        }
    }

    // ------------------------------------------------------------------------
    // Coarse state
    // ------------------------------------------------------------------------

    pub(crate) fn set_state(&mut self, request: impl Into<StateRequest>) {
        let before = self.state.current();
        if let Some(next) = self.state.set(request, self.input.move_x) {
            debug!("Hero state: {:?} -> {:?}", before, next);
            self.play_state_clip(next);
        }
    }

    /// Leave `NoInput` using the given ground check result. A remembered
    /// landing state whose countdown ran out meanwhile resolves to grounded.
    pub(crate) fn exit_no_input(&mut self, grounded: bool) {
        let Some(next) = self.state.exit_no_input(grounded) else {
            return;
        };
        debug!("Hero state: NoInput -> {:?} (grounded={})", next, grounded);
        if next.is_landing() && !self.landing_timer_active(next) {
            self.timers.cancel(TimerId::LandingFailSafe);
            self.set_state(StateRequest::Grounded);
        } else {
            self.play_state_clip(next);
        }
    }

    pub(crate) fn landing_timer_active(&self, state: CoarseState) -> bool {
        match state {
            CoarseState::HardLanding => self.timers.is_active(TimerId::HardLanding),
            CoarseState::DashLanding => self.timers.is_active(TimerId::DashLanding),
            _ => false,
        }
    }

    fn play_state_clip(&mut self, state: CoarseState) {
        let clip = match state {
            CoarseState::Idle => HeroClip::Idle,
            CoarseState::Running => HeroClip::Run,
            CoarseState::Airborne => HeroClip::Airborne,
            CoarseState::HardLanding => HeroClip::HardLand,
            CoarseState::DashLanding => HeroClip::DashLand,
            CoarseState::NoInput => return,
        };
        self.play(clip);
    }

    /// Whether something other than relinquished control is holding `NoInput`.
    pub(crate) fn no_input_owned(&self) -> bool {
        self.flags.recoiling
            || self.flags.any_death()
            || self.respawn.is_some()
            || self.transition.is_some()
    }

    // ------------------------------------------------------------------------
    // Invulnerability
    // ------------------------------------------------------------------------

    pub(crate) fn refresh_invulnerability(&mut self) {
        let timed = [
            TimerId::Invulnerability,
            TimerId::ParryWindow,
            TimerId::ParrySuccess,
            TimerId::EmpowerDuration,
        ]
        .into_iter()
        .any(|id| self.timers.is_active(id));

        self.flags.invulnerable = timed
            || self.external_invulnerable
            || self.flags.hazard_respawning
            || self.respawn.is_some();
    }

    // ------------------------------------------------------------------------
    // Signals
    // ------------------------------------------------------------------------

    pub(crate) fn emit(&mut self, signal: HeroSignal) {
        self.outbox.push(signal);
    }

    pub(crate) fn milestone(&mut self, milestone: Milestone) {
        self.emit(HeroSignal::Milestone(milestone));
    }

    pub(crate) fn play(&mut self, clip: HeroClip) {
        self.emit(HeroSignal::Clip(ClipAction::Play, clip));
    }

    pub(crate) fn stop(&mut self, clip: HeroClip) {
        self.emit(HeroSignal::Clip(ClipAction::Stop, clip));
    }

    /// Take everything queued since the last drain.
    pub fn drain_signals(&mut self) -> Vec<HeroSignal> {
        std::mem::take(&mut self.outbox)
    }

    // ------------------------------------------------------------------------
    // Public accessors and loosely coupled operations
    // ------------------------------------------------------------------------

    pub fn state(&self) -> CoarseState {
        self.state.current()
    }

    pub fn flags(&self) -> &ConditionFlags {
        &self.flags
    }

    pub fn timers(&self) -> &TimerBank {
        &self.timers
    }

    pub fn tuning(&self) -> &HeroTuning {
        &self.tuning
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    pub fn health(&self) -> u32 {
        self.health.current
    }

    pub fn max_health(&self) -> u32 {
        self.health.max
    }

    pub fn damage_mode(&self) -> DamageMode {
        self.damage_mode
    }

    pub fn set_damage_mode(&mut self, mode: DamageMode) {
        self.damage_mode = mode;
    }

    pub fn flag(&self, flag: HeroFlag) -> bool {
        self.flags.get(flag)
    }

    /// Enum-keyed write for external callers. Every write goes through the
    /// operation that owns the flag, so guards still apply. Flags that only
    /// the controller can raise or clear are read-only here.
    pub fn set_flag(&mut self, flag: HeroFlag, value: bool) {
        match (flag, value) {
            (HeroFlag::Invulnerable, _) => {
                self.external_invulnerable = value;
                self.refresh_invulnerability();
            }
            (HeroFlag::ControlRelinquished, true) => self.relinquish_control(),
            (HeroFlag::ControlRelinquished, false) => self.regain_control(),
            (HeroFlag::IsPaused, _) => self.flags.is_paused = value,
            (HeroFlag::InWalkZone, _) => self.flags.in_walk_zone = value,
            (HeroFlag::Jumping, true) => {
                if self.can_jump() {
                    self.begin_jump();
                }
            }
            (HeroFlag::Jumping, false) => self.cancel_jump(),
            (HeroFlag::Dashing, true) => {
                if self.can_dash() {
                    self.begin_dash(DashKind::Forward);
                }
            }
            (HeroFlag::BackDashing, true) => {
                if self.can_back_dash() {
                    self.begin_dash(DashKind::Back);
                }
            }
            (HeroFlag::Dashing | HeroFlag::BackDashing, false) => {
                if self.flags.get(flag) {
                    self.finish_dash();
                }
            }
            (HeroFlag::WallSliding, false) => self.cancel_wall_slide(),
            (HeroFlag::Bouncing, true) => self.bounce(),
            (HeroFlag::Bouncing, false) => self.cancel_bounce(),
            (HeroFlag::Attacking, false) => self.cancel_attack(),
            (HeroFlag::Empowered, false) => self.end_thrust(),
            (HeroFlag::RecoilingLeft, true) => self.recoil(RecoilSide::Left, false),
            (HeroFlag::RecoilingRight, true) => self.recoil(RecoilSide::Right, false),
            (HeroFlag::RecoilingLeft | HeroFlag::RecoilingRight, false) => {
                if self.flags.get(flag) {
                    self.cancel_horizontal_recoil();
                }
            }
            (HeroFlag::Recoiling, false) => self.end_recoil_grounded(self.last_grounded),
            (HeroFlag::Dead, true) => self.take_health(self.health.current),
            _ => {
                if self.flags.get(flag) != value {
                    warn!(
                        "Hero flag '{}' is read-only, ignoring write of {}",
                        flag.name(),
                        value
                    );
                }
            }
        }
    }

    pub fn flag_by_name(&self, name: &str) -> Result<bool, UnknownFlag> {
        Ok(self.flag(name.parse()?))
    }

    pub fn set_flag_by_name(&mut self, name: &str, value: bool) -> Result<(), UnknownFlag> {
        self.set_flag(name.parse()?, value);
        Ok(())
    }

    /// The stronger god-mode flag owned by a collaborator.
    pub fn set_global_invincible(&mut self, invincible: bool) {
        self.global_invincible = invincible;
    }

    pub fn set_respawn_point(&mut self, point: Vec2) {
        self.respawn_point = point;
    }

    pub fn set_hazard_respawn_point(&mut self, point: Vec2) {
        if self.hazard_respawn_point != point {
            debug!("Hazard respawn point set to {:?}", point);
        }
        self.hazard_respawn_point = point;
    }

    pub fn hazard_respawn_point(&self) -> Vec2 {
        self.hazard_respawn_point
    }

    pub fn relinquish_control(&mut self) {
        if self.flags.control_relinquished || self.flags.any_death() {
            return;
        }
        self.flags.control_relinquished = true;
        self.cancel_attack();
        self.queues.clear();
        self.input = FilteredInput::default();
        self.pending_stop = true;
        self.set_state(CoarseState::NoInput);
        debug!("Hero control relinquished");
    }

    pub fn regain_control(&mut self) {
        if !self.flags.control_relinquished || self.flags.any_death() {
            return;
        }
        self.flags.control_relinquished = false;
        if !self.no_input_owned() {
            self.exit_no_input(self.last_grounded);
        }
        debug!("Hero control regained");
    }
}
