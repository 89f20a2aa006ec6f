//! Hero domain: locomotion guards, contacts and per-tick velocity resolution.
//!
//! Every velocity writer proposes a value per axis with a `MotionSource`. The
//! highest source wins the axis, so the priority order is explicit instead of
//! falling out of call order.

use bevy::prelude::*;

use crate::hero::combat::AttackTrigger;
use crate::hero::controller::HeroController;
use crate::hero::events::{HeroClip, HeroSignal, Milestone};
use crate::hero::flags::{DashKind, RecoilSide};
use crate::hero::body::{TerrainSensor, WallSide};
use crate::hero::state::{CoarseState, StateRequest};
use crate::hero::timers::TimerId;

const FLOAT_EPSILON: f32 = 0.01;

/// Velocity writers, lowest priority first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MotionSource {
    Move,
    WallLock,
    Jump,
    WallSlide,
    Bounce,
    Dash,
    Recoil,
    Knockback,
    Scripted,
    Empowered,
}

impl MotionSource {
    /// Sources allowed to exceed the terminal fall speed.
    fn ignores_fall_clamp(self) -> bool {
        matches!(
            self,
            MotionSource::Dash | MotionSource::Scripted | MotionSource::Empowered
        )
    }
}

#[derive(Debug, Clone, Copy)]
pub struct MotionPlan {
    base: Vec2,
    x: Option<(MotionSource, f32)>,
    y: Option<(MotionSource, f32)>,
}

impl MotionPlan {
    pub fn new(base: Vec2) -> Self {
        Self {
            base,
            x: None,
            y: None,
        }
    }

    /// Velocity the body carried into this tick.
    pub fn base(&self) -> Vec2 {
        self.base
    }

    pub fn propose_x(&mut self, source: MotionSource, value: f32) {
        if self.x.is_none_or(|(current, _)| source >= current) {
            self.x = Some((source, value));
        }
    }

    pub fn propose_y(&mut self, source: MotionSource, value: f32) {
        if self.y.is_none_or(|(current, _)| source >= current) {
            self.y = Some((source, value));
        }
    }

    pub fn propose(&mut self, source: MotionSource, velocity: Vec2) {
        self.propose_x(source, velocity.x);
        self.propose_y(source, velocity.y);
    }

    pub fn winner_x(&self) -> Option<MotionSource> {
        self.x.map(|(source, _)| source)
    }

    pub fn winner_y(&self) -> Option<MotionSource> {
        self.y.map(|(source, _)| source)
    }

    /// Final velocity, with the terminal fall speed applied last.
    pub fn resolve(&self, max_fall_speed: f32) -> Vec2 {
        let x = self.x.map_or(self.base.x, |(_, value)| value);
        let y = self.y.map_or(self.base.y, |(_, value)| value);
        let clamp = !self.winner_y().is_some_and(MotionSource::ignores_fall_clamp);
        Vec2::new(x, if clamp { y.max(-max_fall_speed) } else { y })
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JumpTracker {
    pub steps: u32,
    pub release_queued: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct WallTracker {
    /// Wall the sensor currently reports.
    pub contact: Option<WallSide>,
    /// Wall being slid on.
    pub sliding: Option<WallSide>,
    pub unstick_steps: u32,
    pub lock_direction: f32,
}

impl HeroController {
    // ------------------------------------------------------------------------
    // Guards
    // ------------------------------------------------------------------------

    pub fn can_jump(&self) -> bool {
        self.state.current().accepts_actions()
            && !self.flags.jumping
            && self.flags.dash.is_none()
            && !self.flags.empowered
            && !self.flags.recoiling
            && (self.flags.on_ground || self.timers.is_active(TimerId::LedgeBuffer))
    }

    pub fn can_dash(&self) -> bool {
        self.state.current().accepts_actions()
            && self.flags.dash.is_none()
            && self.timers.is_idle(TimerId::DashCooldown)
            && !self.flags.empowered
            && !self.flags.recoiling
            && self.flags.recoil.is_none()
            && (self.flags.on_ground || !self.air_dashed)
    }

    pub fn can_back_dash(&self) -> bool {
        self.state.current().accepts_actions()
            && self.flags.dash.is_none()
            && self.timers.is_idle(TimerId::BackDashCooldown)
            && self.flags.on_ground
            && !self.flags.attacking
            && !self.flags.empowered
            && !self.flags.recoiling
    }

    pub fn can_wall_slide(&self) -> bool {
        self.wall_slide_candidate().is_some()
    }

    /// Wall the hero may start sliding on this tick, if any.
    fn wall_slide_candidate(&self) -> Option<WallSide> {
        let side = self.wall.contact?;
        let allowed = self.tuning.wall_slide_enabled
            && self.state.current().accepts_actions()
            && !self.flags.on_ground
            && !self.flags.jumping
            && !self.flags.bouncing
            && self.flags.dash.is_none()
            && !self.flags.empowered
            && !self.flags.recoiling
            && self.flags.recoil.is_none()
            && self.timers.is_idle(TimerId::WallLock)
            && self.last_velocity.y <= 0.0
            && self.input.move_x == side.sign();
        allowed.then_some(side)
    }

    // ------------------------------------------------------------------------
    // Contacts and landings
    // ------------------------------------------------------------------------

    pub(crate) fn update_contacts(&mut self, terrain: &impl TerrainSensor) {
        if self.flags.any_death() || self.respawn.is_some() {
            return;
        }
        let grounded = terrain.touching_ground();
        self.last_grounded = grounded;
        self.wall.contact = terrain.wall_contact();
        self.flags.touching_wall = self.wall.contact.is_some();

        if self.transition.is_some() {
            return;
        }

        // Recoil owns the grounded flag until it ends.
        if !self.flags.recoiling {
            if grounded && !self.flags.on_ground && !self.flags.jumping && !self.flags.bouncing {
                self.back_on_ground();
            } else if !grounded && self.flags.on_ground {
                self.leave_ground();
            }
        }

        self.flags.falling = !self.flags.on_ground && self.last_velocity.y < 0.0;
        if self.flags.falling {
            self.timers.ensure_running(TimerId::FallTime);
        } else {
            self.timers.cancel(TimerId::FallTime);
        }

        self.check_floating(grounded, terrain);
    }

    /// Airborne with no vertical motion and nothing to explain it: the hero is
    /// wedged somewhere. Clear recoil and re-ground after a grace period.
    fn check_floating(&mut self, grounded: bool, terrain: &impl TerrainSensor) {
        let stalled = !self.flags.on_ground
            && self.last_velocity.y.abs() < FLOAT_EPSILON
            && !self.flags.jumping
            && !self.flags.bouncing
            && !self.flags.wall_sliding
            && self.flags.dash.is_none()
            && !self.flags.empowered;
        if !stalled {
            self.timers.cancel(TimerId::FloatingCheck);
            return;
        }

        self.timers.ensure_running(TimerId::FloatingCheck);
        if self.timers.elapsed(TimerId::FloatingCheck) < self.tuning.floating_check_time {
            return;
        }
        self.timers.cancel(TimerId::FloatingCheck);
        debug!("Hero floating check tripped (grounded={})", grounded);
        if self.flags.recoiling {
            self.end_recoil(terrain);
        }
        if grounded && !self.flags.on_ground {
            self.back_on_ground();
        }
    }

    pub(crate) fn back_on_ground(&mut self) {
        let fall_time = self.timers.elapsed(TimerId::FallTime);
        let landing_dash = self.flags.dash == Some(DashKind::Down);

        self.flags.on_ground = true;
        self.flags.falling = false;
        self.air_dashed = false;
        self.cancel_wall_slide();
        self.cancel_jump();
        self.cancel_bounce();
        for id in [
            TimerId::FallTime,
            TimerId::LedgeBuffer,
            TimerId::FloatingCheck,
        ] {
            self.timers.cancel(id);
        }
        self.milestone(Milestone::Landed);

        if landing_dash {
            self.finish_dash();
        }
        if self.state.current() == CoarseState::NoInput {
            return;
        }

        if fall_time > self.tuning.big_fall_time {
            self.timers.arm(TimerId::HardLanding, self.tuning.hard_landing_time);
            self.set_state(CoarseState::HardLanding);
        } else if landing_dash {
            self.timers.arm(TimerId::DashLanding, self.tuning.dash_landing_time);
            self.set_state(CoarseState::DashLanding);
        } else {
            self.set_state(StateRequest::Grounded);
        }
        self.emit(HeroSignal::LandingDust);
    }

    fn leave_ground(&mut self) {
        self.flags.on_ground = false;
        if !self.flags.jumping && self.flags.dash.is_none() {
            self.timers.arm(TimerId::LedgeBuffer, self.tuning.ledge_buffer_time);
        }
        if matches!(
            self.state.current(),
            CoarseState::Idle | CoarseState::Running
        ) {
            self.set_state(CoarseState::Airborne);
        }
        self.milestone(Milestone::LeftGround);
    }

    /// Keep the coarse state honest with the grounded flag, and release a
    /// landing state that lost its floor.
    pub(crate) fn update_landing_states(&mut self) {
        match self.state.current() {
            CoarseState::Airborne if self.flags.on_ground => {
                self.set_state(StateRequest::Grounded);
            }
            CoarseState::Idle | CoarseState::Running if !self.flags.on_ground => {
                self.set_state(CoarseState::Airborne);
            }
            state @ (CoarseState::HardLanding | CoarseState::DashLanding) => {
                if !self.landing_timer_active(state) {
                    self.finish_landing();
                    return;
                }
                if self.last_grounded {
                    self.timers.cancel(TimerId::LandingFailSafe);
                    return;
                }
                self.timers.ensure_running(TimerId::LandingFailSafe);
                if self.timers.elapsed(TimerId::LandingFailSafe)
                    >= self.tuning.landing_failsafe_time
                {
                    warn!("Landing state lost its floor, forcing airborne");
                    for id in [
                        TimerId::HardLanding,
                        TimerId::DashLanding,
                        TimerId::LandingFailSafe,
                    ] {
                        self.timers.cancel(id);
                    }
                    self.flags.on_ground = false;
                    self.set_state(CoarseState::Airborne);
                }
            }
            _ => {}
        }
    }

    pub(crate) fn finish_landing(&mut self) {
        self.timers.cancel(TimerId::LandingFailSafe);
        if self.state.current().is_landing() {
            self.set_state(StateRequest::Grounded);
        }
    }

    // ------------------------------------------------------------------------
    // Actions
    // ------------------------------------------------------------------------

    pub(crate) fn process_actions(&mut self) {
        if !self.state.current().accepts_actions() {
            self.queues.clear();
            return;
        }
        self.process_jump();
        self.process_dash();
        self.process_attack();
    }

    fn process_jump(&mut self) {
        let button = self.input.jump;
        if button.released {
            self.release_jump();
        }

        if button.pressed {
            if self.flags.wall_sliding {
                self.wall_jump();
            } else if self.can_jump() {
                self.begin_jump();
            } else if !self.flags.on_ground
                && self.input.vertical < 0.0
                && self.can_attack()
            {
                self.try_attack(AttackTrigger::AirDownslash);
            } else {
                self.queues.jump.arm();
            }
            return;
        }

        if self.queues.jump.is_active() {
            if !button.held {
                self.queues.jump.clear();
            } else if self.queues.jump.advance(self.tuning.jump_queue_steps) && self.can_jump() {
                self.begin_jump();
            }
        }
    }

    fn process_dash(&mut self) {
        if self.input.dash.pressed {
            if !self.try_dash() {
                self.queues.dash.arm();
            }
        } else if self.queues.dash.advance(self.tuning.dash_queue_steps) && self.try_dash() {
            self.queues.dash.clear();
        }
    }

    pub(crate) fn begin_jump(&mut self) {
        self.flags.jumping = true;
        self.jump = JumpTracker::default();
        self.timers.cancel(TimerId::LedgeBuffer);
        self.queues.jump.clear();
        self.cancel_bounce();
        self.milestone(Milestone::Jumped);
        self.play(HeroClip::Airborne);
    }

    fn release_jump(&mut self) {
        if !self.flags.jumping {
            return;
        }
        if self.jump.steps >= self.tuning.jump_steps_min {
            self.cancel_jump();
        } else {
            self.jump.release_queued = true;
        }
    }

    pub(crate) fn cancel_jump(&mut self) {
        self.flags.jumping = false;
        self.jump = JumpTracker::default();
    }

    fn wall_jump(&mut self) {
        let Some(side) = self.wall.sliding else {
            return;
        };
        self.cancel_wall_slide();
        self.facing = side.facing_away();
        self.wall.lock_direction = -side.sign();
        self.timers.arm(TimerId::WallLock, self.tuning.wall_lock_time);
        self.begin_jump();
        self.milestone(Milestone::WallJumped);
    }

    /// Pick and start a dash variant. Returns false when no variant is allowed.
    fn try_dash(&mut self) -> bool {
        if self.input.vertical > 0.0 && self.flags.on_ground && self.can_back_dash() {
            self.begin_dash(DashKind::Back);
            return true;
        }
        if !self.can_dash() {
            return false;
        }
        let kind = if !self.flags.on_ground && self.input.vertical < 0.0 {
            DashKind::Down
        } else {
            DashKind::Forward
        };
        self.begin_dash(kind);
        true
    }

    pub(crate) fn begin_dash(&mut self, kind: DashKind) {
        self.cancel_attack();
        self.cancel_jump();
        self.cancel_bounce();
        self.cancel_wall_slide();

        self.flags.dash = Some(kind);
        self.dash_sign = match kind {
            DashKind::Back => -self.facing.sign(),
            _ => self.facing.sign(),
        };
        if kind == DashKind::Back {
            self.timers.arm(TimerId::DashDuration, self.tuning.back_dash_time);
            self.timers
                .arm(TimerId::BackDashCooldown, self.tuning.back_dash_cooldown);
        } else {
            self.timers.arm(TimerId::DashDuration, self.tuning.dash_time);
            self.timers.arm(TimerId::DashCooldown, self.tuning.dash_cooldown);
            if !self.flags.on_ground {
                self.air_dashed = true;
            }
        }
        self.queues.dash.clear();
        self.milestone(Milestone::Dashed);
        self.play(if kind == DashKind::Back {
            HeroClip::BackDash
        } else {
            HeroClip::Dash
        });
    }

    pub(crate) fn finish_dash(&mut self) {
        let Some(kind) = self.flags.dash.take() else {
            return;
        };
        self.timers.cancel(TimerId::DashDuration);
        self.milestone(Milestone::DashEnded);
        self.stop(if kind == DashKind::Back {
            HeroClip::BackDash
        } else {
            HeroClip::Dash
        });
    }

    // ------------------------------------------------------------------------
    // Wall slide
    // ------------------------------------------------------------------------

    pub(crate) fn update_wall_slide(&mut self) {
        let Some(side) = self.wall.sliding else {
            if let Some(side) = self.wall_slide_candidate() {
                self.begin_wall_slide(side);
            }
            return;
        };

        let lost = self.flags.on_ground
            || self.wall.contact != Some(side)
            || self.flags.dash.is_some()
            || self.flags.recoiling
            || self.flags.empowered
            || !self.state.current().accepts_actions();
        if lost {
            self.cancel_wall_slide();
            return;
        }

        if self.input.move_x == -side.sign() {
            self.wall.unstick_steps += 1;
            if self.wall.unstick_steps >= self.tuning.wall_sticky_steps {
                self.cancel_wall_slide();
            }
        } else {
            self.wall.unstick_steps = 0;
        }
    }

    fn begin_wall_slide(&mut self, side: WallSide) {
        self.flags.wall_sliding = true;
        self.wall.sliding = Some(side);
        self.wall.unstick_steps = 0;
        self.facing = side.facing_away();
        self.air_dashed = false;
        self.milestone(Milestone::WallSlideStarted);
        self.play(HeroClip::WallSlide);
    }

    pub(crate) fn cancel_wall_slide(&mut self) {
        if self.wall.sliding.take().is_some() {
            self.stop(HeroClip::WallSlide);
        }
        self.flags.wall_sliding = false;
        self.wall.unstick_steps = 0;
    }

    // ------------------------------------------------------------------------
    // Bounce and horizontal recoil
    // ------------------------------------------------------------------------

    /// Launch upward off a bounceable. Consumes a stored parry boost.
    pub fn bounce(&mut self) {
        if self.flags.empowered
            || self.flags.any_death()
            || self.flags.recoiling
            || self.transition.is_some()
        {
            return;
        }
        self.cancel_jump();
        self.finish_dash();
        self.cancel_wall_slide();
        self.bounce_multiplier = if std::mem::take(&mut self.combat.bounce_boost) {
            self.tuning.parry_bounce_multiplier
        } else {
            1.0
        };
        self.flags.bouncing = true;
        self.flags.on_ground = false;
        self.air_dashed = false;
        self.timers.arm(TimerId::BounceDuration, self.tuning.bounce_time);
        self.milestone(Milestone::Bounced);
    }

    pub(crate) fn cancel_bounce(&mut self) {
        self.flags.bouncing = false;
        self.timers.cancel(TimerId::BounceDuration);
    }

    /// Short horizontal push, e.g. after a strike connects. A recoil already in
    /// progress is not restarted.
    pub fn recoil(&mut self, side: RecoilSide, long: bool) {
        if self.flags.recoil.is_some() || self.flags.any_death() || self.flags.empowered {
            return;
        }
        self.finish_dash();
        self.flags.recoil = Some(side);
        self.recoil_long = long;
        self.timers
            .arm(TimerId::HorizontalRecoil, self.tuning.recoil_time);
    }

    pub(crate) fn cancel_horizontal_recoil(&mut self) {
        self.flags.recoil = None;
        self.timers.cancel(TimerId::HorizontalRecoil);
    }

    // ------------------------------------------------------------------------
    // Velocity proposals
    // ------------------------------------------------------------------------

    pub(crate) fn propose_motion(&mut self, plan: &mut MotionPlan) {
        if std::mem::take(&mut self.pending_stop) {
            plan.propose(MotionSource::Scripted, Vec2::ZERO);
        }
        self.propose_move(plan);
        self.propose_wall_lock(plan);
        self.propose_jump(plan);
        self.propose_wall_slide(plan);
        self.propose_bounce(plan);
        self.propose_dash(plan);
        self.propose_recoil(plan);
        self.propose_knockback(plan);
        self.propose_transition(plan);
        self.propose_thrust(plan);
    }

    fn propose_move(&self, plan: &mut MotionPlan) {
        match self.state.current() {
            CoarseState::Idle | CoarseState::Running | CoarseState::Airborne => {
                let speed = if self.flags.in_walk_zone {
                    self.tuning.walk_speed
                } else {
                    self.tuning.run_speed
                };
                plan.propose_x(MotionSource::Move, self.input.move_x * speed);
            }
            CoarseState::HardLanding | CoarseState::DashLanding => {
                plan.propose_x(MotionSource::Move, 0.0);
            }
            CoarseState::NoInput => {}
        }
    }

    fn propose_wall_lock(&self, plan: &mut MotionPlan) {
        if self.timers.is_active(TimerId::WallLock) {
            plan.propose_x(
                MotionSource::WallLock,
                self.wall.lock_direction * self.tuning.wall_jump_speed,
            );
        }
    }

    fn propose_jump(&mut self, plan: &mut MotionPlan) {
        if !self.flags.jumping {
            return;
        }
        plan.propose_y(MotionSource::Jump, self.tuning.jump_speed);
        self.jump.steps += 1;
        let released = self.jump.release_queued && self.jump.steps >= self.tuning.jump_steps_min;
        if released || self.jump.steps >= self.tuning.jump_steps {
            self.cancel_jump();
        }
    }

    fn propose_wall_slide(&self, plan: &mut MotionPlan) {
        if !self.flags.wall_sliding {
            return;
        }
        let vy = plan.base().y;
        let target = -self.tuning.wall_slide_speed;
        plan.propose_y(
            MotionSource::WallSlide,
            vy + (target - vy) * self.tuning.wall_slide_blend,
        );
    }

    fn propose_bounce(&self, plan: &mut MotionPlan) {
        if !self.flags.bouncing {
            return;
        }
        let fraction = self.timers.get(TimerId::BounceDuration).fraction_left();
        let lift = self.tuning.bounce_speed * self.bounce_multiplier * fraction;
        plan.propose_y(MotionSource::Bounce, lift.max(plan.base().y));
    }

    fn propose_dash(&self, plan: &mut MotionPlan) {
        match self.flags.dash {
            Some(DashKind::Forward) => plan.propose(
                MotionSource::Dash,
                Vec2::new(self.dash_sign * self.tuning.dash_speed, 0.0),
            ),
            Some(DashKind::Back) => plan.propose(
                MotionSource::Dash,
                Vec2::new(self.dash_sign * self.tuning.back_dash_speed, 0.0),
            ),
            Some(DashKind::Down) => plan.propose(
                MotionSource::Dash,
                Vec2::new(0.0, -self.tuning.down_dash_speed),
            ),
            None => {}
        }
    }

    fn propose_recoil(&self, plan: &mut MotionPlan) {
        let Some(side) = self.flags.recoil else {
            return;
        };
        let speed = if self.recoil_long {
            self.tuning.recoil_speed_long
        } else {
            self.tuning.recoil_speed
        };
        let vx = plan.base().x;
        let target = side.sign() * speed;
        plan.propose_x(
            MotionSource::Recoil,
            vx + (target - vx) * self.tuning.recoil_blend,
        );
    }

    fn propose_knockback(&self, plan: &mut MotionPlan) {
        if let Some(velocity) = self.knockback {
            plan.propose(MotionSource::Knockback, velocity);
        }
    }

    fn propose_transition(&self, plan: &mut MotionPlan) {
        if let Some(transition) = &self.transition {
            plan.propose(MotionSource::Scripted, transition.velocity(&self.tuning));
        }
    }

    fn propose_thrust(&self, plan: &mut MotionPlan) {
        if let Some(velocity) = self.combat.thrust {
            plan.propose(MotionSource::Empowered, velocity);
        }
    }
}
