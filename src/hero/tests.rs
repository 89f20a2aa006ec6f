//! Hero domain: controller tests driven through scripted body and terrain doubles.

use avian2d::prelude::{LayerMask, PhysicsLayer};
use bevy::prelude::*;

use crate::content::SlashLibrary;
use crate::core::GameplayPaused;
use crate::hero::combat::{
    AttackDirection, AttackTrigger, ParryDirection, SlashContext, SlashKind, select_slash,
};
use crate::hero::components::{
    DamageHero, GameLayer, HeroHurtbox, Player, soft_terrain_filter, terrain_layers,
};
use crate::hero::controller::HeroController;
use crate::hero::damage::{CollisionSide, DamageMode, HazardKind, HitEvent};
use crate::hero::events::{HeroSignal, Milestone};
use crate::hero::flags::{ConditionFlags, HeroFlag, RecoilSide, UnknownFlag};
use crate::hero::input::{ButtonState, HeroInput};
use crate::hero::motion::{MotionPlan, MotionSource};
use crate::hero::body::{Facing, HeroBody, TerrainSensor, WallSide};
use crate::hero::state::{CoarseState, StateMachine, StateRequest};
use crate::hero::systems::sync_pause_flag;
use crate::hero::timers::{TimerBank, TimerId};
use crate::hero::transition::{EntryGate, EntryStage, SceneEdge, SceneTransition};
use crate::hero::tuning::HeroTuning;

const DT: f32 = 1.0 / 60.0;

// -----------------------------------------------------------------------------
// Doubles
// -----------------------------------------------------------------------------

#[derive(Debug)]
struct FakeBody {
    velocity: Vec2,
    gravity: bool,
    position: Vec2,
}

impl Default for FakeBody {
    fn default() -> Self {
        Self {
            velocity: Vec2::ZERO,
            gravity: true,
            position: Vec2::ZERO,
        }
    }
}

impl HeroBody for FakeBody {
    fn velocity(&self) -> Vec2 {
        self.velocity
    }

    fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
    }

    fn gravity_enabled(&self) -> bool {
        self.gravity
    }

    fn set_gravity_enabled(&mut self, enabled: bool) {
        self.gravity = enabled;
    }

    fn position(&self) -> Vec2 {
        self.position
    }

    fn teleport(&mut self, position: Vec2) {
        self.position = position;
    }
}

#[derive(Debug, Default)]
struct ScriptedTerrain {
    ground: bool,
    wall: Option<WallSide>,
    soft_terrain: bool,
}

impl TerrainSensor for ScriptedTerrain {
    fn touching_ground(&self) -> bool {
        self.ground
    }

    fn touching_wall(&self, side: WallSide) -> bool {
        self.wall == Some(side)
    }

    fn strike_hits_soft_terrain(&self, _reach: Vec2) -> bool {
        self.soft_terrain
    }
}

struct Rig {
    hero: HeroController,
    body: FakeBody,
    terrain: ScriptedTerrain,
    input: HeroInput,
    log: Vec<HeroSignal>,
}

impl Rig {
    fn with_controller(hero: HeroController, ground: bool) -> Self {
        let mut rig = Self {
            hero,
            body: FakeBody::default(),
            terrain: ScriptedTerrain {
                ground,
                ..default()
            },
            input: HeroInput::default(),
            log: Vec::new(),
        };
        rig.step();
        rig.log.clear();
        rig
    }

    fn grounded() -> Self {
        Self::with_controller(controller(), true)
    }

    fn airborne() -> Self {
        Self::with_controller(controller(), false)
    }

    fn step(&mut self) {
        self.hero
            .tick(DT, &self.input, &mut self.body, &self.terrain);
        self.input.consume_edges();
        self.log.extend(self.hero.drain_signals());
    }

    fn steps(&mut self, n: usize) {
        for _ in 0..n {
            self.step();
        }
    }

    /// Step until `done` holds, giving up after `max` steps.
    fn step_until(&mut self, max: usize, done: impl Fn(&HeroController) -> bool) -> bool {
        for _ in 0..max {
            self.step();
            if done(&self.hero) {
                return true;
            }
        }
        false
    }

    fn press_jump(&mut self) {
        self.input.jump = ButtonState::just_pressed();
    }

    fn release_jump(&mut self) {
        self.input.jump = ButtonState::just_released();
    }

    fn press_dash(&mut self) {
        self.input.dash = ButtonState::just_pressed();
    }

    fn press_attack(&mut self) {
        self.input.attack = ButtonState::just_pressed();
    }

    fn hit(&mut self, hit: HitEvent) {
        self.hero.take_damage(hit);
        self.log.extend(self.hero.drain_signals());
    }

    fn saw(&self, signal: &HeroSignal) -> bool {
        self.log.contains(signal)
    }

    fn saw_milestone(&self, milestone: Milestone) -> bool {
        self.saw(&HeroSignal::Milestone(milestone))
    }

    fn count(&self, signal: &HeroSignal) -> usize {
        self.log.iter().filter(|s| *s == signal).count()
    }
}

fn controller() -> HeroController {
    HeroController::new(
        HeroTuning::default(),
        Vec2::ZERO,
        SlashLibrary::builtin().kinds(),
    )
}

fn approx(a: Vec2, b: Vec2) -> bool {
    (a - b).length() < 1e-3
}

// -----------------------------------------------------------------------------
// Pure pieces
// -----------------------------------------------------------------------------

#[test]
fn test_motion_plan_highest_source_wins() {
    let mut plan = MotionPlan::new(Vec2::new(10.0, 0.0));
    plan.propose_x(MotionSource::Move, 100.0);
    plan.propose_x(MotionSource::Dash, 640.0);
    plan.propose_x(MotionSource::Jump, 5.0);

    assert_eq!(plan.winner_x(), Some(MotionSource::Dash));
    assert_eq!(plan.winner_y(), None);
    assert_eq!(plan.resolve(670.0), Vec2::new(640.0, 0.0));
}

#[test]
fn test_motion_plan_fall_clamp() {
    let plan = MotionPlan::new(Vec2::new(0.0, -900.0));
    assert_eq!(plan.resolve(670.0).y, -670.0);

    let mut knockback = MotionPlan::new(Vec2::ZERO);
    knockback.propose_y(MotionSource::Knockback, -900.0);
    assert_eq!(knockback.resolve(670.0).y, -670.0);

    for source in [
        MotionSource::Dash,
        MotionSource::Scripted,
        MotionSource::Empowered,
    ] {
        let mut plan = MotionPlan::new(Vec2::ZERO);
        plan.propose_y(source, -900.0);
        assert_eq!(plan.resolve(670.0).y, -900.0, "{:?} should skip the clamp", source);
    }
}

#[test]
fn test_state_machine_grounded_and_no_input() {
    let mut machine = StateMachine::default();
    assert_eq!(machine.current(), CoarseState::Idle);

    assert_eq!(
        machine.set(StateRequest::Grounded, 1.0),
        Some(CoarseState::Running)
    );
    assert_eq!(machine.set(CoarseState::NoInput, 0.0), Some(CoarseState::NoInput));
    assert_eq!(machine.previous(), CoarseState::Running);

    assert_eq!(machine.exit_no_input(true), Some(CoarseState::Running));
    assert_eq!(machine.exit_no_input(true), None);

    machine.set(CoarseState::NoInput, 0.0);
    assert_eq!(machine.exit_no_input(false), Some(CoarseState::Airborne));
}

#[test]
fn test_timer_bank_reports_expiry_once() {
    let mut timers = TimerBank::default();
    timers.arm(TimerId::AttackDuration, 0.5);

    assert!(timers.tick(0.25).is_empty());
    assert_eq!(timers.tick(0.25), vec![TimerId::AttackDuration]);
    assert!(timers.tick(0.25).is_empty());
    assert!(timers.is_idle(TimerId::AttackDuration));
}

#[test]
fn test_timer_bank_count_up() {
    let mut timers = TimerBank::default();
    timers.ensure_running(TimerId::FallTime);
    timers.tick(0.25);
    timers.ensure_running(TimerId::FallTime);
    timers.tick(0.25);

    assert_eq!(timers.elapsed(TimerId::FallTime), 0.5);
    timers.cancel(TimerId::FallTime);
    assert!(timers.is_idle(TimerId::FallTime));
    assert!(timers.all_zero());
}

#[test]
fn test_select_slash() {
    let ctx = SlashContext {
        trigger: AttackTrigger::Primary,
        vertical: 0.0,
        airborne: false,
        wall_sliding: false,
        alt_next: false,
    };

    assert_eq!(select_slash(ctx), (SlashKind::Slash, AttackDirection::Normal));
    assert_eq!(
        select_slash(SlashContext {
            alt_next: true,
            ..ctx
        }),
        (SlashKind::AltSlash, AttackDirection::Normal)
    );
    assert_eq!(
        select_slash(SlashContext {
            vertical: 1.0,
            ..ctx
        }),
        (SlashKind::UpSlash, AttackDirection::Upward)
    );
    // Down on the ground is an ordinary slash
    assert_eq!(
        select_slash(SlashContext {
            vertical: -1.0,
            ..ctx
        }),
        (SlashKind::Slash, AttackDirection::Normal)
    );
    assert_eq!(
        select_slash(SlashContext {
            vertical: -1.0,
            airborne: true,
            ..ctx
        }),
        (SlashKind::DownSlash, AttackDirection::Downward)
    );
    assert_eq!(
        select_slash(SlashContext {
            wall_sliding: true,
            vertical: 1.0,
            ..ctx
        }),
        (SlashKind::WallSlash, AttackDirection::Normal)
    );
    assert_eq!(
        select_slash(SlashContext {
            trigger: AttackTrigger::AirDownslash,
            ..ctx
        }),
        (SlashKind::DownSlash, AttackDirection::Downward)
    );
}

#[test]
fn test_parry_direction_from_axis() {
    assert_eq!(
        ParryDirection::from_axis(Vec2::new(1.0, 1.0), Facing::Left),
        ParryDirection::NorthEast
    );
    assert_eq!(
        ParryDirection::from_axis(Vec2::new(0.0, -1.0), Facing::Right),
        ParryDirection::South
    );
    assert_eq!(
        ParryDirection::from_axis(Vec2::ZERO, Facing::Left),
        ParryDirection::West
    );
}

// -----------------------------------------------------------------------------
// Ground and jump
// -----------------------------------------------------------------------------

#[test]
fn test_first_tick_lands_on_ground() {
    let rig = Rig::grounded();
    assert!(rig.hero.flags().on_ground);
    assert_eq!(rig.hero.state(), CoarseState::Idle);

    let rig = Rig::airborne();
    assert!(!rig.hero.flags().on_ground);
    assert_eq!(rig.hero.state(), CoarseState::Airborne);
}

#[test]
fn test_running_and_facing_follow_input() {
    let mut rig = Rig::grounded();
    rig.input.axis = Vec2::new(-1.0, 0.0);
    rig.step();

    assert_eq!(rig.hero.state(), CoarseState::Running);
    assert_eq!(rig.hero.facing(), Facing::Left);
    assert_eq!(rig.body.velocity.x, -rig.hero.tuning().run_speed);

    // Inside the deadzone counts as neutral
    rig.input.axis = Vec2::new(0.2, 0.0);
    rig.step();
    assert_eq!(rig.hero.state(), CoarseState::Idle);
    assert_eq!(rig.body.velocity.x, 0.0);
}

#[test]
fn test_held_jump_runs_for_max_steps() {
    let mut rig = Rig::grounded();
    let tuning = rig.hero.tuning().clone();

    rig.press_jump();
    rig.step();
    assert!(rig.hero.flags().jumping);
    assert_eq!(rig.body.velocity.y, tuning.jump_speed);
    assert!(rig.saw_milestone(Milestone::Jumped));

    rig.terrain.ground = false;
    rig.steps(tuning.jump_steps as usize - 2);
    assert!(rig.hero.flags().jumping);
    assert_eq!(rig.hero.state(), CoarseState::Airborne);

    rig.step();
    assert!(!rig.hero.flags().jumping);
}

#[test]
fn test_early_release_still_gets_min_steps() {
    let mut rig = Rig::grounded();
    let min = rig.hero.tuning().jump_steps_min as usize;

    rig.press_jump();
    rig.step();
    rig.terrain.ground = false;
    rig.release_jump();
    rig.step();

    // Release was queued, the jump carries on until the minimum
    rig.steps(min - 3);
    assert!(rig.hero.flags().jumping);
    rig.step();
    assert!(!rig.hero.flags().jumping);
}

#[test]
fn test_release_after_min_cuts_jump() {
    let mut rig = Rig::grounded();
    let min = rig.hero.tuning().jump_steps_min as usize;

    rig.press_jump();
    rig.step();
    rig.terrain.ground = false;
    rig.steps(min);
    assert!(rig.hero.flags().jumping);

    rig.release_jump();
    rig.step();
    assert!(!rig.hero.flags().jumping);
}

#[test]
fn test_jump_pressed_just_before_landing_is_queued() {
    let mut rig = Rig::airborne();

    rig.press_jump();
    rig.step();
    assert!(!rig.hero.flags().jumping);

    rig.terrain.ground = true;
    rig.step();
    assert!(rig.hero.flags().jumping);
}

#[test]
fn test_jump_queue_expires() {
    let mut rig = Rig::airborne();
    let queue_steps = rig.hero.tuning().jump_queue_steps as usize;

    rig.press_jump();
    rig.step();
    rig.steps(queue_steps + 1);

    rig.terrain.ground = true;
    rig.step();
    assert!(!rig.hero.flags().jumping);
}

#[test]
fn test_ledge_buffer_allows_late_jump() {
    let mut rig = Rig::grounded();
    rig.terrain.ground = false;
    rig.step();
    assert!(!rig.hero.flags().on_ground);
    assert!(rig.hero.timers().is_active(TimerId::LedgeBuffer));

    rig.press_jump();
    rig.step();
    assert!(rig.hero.flags().jumping);
}

#[test]
fn test_ledge_buffer_runs_out() {
    let mut rig = Rig::grounded();
    rig.terrain.ground = false;
    rig.steps(10);

    rig.press_jump();
    rig.step();
    assert!(!rig.hero.flags().jumping);
}

// -----------------------------------------------------------------------------
// Wall slide
// -----------------------------------------------------------------------------

fn sliding_rig() -> Rig {
    let mut rig = Rig::airborne();
    rig.terrain.wall = Some(WallSide::Right);
    rig.input.axis = Vec2::new(1.0, 0.0);
    rig.body.velocity = Vec2::new(0.0, -50.0);
    rig.step();
    rig
}

#[test]
fn test_wall_slide_starts_when_pushing_into_wall() {
    let rig = sliding_rig();
    let tuning = rig.hero.tuning();

    assert!(rig.hero.flags().wall_sliding);
    assert!(rig.hero.can_wall_slide());
    assert_eq!(rig.hero.facing(), Facing::Left);
    assert!(rig.saw_milestone(Milestone::WallSlideStarted));

    let expected = -50.0 + (-tuning.wall_slide_speed + 50.0) * tuning.wall_slide_blend;
    assert!((rig.body.velocity.y - expected).abs() < 1e-3);
}

#[test]
fn test_wall_jump_pushes_away() {
    let mut rig = sliding_rig();
    let tuning = rig.hero.tuning().clone();

    rig.press_jump();
    rig.step();

    assert!(rig.hero.flags().jumping);
    assert!(!rig.hero.flags().wall_sliding);
    assert!(!rig.hero.can_wall_slide());
    assert!(rig.hero.timers().is_active(TimerId::WallLock));
    assert_eq!(
        rig.body.velocity,
        Vec2::new(-tuning.wall_jump_speed, tuning.jump_speed)
    );
    assert!(rig.saw_milestone(Milestone::WallJumped));
}

#[test]
fn test_wall_slide_unsticks_after_sticky_steps() {
    let mut rig = sliding_rig();
    let sticky = rig.hero.tuning().wall_sticky_steps as usize;

    rig.input.axis = Vec2::new(-1.0, 0.0);
    rig.steps(sticky - 1);
    assert!(rig.hero.flags().wall_sliding);

    rig.step();
    assert!(!rig.hero.flags().wall_sliding);
}

// -----------------------------------------------------------------------------
// Dash
// -----------------------------------------------------------------------------

#[test]
fn test_dash_and_cooldown() {
    let mut rig = Rig::grounded();
    let tuning = rig.hero.tuning().clone();

    rig.press_dash();
    rig.step();
    assert!(rig.hero.flag(HeroFlag::Dashing));
    assert_eq!(rig.body.velocity, Vec2::new(tuning.dash_speed, 0.0));
    assert!(!rig.body.gravity);

    assert!(rig.step_until(30, |h| !h.flags().dashing()));
    assert!(rig.body.gravity);
    assert!(rig.saw_milestone(Milestone::DashEnded));

    rig.press_dash();
    rig.step();
    assert!(!rig.hero.flags().dashing());
}

#[test]
fn test_back_dash_moves_against_facing() {
    let mut rig = Rig::grounded();
    rig.input.axis = Vec2::new(0.0, 1.0);
    rig.press_dash();
    rig.step();

    assert!(rig.hero.flag(HeroFlag::BackDashing));
    assert!(!rig.hero.flag(HeroFlag::Dashing));
    assert_eq!(rig.body.velocity.x, -rig.hero.tuning().back_dash_speed);
}

#[test]
fn test_up_dash_in_air_is_an_ordinary_dash() {
    let mut rig = Rig::airborne();
    rig.input.axis = Vec2::new(0.0, 1.0);
    rig.press_dash();
    rig.step();

    assert!(rig.hero.flag(HeroFlag::Dashing));
    assert!(!rig.hero.flag(HeroFlag::BackDashing));
    assert_eq!(rig.body.velocity.x.abs(), rig.hero.tuning().dash_speed);
}

#[test]
fn test_one_air_dash_until_landing() {
    let mut rig = Rig::airborne();

    rig.press_dash();
    rig.step();
    assert!(rig.hero.flags().dashing());
    rig.steps(45);
    assert!(rig.hero.timers().is_idle(TimerId::DashCooldown));

    rig.press_dash();
    rig.step();
    assert!(!rig.hero.flags().dashing());

    rig.terrain.ground = true;
    rig.step();
    rig.press_dash();
    rig.step();
    assert!(rig.hero.flags().dashing());
}

#[test]
fn test_down_dash_lands_into_dash_landing() {
    let mut rig = Rig::airborne();
    let tuning = rig.hero.tuning().clone();

    rig.input.axis = Vec2::new(0.0, -1.0);
    rig.press_dash();
    rig.step();
    // Dash velocity is not held to the terminal fall speed
    assert_eq!(rig.body.velocity, Vec2::new(0.0, -tuning.down_dash_speed));

    rig.terrain.ground = true;
    rig.step();
    assert_eq!(rig.hero.state(), CoarseState::DashLanding);
    assert!(rig.hero.flags().dash.is_none());

    rig.input.axis = Vec2::ZERO;
    assert!(rig.step_until(30, |h| h.state() == CoarseState::Idle));
}

#[test]
fn test_dash_cancels_attack() {
    let mut rig = Rig::grounded();
    rig.press_attack();
    rig.step();
    assert!(rig.hero.flags().attacking);

    rig.press_dash();
    rig.step();
    assert!(rig.hero.flags().dashing());
    assert!(!rig.hero.flags().attacking);
}

// -----------------------------------------------------------------------------
// Landings
// -----------------------------------------------------------------------------

fn long_fall(rig: &mut Rig) {
    rig.body.velocity = Vec2::new(0.0, -300.0);
    rig.steps(75);
    rig.terrain.ground = true;
    rig.step();
}

#[test]
fn test_long_fall_hard_lands() {
    let mut rig = Rig::airborne();
    long_fall(&mut rig);
    assert_eq!(rig.hero.state(), CoarseState::HardLanding);

    rig.press_jump();
    rig.step();
    assert!(!rig.hero.flags().jumping);

    assert!(rig.step_until(60, |h| h.state() == CoarseState::Idle));
}

#[test]
fn test_landing_fail_safe_forces_airborne() {
    let mut rig = Rig::airborne();
    long_fall(&mut rig);
    assert_eq!(rig.hero.state(), CoarseState::HardLanding);

    rig.terrain.ground = false;
    assert!(rig.step_until(15, |h| h.state() == CoarseState::Airborne));
    assert!(rig.hero.timers().is_idle(TimerId::HardLanding));
}

#[test]
fn test_landing_that_expires_without_control_resolves_on_regain() {
    let mut rig = Rig::airborne();
    long_fall(&mut rig);
    assert_eq!(rig.hero.state(), CoarseState::HardLanding);

    rig.hero.relinquish_control();
    rig.steps(60);
    assert!(rig.hero.timers().is_idle(TimerId::HardLanding));

    rig.hero.regain_control();
    assert_eq!(rig.hero.state(), CoarseState::Idle);

    rig.input.axis = Vec2::new(1.0, 0.0);
    rig.step();
    assert_eq!(rig.hero.state(), CoarseState::Running);
    assert_eq!(rig.body.velocity.x, rig.hero.tuning().run_speed);
}

#[test]
fn test_hit_during_dash_landing_does_not_strand_the_landing() {
    let mut rig = Rig::airborne();
    rig.input.axis = Vec2::new(0.0, -1.0);
    rig.press_dash();
    rig.step();
    rig.terrain.ground = true;
    rig.step();
    assert_eq!(rig.hero.state(), CoarseState::DashLanding);

    rig.input.axis = Vec2::ZERO;
    rig.steps(3);
    rig.hit(HitEvent::contact(CollisionSide::Top, 1));
    assert!(rig.step_until(40, |h| !h.flags().recoiling));

    assert!(rig.hero.timers().is_idle(TimerId::DashLanding));
    assert_eq!(rig.hero.state(), CoarseState::Idle);
    rig.press_jump();
    rig.step();
    assert!(rig.hero.flags().jumping);
}

// -----------------------------------------------------------------------------
// Attacks
// -----------------------------------------------------------------------------

fn slashes(rig: &Rig) -> Vec<SlashKind> {
    rig.log
        .iter()
        .filter_map(|signal| match signal {
            HeroSignal::Slash { kind, .. } => Some(*kind),
            _ => None,
        })
        .collect()
}

#[test]
fn test_ground_slashes_alternate() {
    let mut rig = Rig::grounded();

    for _ in 0..3 {
        rig.press_attack();
        rig.step();
        assert!(rig.step_until(40, |h| h
            .timers()
            .is_idle(TimerId::AttackCooldown)));
    }

    assert_eq!(
        slashes(&rig),
        vec![SlashKind::Slash, SlashKind::AltSlash, SlashKind::Slash]
    );
}

#[test]
fn test_up_slash_sets_up_attacking() {
    let mut rig = Rig::grounded();
    rig.input.axis = Vec2::new(0.0, 1.0);
    rig.press_attack();
    rig.step();

    assert!(rig.hero.flag(HeroFlag::UpAttacking));
    assert_eq!(rig.hero.current_slash(), Some(SlashKind::UpSlash));
    assert!(rig.step_until(30, |h| !h.flags().attacking));
    assert!(!rig.hero.flag(HeroFlag::UpAttacking));
}

#[test]
fn test_attack_press_during_cooldown_is_queued() {
    let mut rig = Rig::grounded();
    rig.press_attack();
    rig.step();
    assert!(rig.step_until(40, |h| h.timers().remaining(TimerId::AttackCooldown)
        <= 2.5 * DT));

    rig.press_attack();
    rig.step();
    assert!(!rig.hero.flags().attacking);
    assert!(rig.hero.queues.attack.is_active());

    assert!(rig.step_until(4, |h| h.current_slash() == Some(SlashKind::AltSlash)));
}

#[test]
fn test_missing_slash_skips_attack() {
    let kinds = SlashLibrary::builtin()
        .kinds()
        .filter(|kind| *kind != SlashKind::UpSlash)
        .collect::<Vec<_>>();
    let hero = HeroController::new(HeroTuning::default(), Vec2::ZERO, kinds);
    let mut rig = Rig::with_controller(hero, true);

    rig.input.axis = Vec2::new(0.0, 1.0);
    rig.press_attack();
    rig.step();
    assert!(!rig.hero.flags().attacking);
    assert!(!rig.hero.queues.attack.is_active());
    assert!(slashes(&rig).is_empty());

    rig.input.axis = Vec2::ZERO;
    rig.press_attack();
    rig.step();
    assert_eq!(slashes(&rig), vec![SlashKind::Slash]);
}

#[test]
fn test_jump_with_down_in_air_downslashes() {
    let mut rig = Rig::airborne();
    rig.input.axis = Vec2::new(0.0, -1.0);
    rig.press_jump();
    rig.step();

    assert!(!rig.hero.flags().jumping);
    assert_eq!(rig.hero.current_slash(), Some(SlashKind::DownSlash));
    assert!(rig.hero.parry_invulnerability_active());
    assert!(rig.hero.flags().invulnerable);
}

#[test]
fn test_slash_into_terrain_recoils() {
    let mut rig = Rig::grounded();
    rig.terrain.soft_terrain = true;
    rig.press_attack();
    rig.step();

    assert_eq!(rig.hero.flags().recoil, Some(RecoilSide::Left));
    let expected = -rig.hero.tuning().recoil_speed * rig.hero.tuning().recoil_blend;
    assert!((rig.body.velocity.x - expected).abs() < 1e-3);
    assert!(
        rig.log
            .iter()
            .any(|s| matches!(s, HeroSignal::TerrainThunk { .. }))
    );

    assert!(rig.step_until(10, |h| h.flags().recoil.is_none()));
}

// -----------------------------------------------------------------------------
// Parry, thrust and bounce
// -----------------------------------------------------------------------------

fn parried_rig() -> Rig {
    let mut rig = Rig::airborne();
    rig.body.velocity = Vec2::new(0.0, -100.0);
    rig.input.axis = Vec2::new(0.0, -1.0);
    rig.press_attack();
    rig.step();
    assert!(rig.hero.parry_invulnerability_active());

    rig.hit(HitEvent::contact(CollisionSide::Bottom, 1));
    rig
}

#[test]
fn test_parry_stores_one_charge() {
    let mut rig = parried_rig();
    let max = rig.hero.max_health();

    assert_eq!(rig.hero.health(), max);
    assert!(rig.hero.has_empowered_charge());
    assert!(rig.hero.combat.bounce_boost);
    assert!(rig.saw_milestone(Milestone::Parried));

    rig.hit(HitEvent::contact(CollisionSide::Left, 1));
    assert_eq!(rig.hero.health(), max);
    assert_eq!(rig.count(&HeroSignal::Milestone(Milestone::Parried)), 2);
    assert!(rig.hero.has_empowered_charge());
}

#[test]
fn test_unused_parry_window_expires_without_charge() {
    let mut rig = Rig::airborne();
    rig.body.velocity = Vec2::new(0.0, -100.0);
    rig.input.axis = Vec2::new(0.0, -1.0);
    rig.press_attack();
    rig.step();
    assert!(rig.hero.timers().is_active(TimerId::ParryWindow));
    assert!(rig.hero.timers().is_active(TimerId::ParryCooldown));

    assert!(rig.step_until(30, |h| !h.parry_invulnerability_active()));
    assert!(!rig.hero.flags().invulnerable);
    assert!(!rig.hero.has_empowered_charge());
    assert!(rig.hero.timers().is_active(TimerId::ParryCooldown));
}

#[test]
fn test_parry_window_does_not_stop_lethal_hazards() {
    let mut rig = parried_rig();
    rig.hit(HitEvent::hazard(CollisionSide::Bottom, 1, HazardKind::Spikes));
    assert!(rig.hero.flags().hazard_death());
}

#[test]
fn test_charged_attack_becomes_thrust() {
    let mut rig = parried_rig();
    let tuning = rig.hero.tuning().clone();

    rig.input.axis = Vec2::new(1.0, 1.0);
    assert!(rig.step_until(60, |h| h
        .timers()
        .is_idle(TimerId::AttackCooldown)));

    rig.press_attack();
    rig.step();

    assert_eq!(
        rig.hero.current_slash(),
        Some(SlashKind::Thrust(ParryDirection::NorthEast))
    );
    assert!(rig.hero.flags().empowered);
    assert!(rig.hero.flags().invulnerable);
    assert!(!rig.hero.has_empowered_charge());
    assert!(!rig.body.gravity);
    let speed = tuning.empower_base_speed * tuning.empower_multiplier;
    assert!(approx(
        rig.body.velocity,
        ParryDirection::NorthEast.unit_vector() * speed
    ));
    assert!(rig.saw_milestone(Milestone::ThrustStarted));

    assert!(rig.step_until(30, |h| !h.flags().empowered));
    assert!(rig.hero.timers().is_idle(TimerId::EmpowerDuration));
    assert_eq!(rig.hero.timers().remaining(TimerId::EmpowerDuration), 0.0);
    assert!(rig.body.gravity);
    assert!(!rig.hero.flags().invulnerable);
    assert!(rig.saw_milestone(Milestone::ThrustEnded));
}

#[test]
fn test_bounce_lift_decays() {
    let mut rig = Rig::airborne();
    let tuning = rig.hero.tuning().clone();

    rig.hero.bounce();
    rig.step();

    let expected = tuning.bounce_speed * (1.0 - DT / tuning.bounce_time);
    assert!((rig.body.velocity.y - expected).abs() < 0.01);
    assert!(rig.saw_milestone(Milestone::Bounced));

    assert!(rig.step_until(30, |h| !h.flags().bouncing));
}

#[test]
fn test_parry_boost_strengthens_next_bounce() {
    let mut rig = parried_rig();
    let tuning = rig.hero.tuning().clone();

    rig.hero.bounce();
    rig.step();

    let expected = tuning.bounce_speed
        * tuning.parry_bounce_multiplier
        * (1.0 - DT / tuning.bounce_time);
    assert!((rig.body.velocity.y - expected).abs() < 0.01);
    assert!(!rig.hero.combat.bounce_boost);
}

// -----------------------------------------------------------------------------
// Damage and recoil
// -----------------------------------------------------------------------------

#[test]
fn test_zero_damage_is_ignored() {
    let mut rig = Rig::grounded();
    rig.press_attack();
    rig.step();
    rig.log.clear();

    rig.hit(HitEvent::contact(CollisionSide::Left, 0));
    assert_eq!(rig.hero.health(), rig.hero.max_health());
    assert!(!rig.hero.flags().recoiling);
    assert!(rig.hero.flags().attacking);
    assert!(rig.log.is_empty());
}

#[test]
fn test_two_damage_hit_on_full_health() {
    let mut rig = Rig::grounded();
    rig.hit(HitEvent::contact(CollisionSide::Left, 2));

    assert_eq!(rig.hero.health(), 3);
    assert!(rig.hero.flags().recoiling);
    assert!(!rig.hero.flags().on_ground);
}

#[test]
fn test_hit_freezes_then_knocks_back() {
    let mut rig = Rig::grounded();
    let tuning = rig.hero.tuning().clone();

    rig.hit(HitEvent::contact(CollisionSide::Left, 1));
    assert_eq!(rig.hero.health(), tuning.max_health - 1);
    assert_eq!(rig.hero.state(), CoarseState::NoInput);
    assert!(rig.hero.flags().recoil_frozen);
    assert!(rig.hero.flags().invulnerable);
    assert!(!rig.hero.flags().on_ground);
    assert!(rig.saw(&HeroSignal::Damaged {
        amount: 1,
        health: tuning.max_health - 1,
        hazard: HazardKind::None,
    }));
    assert!(rig.saw(&HeroSignal::HealthChanged(tuning.max_health - 1)));

    rig.step();
    assert_eq!(rig.body.velocity, Vec2::ZERO);
    assert!(!rig.body.gravity);

    assert!(rig.step_until(12, |h| !h.flags().recoil_frozen));
    assert_eq!(
        rig.body.velocity,
        Vec2::new(tuning.knockback_speed_x, tuning.knockback_speed_y)
    );
    assert!(!rig.hero.flags().on_ground);

    assert!(rig.step_until(20, |h| !h.flags().recoiling));
    assert_eq!(rig.hero.state(), CoarseState::Idle);
    assert!(rig.hero.flags().on_ground);
    assert!(rig.hero.flags().invulnerable);
}

#[test]
fn test_hit_from_above_knocks_back_flat() {
    let mut rig = Rig::grounded();
    let tuning = rig.hero.tuning().clone();

    rig.hit(HitEvent::contact(CollisionSide::Top, 1));
    assert!(rig.step_until(12, |h| !h.flags().recoil_frozen));
    assert_eq!(
        rig.body.velocity,
        Vec2::new(-tuning.knockback_speed_x, 0.0)
    );
}

#[test]
fn test_recoil_ends_airborne_without_ground() {
    let mut rig = Rig::grounded();
    rig.hit(HitEvent::contact(CollisionSide::Right, 1));
    rig.terrain.ground = false;

    assert!(rig.step_until(30, |h| !h.flags().recoiling));
    assert_eq!(rig.hero.state(), CoarseState::Airborne);
}

#[test]
fn test_invulnerability_blocks_contact_hits() {
    let mut rig = Rig::grounded();
    rig.hit(HitEvent::contact(CollisionSide::Left, 1));
    rig.hit(HitEvent::contact(CollisionSide::Left, 1));
    assert_eq!(rig.hero.health(), rig.hero.max_health() - 1);

    let mut rig = Rig::grounded();
    rig.hero.set_flag(HeroFlag::Invulnerable, true);
    assert!(rig.hero.flags().invulnerable);
    rig.hit(HitEvent::contact(CollisionSide::Left, 1));
    assert_eq!(rig.hero.health(), rig.hero.max_health());

    rig.hero.set_flag(HeroFlag::Invulnerable, false);
    rig.hit(HitEvent::contact(CollisionSide::Left, 1));
    assert_eq!(rig.hero.health(), rig.hero.max_health() - 1);
}

#[test]
fn test_damage_modes() {
    let mut rig = Rig::grounded();
    rig.hero.set_damage_mode(DamageMode::NoDamage);
    rig.hit(HitEvent::contact(CollisionSide::Left, 1));
    rig.hit(HitEvent::hazard(CollisionSide::Bottom, 1, HazardKind::Acid));
    assert_eq!(rig.hero.health(), rig.hero.max_health());
    assert!(!rig.hero.flags().any_death());

    let mut rig = Rig::grounded();
    rig.hero.set_damage_mode(DamageMode::HazardOnly);
    rig.hit(HitEvent::contact(CollisionSide::Left, 1));
    assert_eq!(rig.hero.health(), rig.hero.max_health());
    rig.hit(HitEvent::hazard(CollisionSide::Bottom, 1, HazardKind::Acid));
    assert_eq!(rig.hero.health(), rig.hero.max_health() - 1);
    assert!(rig.hero.flags().hazard_death());
}

#[test]
fn test_damage_modes_also_gate_parries() {
    for mode in [DamageMode::NoDamage, DamageMode::HazardOnly] {
        let mut rig = Rig::airborne();
        rig.body.velocity = Vec2::new(0.0, -100.0);
        rig.input.axis = Vec2::new(0.0, -1.0);
        rig.press_attack();
        rig.step();
        assert!(rig.hero.parry_invulnerability_active());

        rig.hero.set_damage_mode(mode);
        rig.hit(HitEvent::contact(CollisionSide::Bottom, 1));
        assert!(!rig.hero.has_empowered_charge(), "{:?}", mode);
        assert!(!rig.saw_milestone(Milestone::Parried), "{:?}", mode);
        assert_eq!(rig.hero.health(), rig.hero.max_health());
    }
}

#[test]
fn test_leaving_scene_closes_parry_window() {
    let mut rig = Rig::airborne();
    rig.body.velocity = Vec2::new(0.0, -100.0);
    rig.input.axis = Vec2::new(0.0, -1.0);
    rig.press_attack();
    rig.step();
    assert!(rig.hero.parry_invulnerability_active());

    rig.hero.leave_scene(SceneEdge::Right);
    assert!(!rig.hero.parry_invulnerability_active());
    assert!(!rig.hero.flags().invulnerable);
}

#[test]
fn test_lethal_hazard_overrides_invulnerability() {
    let mut rig = Rig::grounded();
    rig.hit(HitEvent::contact(CollisionSide::Left, 1));
    assert!(rig.hero.flags().invulnerable);

    rig.hit(HitEvent::hazard(CollisionSide::Bottom, 1, HazardKind::Spikes));
    assert!(rig.hero.flags().hazard_death());
    assert!(!rig.hero.flags().recoiling);
    assert_eq!(rig.hero.health(), rig.hero.max_health() - 2);
    assert!(rig.saw(&HeroSignal::HazardEffect(HazardKind::Spikes)));
    assert!(rig.saw(&HeroSignal::Presence(false)));
}

#[test]
fn test_global_invincibility_blocks_everything() {
    let mut rig = Rig::grounded();
    rig.hero.set_global_invincible(true);
    rig.hit(HitEvent::contact(CollisionSide::Left, 1));
    rig.hit(HitEvent::hazard(CollisionSide::Bottom, 1, HazardKind::Lava));

    assert_eq!(rig.hero.health(), rig.hero.max_health());
    assert!(!rig.hero.flags().any_death());
}

// -----------------------------------------------------------------------------
// Death and respawn
// -----------------------------------------------------------------------------

#[test]
fn test_death_runs_once_and_respawns_clean() {
    let mut rig = Rig::grounded();
    let spawn = Vec2::new(50.0, 10.0);
    rig.hero.set_respawn_point(spawn);
    rig.input.axis = Vec2::new(1.0, 0.0);

    let max = rig.hero.max_health();
    rig.hit(HitEvent::contact(CollisionSide::Right, max));
    assert!(rig.hero.flags().dead());
    assert_eq!(rig.hero.state(), CoarseState::NoInput);

    rig.hit(HitEvent::contact(CollisionSide::Right, 1));
    rig.hero.take_health(1);
    rig.hero.check_death();
    rig.log.extend(rig.hero.drain_signals());
    assert_eq!(rig.count(&HeroSignal::Died), 1);

    rig.step();
    assert_eq!(rig.body.velocity, Vec2::ZERO);

    rig.input.axis = Vec2::ZERO;
    assert!(rig.step_until(200, |h| h.respawn.is_none()));
    assert_eq!(rig.count(&HeroSignal::Died), 1);
    assert!(rig.saw_milestone(Milestone::Respawned));
    assert_eq!(rig.hero.health(), max);
    assert_eq!(rig.body.position, spawn);
    assert_eq!(*rig.hero.flags(), ConditionFlags::default());
    assert!(rig.hero.timers().all_zero());
    assert!(rig.hero.state().accepts_actions());
}

#[test]
fn test_hazard_death_returns_to_hazard_point() {
    let mut rig = Rig::grounded();
    let point = Vec2::new(-30.0, 5.0);
    rig.hero.set_hazard_respawn_point(point);

    rig.hit(HitEvent::hazard(CollisionSide::Bottom, 1, HazardKind::Spikes));
    assert!(rig.hero.flags().hazard_death());
    assert!(rig.hero.flags().invulnerable);

    assert!(rig.step_until(120, |h| h.flags().hazard_respawning));
    assert!(!rig.hero.flags().any_death());
    assert!(rig.saw(&HeroSignal::Presence(true)));

    // Still protected while reforming
    rig.hit(HitEvent::hazard(CollisionSide::Bottom, 1, HazardKind::Spikes));
    assert!(!rig.hero.flags().any_death());

    assert!(rig.step_until(120, |h| h.respawn.is_none()));
    assert_eq!(rig.body.position, point);
    assert_eq!(rig.hero.health(), rig.hero.max_health() - 1);
    assert!(!rig.hero.flags().hazard_respawning);
    assert!(!rig.hero.flags().invulnerable);
}

#[test]
fn test_last_health_on_hazard_is_a_full_death() {
    let mut rig = Rig::grounded();
    let max = rig.hero.max_health();
    rig.hero.take_health(max - 1);
    rig.hit(HitEvent::hazard(CollisionSide::Bottom, 1, HazardKind::Pit));

    assert!(rig.hero.flags().dead());
    assert_eq!(rig.count(&HeroSignal::Died), 1);
}

// -----------------------------------------------------------------------------
// Scene transitions
// -----------------------------------------------------------------------------

#[test]
fn test_leave_and_enter_scene() {
    let mut rig = Rig::grounded();
    let tuning = rig.hero.tuning().clone();

    rig.hero.leave_scene(SceneEdge::Right);
    assert!(rig.hero.flag(HeroFlag::Transitioning));
    assert_eq!(rig.hero.state(), CoarseState::NoInput);
    assert_eq!(rig.hero.damage_mode(), DamageMode::NoDamage);

    rig.step();
    assert_eq!(rig.body.velocity, Vec2::new(tuning.run_speed, 0.0));
    assert!(rig.saw_milestone(Milestone::LeftScene));

    rig.hit(HitEvent::contact(CollisionSide::Left, 1));
    assert_eq!(rig.hero.health(), rig.hero.max_health());

    let gate = EntryGate {
        edge: SceneEdge::Left,
        position: Vec2::new(-100.0, 0.0),
    };
    rig.hero.enter_scene(gate, 0.1);
    rig.step();
    assert_eq!(
        rig.body.position,
        Vec2::new(-100.0 + tuning.scene_entry_offset, 0.0)
    );
    assert_eq!(rig.body.velocity, Vec2::ZERO);
    assert!(!rig.body.gravity);

    assert!(rig.step_until(20, |h| matches!(
        h.transition,
        Some(SceneTransition::Entering {
            stage: EntryStage::Moving,
            ..
        })
    )));
    assert_eq!(rig.body.velocity, Vec2::new(tuning.run_speed, 0.0));

    assert!(rig.step_until(60, |h| h.transition.is_none()));
    assert!(!rig.hero.flag(HeroFlag::Transitioning));
    assert_eq!(rig.hero.damage_mode(), DamageMode::FullDamage);
    assert_eq!(rig.hero.state(), CoarseState::Idle);
    assert!(rig.hero.flags().on_ground);
    assert!(rig.saw_milestone(Milestone::EnteredScene));
}

#[test]
fn test_scene_calls_are_ignored_while_reforming() {
    let mut rig = Rig::grounded();
    rig.hit(HitEvent::hazard(CollisionSide::Bottom, 1, HazardKind::Spikes));
    assert!(rig.step_until(120, |h| h.flags().hazard_respawning));
    assert!(rig.hero.is_respawning());
    assert!(!rig.hero.flags().any_death());

    rig.hero.leave_scene(SceneEdge::Right);
    let gate = EntryGate {
        edge: SceneEdge::Left,
        position: Vec2::new(-100.0, 0.0),
    };
    rig.hero.enter_scene(gate, 0.0);
    assert!(rig.hero.transition.is_none());
    assert!(!rig.hero.flag(HeroFlag::Transitioning));

    assert!(rig.step_until(120, |h| !h.is_respawning()));
    assert!(rig.hero.state().accepts_actions());
    assert_eq!(rig.hero.damage_mode(), DamageMode::FullDamage);
}

#[test]
fn test_death_while_leaving_clears_the_transition() {
    let mut rig = Rig::grounded();
    rig.hero.leave_scene(SceneEdge::Right);
    rig.step();

    let max = rig.hero.max_health();
    rig.hero.take_health(max);
    assert!(rig.hero.flags().dead());

    assert!(rig.step_until(300, |h| !h.is_respawning()));
    assert!(rig.hero.transition.is_none());
    assert!(!rig.hero.flag(HeroFlag::Transitioning));
    assert_eq!(rig.hero.state(), CoarseState::Idle);

    rig.step();
    assert_eq!(rig.body.velocity.x, 0.0);
}

// -----------------------------------------------------------------------------
// Control and flags
// -----------------------------------------------------------------------------

#[test]
fn test_relinquish_and_regain_control() {
    let mut rig = Rig::grounded();
    rig.input.axis = Vec2::new(1.0, 0.0);
    rig.step();
    assert_eq!(rig.hero.state(), CoarseState::Running);

    rig.hero.set_flag(HeroFlag::ControlRelinquished, true);
    assert_eq!(rig.hero.state(), CoarseState::NoInput);
    rig.step();
    assert_eq!(rig.body.velocity, Vec2::ZERO);

    rig.press_jump();
    rig.step();
    assert!(!rig.hero.flags().jumping);

    rig.hero.regain_control();
    assert!(!rig.hero.flag(HeroFlag::ControlRelinquished));
    assert_eq!(rig.hero.state(), CoarseState::Running);
}

#[test]
fn test_regain_during_recoil_waits_for_recoil() {
    let mut rig = Rig::grounded();
    rig.hero.relinquish_control();
    rig.hit(HitEvent::contact(CollisionSide::Left, 1));
    assert!(rig.hero.flags().recoiling);

    rig.hero.regain_control();
    assert_eq!(rig.hero.state(), CoarseState::NoInput);

    assert!(rig.step_until(30, |h| !h.flags().recoiling));
    assert!(rig.hero.state().accepts_actions());
}

#[test]
fn test_flags_by_name() {
    let mut rig = Rig::grounded();

    assert_eq!(rig.hero.flag_by_name("on_ground"), Ok(true));
    assert_eq!(rig.hero.flag_by_name("jumping"), Ok(false));
    assert_eq!(
        rig.hero.flag_by_name("flying"),
        Err(UnknownFlag("flying".to_string()))
    );
    assert!(rig.hero.set_flag_by_name("flying", true).is_err());

    for flag in HeroFlag::ALL {
        assert_eq!(flag.name().parse::<HeroFlag>(), Ok(flag));
    }
}

#[test]
fn test_walk_zone_slows_movement() {
    let mut rig = Rig::grounded();
    rig.hero.set_flag_by_name("in_walk_zone", true).unwrap();
    rig.input.axis = Vec2::new(1.0, 0.0);
    rig.step();

    assert_eq!(rig.body.velocity.x, rig.hero.tuning().walk_speed);
}

#[test]
fn test_clearing_recoil_flag_ends_recoil_cleanly() {
    let mut rig = Rig::grounded();
    rig.hit(HitEvent::contact(CollisionSide::Left, 1));
    assert!(rig.hero.flags().recoil_frozen);

    rig.hero.set_flag(HeroFlag::Recoiling, false);
    assert!(!rig.hero.flags().recoiling);
    assert!(!rig.hero.flags().recoil_frozen);
    assert!(rig.hero.knockback.is_none());
    assert!(rig.hero.flags().validate().is_ok());
    assert!(rig.hero.timers().is_idle(TimerId::FreezeFrame));
    assert_eq!(rig.hero.state(), CoarseState::Idle);

    rig.press_jump();
    rig.step();
    assert!(rig.hero.flags().jumping);
    assert!(rig.body.gravity);
}

#[test]
fn test_setting_dead_flag_runs_the_death_sequence() {
    let mut rig = Rig::grounded();
    rig.hero.set_flag(HeroFlag::Dead, true);

    assert!(rig.hero.flags().dead());
    assert_eq!(rig.hero.health(), 0);
    assert!(rig.hero.is_respawning());

    assert!(rig.step_until(300, |h| !h.is_respawning()));
    assert_eq!(rig.count(&HeroSignal::Died), 1);
    assert_eq!(rig.hero.health(), rig.hero.max_health());
    assert!(rig.hero.state().accepts_actions());
}

#[test]
fn test_flag_writes_go_through_their_operations() {
    let mut rig = Rig::grounded();

    rig.hero.set_flag(HeroFlag::Dashing, true);
    assert!(rig.hero.flags().dashing());
    assert!(rig.hero.timers().is_active(TimerId::DashDuration));
    rig.hero.set_flag(HeroFlag::Dashing, false);
    assert!(rig.hero.flags().dash.is_none());
    assert!(rig.hero.timers().is_idle(TimerId::DashDuration));

    rig.hero.set_flag(HeroFlag::BackDashing, true);
    assert!(rig.hero.flags().back_dashing());
    rig.hero.set_flag(HeroFlag::Dashing, false);
    assert!(rig.hero.flags().back_dashing());
    rig.hero.set_flag(HeroFlag::BackDashing, false);
    assert!(rig.hero.flags().dash.is_none());

    rig.hero.set_flag(HeroFlag::RecoilingLeft, true);
    assert!(rig.hero.flags().recoiling_left());
    rig.hero.set_flag(HeroFlag::RecoilingRight, false);
    assert!(rig.hero.flags().recoiling_left());
    rig.hero.set_flag(HeroFlag::RecoilingLeft, false);
    assert!(rig.hero.flags().recoil.is_none());
    assert!(rig.hero.timers().is_idle(TimerId::HorizontalRecoil));

    // Guards still apply: no dash while recoiling from a hit
    let mut rig = Rig::grounded();
    rig.hit(HitEvent::contact(CollisionSide::Left, 1));
    rig.hero.set_flag(HeroFlag::Dashing, true);
    assert!(rig.hero.flags().dash.is_none());
}

#[test]
fn test_derived_flags_are_read_only() {
    let mut rig = Rig::grounded();

    rig.hero.set_flag(HeroFlag::OnGround, false);
    rig.hero.set_flag(HeroFlag::HazardDeath, true);
    rig.hero.set_flag(HeroFlag::RecoilFrozen, true);
    rig.hero.set_flag(HeroFlag::Transitioning, true);

    assert!(rig.hero.flags().on_ground);
    assert!(!rig.hero.flags().any_death());
    assert!(!rig.hero.flags().recoil_frozen);
    assert!(!rig.hero.flag(HeroFlag::Transitioning));
    assert!(rig.hero.flags().validate().is_ok());
    assert!(rig.hero.set_flag_by_name("on_ground", false).is_ok());
    assert!(rig.hero.flags().on_ground);
}

// -----------------------------------------------------------------------------
// Hurtbox, layers and pause
// -----------------------------------------------------------------------------

#[test]
fn test_hurtbox_holds_first_contact_and_passes_hazards() {
    let mut hurtbox = HeroHurtbox::default();
    let first = HitEvent::contact(CollisionSide::Left, 1);
    let spikes = HitEvent::hazard(CollisionSide::Bottom, 1, HazardKind::Spikes);

    assert_eq!(hurtbox.receive(first), None);
    assert_eq!(hurtbox.receive(HitEvent::contact(CollisionSide::Right, 2)), None);
    assert_eq!(hurtbox.receive(spikes), Some(spikes));

    assert_eq!(hurtbox.take_buffered(), Some(first));
    assert_eq!(hurtbox.take_buffered(), None);
}

#[test]
fn test_inactive_hurtbox_drops_hits() {
    let mut hurtbox = HeroHurtbox::default();
    hurtbox.receive(HitEvent::contact(CollisionSide::Left, 1));
    hurtbox.inactive = true;
    assert_eq!(hurtbox.take_buffered(), None);

    let spikes = HitEvent::hazard(CollisionSide::Bottom, 1, HazardKind::Spikes);
    assert_eq!(hurtbox.receive(spikes), None);
    assert!(hurtbox.buffered.is_none());
}

#[test]
fn test_contact_side_follows_damager_position() {
    let damage = DamageHero {
        amount: 2,
        hazard: HazardKind::None,
    };

    let hit = damage.hit_from(Entity::PLACEHOLDER, 0.0, 30.0);
    assert_eq!(hit.side, CollisionSide::Right);
    assert_eq!(hit.source, Some(Entity::PLACEHOLDER));
    assert_eq!(hit.amount, 2);
    assert_eq!(
        damage.hit_from(Entity::PLACEHOLDER, 0.0, -30.0).side,
        CollisionSide::Left
    );
}

#[test]
fn test_only_soft_terrain_answers_strikes() {
    let soft = GameLayer::SoftTerrain.to_bits();

    let soft_wall = terrain_layers(GameLayer::Wall, true);
    assert_ne!(soft_wall.memberships.0 & soft, 0);
    assert_ne!(soft_wall.memberships.0 & GameLayer::Wall.to_bits(), 0);

    let ground = terrain_layers(GameLayer::Ground, false);
    assert_eq!(ground.memberships.0 & soft, 0);
    assert_ne!(ground.memberships.0 & GameLayer::Ground.to_bits(), 0);

    assert_eq!(
        soft_terrain_filter().mask,
        LayerMask::from(GameLayer::SoftTerrain)
    );
}

#[test]
fn test_pause_is_mirrored_into_flags() {
    let mut app = App::new();
    app.init_resource::<GameplayPaused>()
        .add_systems(Update, sync_pause_flag);
    let hero = app.world_mut().spawn((Player, controller())).id();

    let paused = |app: &App| {
        app.world()
            .get::<HeroController>(hero)
            .is_some_and(|controller| controller.flag(HeroFlag::IsPaused))
    };

    app.world_mut()
        .resource_mut::<GameplayPaused>()
        .pause("menu");
    app.update();
    assert!(paused(&app));

    app.world_mut()
        .resource_mut::<GameplayPaused>()
        .unpause("menu");
    app.update();
    assert!(!paused(&app));
}
