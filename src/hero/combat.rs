//! Hero domain: slash selection, attack lifecycle, terrain thunk, parry and
//! the empowered thrust.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::f32::consts::FRAC_1_SQRT_2;

use crate::hero::controller::HeroController;
use crate::hero::events::{HeroClip, HeroSignal, Milestone};
use crate::hero::flags::RecoilSide;
use crate::hero::body::{Facing, TerrainSensor};
use crate::hero::timers::TimerId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttackDirection {
    Normal,
    Upward,
    Downward,
}

impl AttackDirection {
    /// Offset of the strike from the hero's center at the given reach.
    pub fn reach(self, facing: Facing, reach: f32) -> Vec2 {
        match self {
            AttackDirection::Normal => Vec2::new(facing.sign() * reach, 0.0),
            AttackDirection::Upward => Vec2::new(0.0, reach),
            AttackDirection::Downward => Vec2::new(0.0, -reach),
        }
    }
}

/// Eight-way direction of an empowered thrust.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParryDirection {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl ParryDirection {
    pub const ALL: [ParryDirection; 8] = [
        ParryDirection::North,
        ParryDirection::NorthEast,
        ParryDirection::East,
        ParryDirection::SouthEast,
        ParryDirection::South,
        ParryDirection::SouthWest,
        ParryDirection::West,
        ParryDirection::NorthWest,
    ];

    /// Direction from snapped move input; neutral input thrusts the way the
    /// hero faces.
    pub fn from_axis(axis: Vec2, facing: Facing) -> Self {
        let x = axis.x.signum() as i32 * (axis.x.abs() > 0.5) as i32;
        let y = axis.y.signum() as i32 * (axis.y.abs() > 0.5) as i32;
        match (x, y) {
            (1, 1) => ParryDirection::NorthEast,
            (1, 0) => ParryDirection::East,
            (1, -1) => ParryDirection::SouthEast,
            (0, 1) => ParryDirection::North,
            (0, -1) => ParryDirection::South,
            (-1, 1) => ParryDirection::NorthWest,
            (-1, 0) => ParryDirection::West,
            (-1, -1) => ParryDirection::SouthWest,
            _ => match facing {
                Facing::Right => ParryDirection::East,
                Facing::Left => ParryDirection::West,
            },
        }
    }

    pub fn unit_vector(self) -> Vec2 {
        let d = FRAC_1_SQRT_2;
        match self {
            ParryDirection::North => Vec2::new(0.0, 1.0),
            ParryDirection::NorthEast => Vec2::new(d, d),
            ParryDirection::East => Vec2::new(1.0, 0.0),
            ParryDirection::SouthEast => Vec2::new(d, -d),
            ParryDirection::South => Vec2::new(0.0, -1.0),
            ParryDirection::SouthWest => Vec2::new(-d, -d),
            ParryDirection::West => Vec2::new(-1.0, 0.0),
            ParryDirection::NorthWest => Vec2::new(-d, d),
        }
    }
}

/// Named slash resources. Each one must be configured in the slash library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlashKind {
    Slash,
    AltSlash,
    UpSlash,
    DownSlash,
    WallSlash,
    Thrust(ParryDirection),
}

impl SlashKind {
    pub fn clip(self) -> HeroClip {
        match self {
            SlashKind::Slash => HeroClip::Slash,
            SlashKind::AltSlash => HeroClip::AltSlash,
            SlashKind::UpSlash => HeroClip::UpSlash,
            SlashKind::DownSlash => HeroClip::DownSlash,
            SlashKind::WallSlash => HeroClip::WallSlash,
            SlashKind::Thrust(_) => HeroClip::Thrust,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackTrigger {
    /// The attack button.
    Primary,
    /// Jump pressed with down held while airborne.
    AirDownslash,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackOutcome {
    Started,
    /// Guard failed; the press may be queued.
    Blocked,
    /// The slash resource is not configured.
    Unavailable,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlashContext {
    pub trigger: AttackTrigger,
    pub vertical: f32,
    pub airborne: bool,
    pub wall_sliding: bool,
    pub alt_next: bool,
}

/// Slash and direction for an attack activation.
pub fn select_slash(ctx: SlashContext) -> (SlashKind, AttackDirection) {
    if ctx.trigger == AttackTrigger::AirDownslash {
        return (SlashKind::DownSlash, AttackDirection::Downward);
    }
    if ctx.wall_sliding {
        return (SlashKind::WallSlash, AttackDirection::Normal);
    }
    if ctx.vertical > 0.0 {
        (SlashKind::UpSlash, AttackDirection::Upward)
    } else if ctx.vertical < 0.0 && ctx.airborne {
        (SlashKind::DownSlash, AttackDirection::Downward)
    } else if ctx.alt_next {
        (SlashKind::AltSlash, AttackDirection::Normal)
    } else {
        (SlashKind::Slash, AttackDirection::Normal)
    }
}

/// Resumable check for a horizontal strike meeting soft terrain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThunkCheck {
    pub reach: Vec2,
    pub facing: Facing,
}

#[derive(Debug, Clone, Default)]
pub struct CombatState {
    pub direction: Option<AttackDirection>,
    pub slash: Option<SlashKind>,
    pub alt_next: bool,
    pub thunk: Option<ThunkCheck>,
    pub empowered_charge: bool,
    pub bounce_boost: bool,
    pub thrust: Option<Vec2>,
}

impl HeroController {
    pub fn can_attack(&self) -> bool {
        self.state.current().accepts_actions()
            && self.timers.is_idle(TimerId::AttackCooldown)
            && !self.flags.attacking
            && self.flags.dash.is_none()
            && !self.flags.recoiling
            && !self.flags.any_death()
            && !self.flags.control_relinquished
            && !self.flags.transitioning
    }

    pub fn has_empowered_charge(&self) -> bool {
        self.combat.empowered_charge
    }

    pub fn parry_invulnerability_active(&self) -> bool {
        self.timers.is_active(TimerId::ParryWindow)
    }

    pub fn current_slash(&self) -> Option<SlashKind> {
        self.combat.slash
    }

    pub(crate) fn process_attack(&mut self) {
        if self.input.attack.pressed {
            if self.try_attack(AttackTrigger::Primary) == AttackOutcome::Blocked {
                self.queues.attack.arm();
            }
        } else if self.queues.attack.advance(self.tuning.attack_queue_steps)
            && self.try_attack(AttackTrigger::Primary) != AttackOutcome::Blocked
        {
            self.queues.attack.clear();
        }
    }

    pub(crate) fn try_attack(&mut self, trigger: AttackTrigger) -> AttackOutcome {
        if !self.can_attack() {
            return AttackOutcome::Blocked;
        }

        let (mut kind, direction) = select_slash(SlashContext {
            trigger,
            vertical: self.input.vertical,
            airborne: !self.flags.on_ground,
            wall_sliding: self.flags.wall_sliding,
            alt_next: self.combat.alt_next,
        });
        let thrust = (trigger == AttackTrigger::Primary && self.combat.empowered_charge)
            .then(|| ParryDirection::from_axis(self.input.axis(), self.facing));
        if let Some(dir) = thrust {
            kind = SlashKind::Thrust(dir);
        }

        if !self.slash_catalog.contains(&kind) {
            warn!("Slash resource {:?} is not configured, attack skipped", kind);
            return AttackOutcome::Unavailable;
        }

        self.flags.attacking = true;
        self.flags.up_attacking = direction == AttackDirection::Upward;
        self.flags.down_attacking = direction == AttackDirection::Downward;
        self.flags.alt_attack = kind == SlashKind::AltSlash;
        if matches!(kind, SlashKind::Slash | SlashKind::AltSlash) {
            self.combat.alt_next = !self.combat.alt_next;
        }
        self.combat.direction = Some(direction);
        self.combat.slash = Some(kind);
        self.timers
            .arm(TimerId::AttackDuration, self.tuning.attack_duration);
        self.timers
            .arm(TimerId::AttackCooldown, self.tuning.attack_cooldown);
        self.queues.attack.clear();

        self.emit(HeroSignal::Slash {
            kind,
            direction,
            facing: self.facing,
        });
        self.play(kind.clip());
        self.milestone(Milestone::Attacked);

        if let Some(dir) = thrust {
            self.combat.empowered_charge = false;
            self.start_thrust(dir);
        } else {
            if direction == AttackDirection::Downward {
                self.open_parry_window();
            }
            if direction == AttackDirection::Normal {
                self.combat.thunk = Some(ThunkCheck {
                    reach: direction.reach(self.facing, self.tuning.slash_reach),
                    facing: self.facing,
                });
                self.timers.arm(TimerId::TerrainThunk, self.tuning.thunk_window);
            }
        }
        AttackOutcome::Started
    }

    pub(crate) fn end_attack(&mut self) {
        self.flags.attacking = false;
        self.flags.up_attacking = false;
        self.flags.down_attacking = false;
        self.flags.alt_attack = false;
        self.combat.direction = None;
        self.combat.slash = None;
        self.combat.thunk = None;
        self.timers.cancel(TimerId::TerrainThunk);
    }

    pub(crate) fn cancel_attack(&mut self) {
        if let Some(kind) = self.combat.slash {
            self.stop(kind.clip());
        }
        self.timers.cancel(TimerId::AttackDuration);
        self.end_attack();
    }

    pub(crate) fn step_terrain_thunk(&mut self, terrain: &impl TerrainSensor) {
        let Some(check) = self.combat.thunk else {
            return;
        };
        if !self.flags.attacking || self.timers.is_idle(TimerId::TerrainThunk) {
            self.combat.thunk = None;
            return;
        }
        if !terrain.strike_hits_soft_terrain(check.reach) {
            return;
        }
        self.combat.thunk = None;
        self.timers.cancel(TimerId::TerrainThunk);
        debug!("Strike met terrain at reach {:?}", check.reach);
        self.recoil(RecoilSide::away_from(check.facing), false);
        self.emit(HeroSignal::TerrainThunk {
            at: self.last_position + check.reach,
        });
    }

    fn open_parry_window(&mut self) {
        if self.timers.is_active(TimerId::ParryCooldown) {
            return;
        }
        self.timers.arm(TimerId::ParryWindow, self.tuning.parry_window);
        self.timers.arm(TimerId::ParryCooldown, self.tuning.parry_cooldown);
        self.refresh_invulnerability();
        debug!("Parry window opened");
    }

    /// A qualifying hit landed inside the parry window.
    pub(crate) fn parry_success(&mut self) {
        self.timers.arm(
            TimerId::ParrySuccess,
            self.tuning.parry_success_invulnerability,
        );
        self.combat.bounce_boost = true;
        if !self.combat.empowered_charge {
            self.combat.empowered_charge = true;
            info!("Parry landed, empowered charge stored");
        }
        self.refresh_invulnerability();
        self.milestone(Milestone::Parried);
        self.play(HeroClip::ParryFlash);
    }

    fn start_thrust(&mut self, dir: ParryDirection) {
        self.finish_dash();
        self.cancel_jump();
        self.cancel_bounce();
        self.cancel_wall_slide();
        self.cancel_horizontal_recoil();

        let speed = self.tuning.empower_base_speed * self.tuning.empower_multiplier;
        self.combat.thrust = Some(dir.unit_vector() * speed);
        self.flags.empowered = true;
        self.timers
            .arm(TimerId::EmpowerDuration, self.tuning.empower_duration);
        self.refresh_invulnerability();
        self.milestone(Milestone::ThrustStarted);
    }

    pub(crate) fn end_thrust(&mut self) {
        if !self.flags.empowered && self.combat.thrust.is_none() {
            return;
        }
        self.flags.empowered = false;
        self.combat.thrust = None;
        self.timers.cancel(TimerId::EmpowerDuration);
        self.refresh_invulnerability();
        self.milestone(Milestone::ThrustEnded);
    }
}
