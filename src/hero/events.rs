//! Hero domain: outgoing signals and the messages they become.

use bevy::ecs::message::Message;
use bevy::prelude::*;

use crate::hero::combat::{AttackDirection, SlashKind};
use crate::hero::damage::HazardKind;
use crate::hero::body::Facing;

/// Controller milestones for loosely coupled listeners (enemy AI, HUD, audio).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Milestone {
    LeftGround,
    Landed,
    Jumped,
    WallJumped,
    WallSlideStarted,
    Dashed,
    DashEnded,
    Attacked,
    Parried,
    ThrustStarted,
    ThrustEnded,
    Bounced,
    Damaged,
    Died,
    HazardDied,
    Respawned,
    LeftScene,
    EnteredScene,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeroClip {
    Idle,
    Run,
    Airborne,
    HardLand,
    DashLand,
    Dash,
    BackDash,
    WallSlide,
    Slash,
    AltSlash,
    UpSlash,
    DownSlash,
    WallSlash,
    Thrust,
    Recoil,
    Death,
    HazardDeath,
    Respawn,
    ParryFlash,
}

impl HeroClip {
    pub fn name(self) -> &'static str {
        match self {
            HeroClip::Idle => "Idle",
            HeroClip::Run => "Run",
            HeroClip::Airborne => "Airborne",
            HeroClip::HardLand => "HardLand",
            HeroClip::DashLand => "DashLand",
            HeroClip::Dash => "Dash",
            HeroClip::BackDash => "BackDash",
            HeroClip::WallSlide => "WallSlide",
            HeroClip::Slash => "Slash",
            HeroClip::AltSlash => "AltSlash",
            HeroClip::UpSlash => "UpSlash",
            HeroClip::DownSlash => "DownSlash",
            HeroClip::WallSlash => "WallSlash",
            HeroClip::Thrust => "Thrust",
            HeroClip::Recoil => "Recoil",
            HeroClip::Death => "Death",
            HeroClip::HazardDeath => "HazardDeath",
            HeroClip::Respawn => "Respawn",
            HeroClip::ParryFlash => "ParryFlash",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipAction {
    Play,
    Stop,
}

/// Everything the controller wants the outside world to do or know, queued
/// during a tick and drained by the dispatch system.
#[derive(Debug, Clone, PartialEq)]
pub enum HeroSignal {
    Milestone(Milestone),
    Clip(ClipAction, HeroClip),
    Damaged {
        amount: u32,
        health: u32,
        hazard: HazardKind,
    },
    Died,
    Slash {
        kind: SlashKind,
        direction: AttackDirection,
        facing: Facing,
    },
    TerrainThunk {
        at: Vec2,
    },
    HazardEffect(HazardKind),
    /// Show or hide the body and toggle its collision.
    Presence(bool),
    LandingDust,
    HealthChanged(u32),
}

// ----------------------------------------------------------------------------
// Messages
// ----------------------------------------------------------------------------

#[derive(Debug)]
pub struct HeroDamagedEvent {
    pub amount: u32,
    pub health: u32,
    pub hazard: HazardKind,
}

impl Message for HeroDamagedEvent {}

#[derive(Debug)]
pub struct HeroDeathEvent {
    pub entity: Entity,
}

impl Message for HeroDeathEvent {}

#[derive(Debug)]
pub struct HeroMilestoneEvent {
    pub entity: Entity,
    pub milestone: Milestone,
}

impl Message for HeroMilestoneEvent {}

/// Request to the animation/audio collaborator.
#[derive(Debug)]
pub struct ClipRequest {
    pub action: ClipAction,
    pub clip: HeroClip,
}

impl Message for ClipRequest {}

/// Request to activate a named slash resource in front of the hero.
#[derive(Debug)]
pub struct SlashRequest {
    pub owner: Entity,
    pub kind: SlashKind,
    pub direction: AttackDirection,
    pub facing: Facing,
}

impl Message for SlashRequest {}

#[derive(Debug)]
pub struct HealthChangedEvent {
    pub health: u32,
}

impl Message for HealthChangedEvent {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectKind {
    LandingDust,
    TerrainThunk,
    Hazard(HazardKind),
}

/// Request to play a short visual effect at a world position.
#[derive(Debug)]
pub struct HeroEffectRequest {
    pub kind: EffectKind,
    pub at: Vec2,
}

impl Message for HeroEffectRequest {}
