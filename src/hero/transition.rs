//! Hero domain: leaving and entering scenes through edge gates.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::hero::controller::HeroController;
use crate::hero::damage::DamageMode;
use crate::hero::events::{HeroSignal, Milestone};
use crate::hero::body::TerrainSensor;
use crate::hero::state::{CoarseState, StateRequest};
use crate::hero::tuning::HeroTuning;

/// Room edge a gate sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SceneEdge {
    Left,
    Right,
    Top,
    Bottom,
}

impl SceneEdge {
    /// Scripted velocity while walking out through this edge.
    pub fn exit_velocity(self, tuning: &HeroTuning) -> Vec2 {
        match self {
            SceneEdge::Left => Vec2::new(-tuning.run_speed, 0.0),
            SceneEdge::Right => Vec2::new(tuning.run_speed, 0.0),
            SceneEdge::Top => Vec2::new(0.0, tuning.jump_speed),
            SceneEdge::Bottom => Vec2::new(0.0, -tuning.max_fall_speed),
        }
    }

    /// Scripted velocity while coming in through a gate on this edge.
    pub fn entry_velocity(self, tuning: &HeroTuning) -> Vec2 {
        match self {
            SceneEdge::Left => Vec2::new(tuning.run_speed, 0.0),
            SceneEdge::Right => Vec2::new(-tuning.run_speed, 0.0),
            SceneEdge::Top => Vec2::new(0.0, -tuning.run_speed),
            SceneEdge::Bottom => Vec2::new(0.0, tuning.scene_enter_jump_speed),
        }
    }

    /// Unit vector pointing into the room from this edge.
    pub fn inward(self) -> Vec2 {
        match self {
            SceneEdge::Left => Vec2::X,
            SceneEdge::Right => Vec2::NEG_X,
            SceneEdge::Top => Vec2::NEG_Y,
            SceneEdge::Bottom => Vec2::Y,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntryGate {
    pub edge: SceneEdge,
    pub position: Vec2,
}

impl EntryGate {
    pub fn spawn_position(&self, offset: f32) -> Vec2 {
        self.position + self.edge.inward() * offset
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryStage {
    /// Parked at the gate until the room is ready.
    Waiting,
    Moving,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SceneTransition {
    Leaving {
        edge: SceneEdge,
    },
    Entering {
        gate: EntryGate,
        stage: EntryStage,
        delay: f32,
        elapsed: f32,
    },
}

impl SceneTransition {
    pub fn velocity(&self, tuning: &HeroTuning) -> Vec2 {
        match *self {
            SceneTransition::Leaving { edge } => edge.exit_velocity(tuning),
            SceneTransition::Entering {
                stage: EntryStage::Waiting,
                ..
            } => Vec2::ZERO,
            SceneTransition::Entering {
                gate,
                stage: EntryStage::Moving,
                ..
            } => gate.edge.entry_velocity(tuning),
        }
    }

    pub fn suspends_gravity(&self) -> bool {
        matches!(self, SceneTransition::Entering { .. })
    }
}

impl HeroController {
    pub fn leave_scene(&mut self, edge: SceneEdge) {
        if self.flags.any_death()
            || self.respawn.is_some()
            || matches!(self.transition, Some(SceneTransition::Leaving { .. }))
        {
            return;
        }
        self.cancel_all_actions();
        self.flags.transitioning = true;
        self.damage_mode = DamageMode::NoDamage;
        self.set_state(CoarseState::NoInput);
        self.transition = Some(SceneTransition::Leaving { edge });
        info!("Hero leaving scene through {:?} edge", edge);
        self.milestone(Milestone::LeftScene);
    }

    /// Place the hero at `gate` and walk it in once `delay` has passed.
    pub fn enter_scene(&mut self, gate: EntryGate, delay: f32) {
        if self.flags.any_death() || self.respawn.is_some() {
            return;
        }
        self.cancel_all_actions();
        self.flags.transitioning = true;
        self.flags.on_ground = false;
        self.damage_mode = DamageMode::NoDamage;
        self.set_state(CoarseState::NoInput);
        self.pending_teleport = Some(gate.spawn_position(self.tuning.scene_entry_offset));
        self.transition = Some(SceneTransition::Entering {
            gate,
            stage: EntryStage::Waiting,
            delay: delay.max(0.0),
            elapsed: 0.0,
        });
        debug!("Hero entering scene at {:?}", gate);
    }

    pub(crate) fn step_transition(&mut self, dt: f32, terrain: &impl TerrainSensor) {
        let Some(SceneTransition::Entering {
            gate,
            stage,
            delay,
            elapsed,
        }) = self.transition
        else {
            return;
        };
        let elapsed = elapsed + dt;

        match stage {
            EntryStage::Waiting if elapsed >= delay => {
                self.transition = Some(SceneTransition::Entering {
                    gate,
                    stage: EntryStage::Moving,
                    delay,
                    elapsed: 0.0,
                });
            }
            EntryStage::Moving if elapsed >= self.tuning.scene_enter_time => {
                self.finish_scene_entry(terrain);
            }
            _ => {
                self.transition = Some(SceneTransition::Entering {
                    gate,
                    stage,
                    delay,
                    elapsed,
                });
            }
        }
    }

    fn finish_scene_entry(&mut self, terrain: &impl TerrainSensor) {
        self.transition = None;
        self.flags.transitioning = false;
        self.damage_mode = DamageMode::FullDamage;

        let grounded = terrain.touching_ground();
        self.last_grounded = grounded;
        if grounded {
            self.flags.on_ground = true;
            self.emit(HeroSignal::LandingDust);
        }
        if !self.flags.control_relinquished {
            self.set_state(if grounded {
                StateRequest::Grounded
            } else {
                CoarseState::Airborne.into()
            });
        }
        info!("Hero entered scene (grounded={})", grounded);
        self.milestone(Milestone::EnteredScene);
    }
}
