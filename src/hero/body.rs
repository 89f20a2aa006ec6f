//! Hero domain: collaborator seams for the physics body and terrain sensing.
//!
//! The controller never talks to the physics engine directly. Systems wrap the
//! avian components in these traits once per tick, and tests substitute
//! scripted doubles.

use bevy::prelude::*;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Facing {
    #[default]
    Right,
    Left,
}

impl Facing {
    pub fn sign(self) -> f32 {
        match self {
            Facing::Right => 1.0,
            Facing::Left => -1.0,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Facing::Right => Facing::Left,
            Facing::Left => Facing::Right,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WallSide {
    Left,
    Right,
}

impl WallSide {
    /// Facing that looks away from this wall.
    pub fn facing_away(self) -> Facing {
        match self {
            WallSide::Left => Facing::Right,
            WallSide::Right => Facing::Left,
        }
    }

    /// Horizontal input sign that pushes into this wall.
    pub fn sign(self) -> f32 {
        match self {
            WallSide::Left => -1.0,
            WallSide::Right => 1.0,
        }
    }
}

/// Physics body owned by the controller.
pub trait HeroBody {
    fn velocity(&self) -> Vec2;
    fn set_velocity(&mut self, velocity: Vec2);
    fn gravity_enabled(&self) -> bool;
    fn set_gravity_enabled(&mut self, enabled: bool);
    fn position(&self) -> Vec2;
    fn teleport(&mut self, position: Vec2);
}

/// Touch checks against the terrain layers.
pub trait TerrainSensor {
    fn touching_ground(&self) -> bool;
    fn touching_wall(&self, side: WallSide) -> bool;
    /// Whether a strike reaching `reach` from the hero's center overlaps
    /// soft terrain.
    fn strike_hits_soft_terrain(&self, reach: Vec2) -> bool;

    fn wall_contact(&self) -> Option<WallSide> {
        match (
            self.touching_wall(WallSide::Left),
            self.touching_wall(WallSide::Right),
        ) {
            (true, false) => Some(WallSide::Left),
            (false, true) => Some(WallSide::Right),
            _ => None,
        }
    }
}
