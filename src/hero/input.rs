//! Hero domain: input signal, filtering and short press queues.

use bevy::prelude::*;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ButtonState {
    pub pressed: bool,
    pub held: bool,
    pub released: bool,
}

impl ButtonState {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn just_pressed() -> Self {
        Self {
            pressed: true,
            held: true,
            released: false,
        }
    }

    pub fn holding() -> Self {
        Self {
            pressed: false,
            held: true,
            released: false,
        }
    }

    pub fn just_released() -> Self {
        Self {
            pressed: false,
            held: false,
            released: true,
        }
    }

    /// Fold one frame of device state in. Edges stick until consumed by a
    /// fixed step, so a press between steps is never lost.
    pub fn accumulate(&mut self, just_pressed: bool, held: bool, just_released: bool) {
        self.pressed |= just_pressed;
        self.released |= just_released;
        self.held = held;
    }

    pub fn consume_edges(&mut self) {
        self.pressed = false;
        self.released = false;
    }
}

/// Raw signal from the input source for one tick.
#[derive(Resource, Debug, Clone, Default)]
pub struct HeroInput {
    pub axis: Vec2,
    pub jump: ButtonState,
    pub dash: ButtonState,
    pub attack: ButtonState,
}

impl HeroInput {
    pub fn consume_edges(&mut self) {
        self.jump.consume_edges();
        self.dash.consume_edges();
        self.attack.consume_edges();
    }
}

/// Input after deadzone snapping. Neutral whenever input is not accepted.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FilteredInput {
    pub move_x: f32,
    pub vertical: f32,
    pub jump: ButtonState,
    pub dash: ButtonState,
    pub attack: ButtonState,
}

impl FilteredInput {
    pub fn from_signal(input: &HeroInput, deadzone: f32) -> Self {
        Self {
            move_x: snap_axis(input.axis.x, deadzone),
            vertical: snap_axis(input.axis.y, deadzone),
            jump: input.jump,
            dash: input.dash,
            attack: input.attack,
        }
    }

    pub fn axis(&self) -> Vec2 {
        Vec2::new(self.move_x, self.vertical)
    }
}

fn snap_axis(value: f32, deadzone: f32) -> f32 {
    if value > deadzone {
        1.0
    } else if value < -deadzone {
        -1.0
    } else {
        0.0
    }
}

/// A press that arrived while its guard was false, retried for a few ticks.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputQueue {
    active: bool,
    steps: u32,
}

impl InputQueue {
    pub fn arm(&mut self) {
        self.active = true;
        self.steps = 0;
    }

    pub fn clear(&mut self) {
        self.active = false;
        self.steps = 0;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Age the queue by one tick. Returns false once it has expired.
    pub fn advance(&mut self, max_steps: u32) -> bool {
        if !self.active {
            return false;
        }
        self.steps += 1;
        if self.steps > max_steps {
            self.clear();
            return false;
        }
        true
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct InputQueues {
    pub jump: InputQueue,
    pub dash: InputQueue,
    pub attack: InputQueue,
}

impl InputQueues {
    pub fn clear(&mut self) {
        self.jump.clear();
        self.dash.clear();
        self.attack.clear();
    }
}
