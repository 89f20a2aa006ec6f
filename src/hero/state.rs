//! Hero domain: coarse state machine gating ordinary input.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum CoarseState {
    NoInput,
    #[default]
    Idle,
    Running,
    Airborne,
    HardLanding,
    DashLanding,
}

impl CoarseState {
    /// States in which jump, dash and attack presses are acted on.
    pub fn accepts_actions(self) -> bool {
        matches!(
            self,
            CoarseState::Idle | CoarseState::Running | CoarseState::Airborne
        )
    }

    pub fn is_landing(self) -> bool {
        matches!(self, CoarseState::HardLanding | CoarseState::DashLanding)
    }
}

/// A state request. `Grounded` is virtual and resolves from move input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateRequest {
    Grounded,
    Exact(CoarseState),
}

impl From<CoarseState> for StateRequest {
    fn from(state: CoarseState) -> Self {
        StateRequest::Exact(state)
    }
}

#[derive(Debug, Clone, Default)]
pub struct StateMachine {
    current: CoarseState,
    previous: CoarseState,
}

impl StateMachine {
    pub fn current(&self) -> CoarseState {
        self.current
    }

    /// State that `exit_no_input` restores when grounded.
    pub fn previous(&self) -> CoarseState {
        self.previous
    }

    /// The single mutation point. Returns the resolved state when it changed.
    pub fn set(&mut self, request: impl Into<StateRequest>, move_x: f32) -> Option<CoarseState> {
        let next = match request.into() {
            StateRequest::Grounded => {
                if move_x.abs() > f32::EPSILON {
                    CoarseState::Running
                } else {
                    CoarseState::Idle
                }
            }
            StateRequest::Exact(state) => state,
        };

        if next == self.current {
            return None;
        }

        if next == CoarseState::NoInput {
            self.previous = self.current;
        }
        self.current = next;
        Some(next)
    }

    /// Leave `NoInput`: airborne if the ground check fails, otherwise the
    /// remembered state. No-op when not in `NoInput`.
    pub fn exit_no_input(&mut self, grounded: bool) -> Option<CoarseState> {
        if self.current != CoarseState::NoInput {
            return None;
        }
        let next = if grounded {
            self.previous
        } else {
            CoarseState::Airborne
        };
        self.current = next;
        Some(next)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
