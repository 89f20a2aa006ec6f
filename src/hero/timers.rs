//! Hero domain: named countdown and count-up timers.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TimerId {
    AttackDuration,
    AttackCooldown,
    DashDuration,
    DashCooldown,
    BackDashCooldown,
    LedgeBuffer,
    WallLock,
    HorizontalRecoil,
    BounceDuration,
    Invulnerability,
    FreezeFrame,
    Knockback,
    ParryWindow,
    ParryCooldown,
    ParrySuccess,
    EmpowerDuration,
    TerrainThunk,
    HardLanding,
    DashLanding,
    // Count-up accumulators
    FallTime,
    FloatingCheck,
    LandingFailSafe,
}

impl TimerId {
    pub const COUNT: usize = 22;

    pub const ALL: [TimerId; Self::COUNT] = [
        TimerId::AttackDuration,
        TimerId::AttackCooldown,
        TimerId::DashDuration,
        TimerId::DashCooldown,
        TimerId::BackDashCooldown,
        TimerId::LedgeBuffer,
        TimerId::WallLock,
        TimerId::HorizontalRecoil,
        TimerId::BounceDuration,
        TimerId::Invulnerability,
        TimerId::FreezeFrame,
        TimerId::Knockback,
        TimerId::ParryWindow,
        TimerId::ParryCooldown,
        TimerId::ParrySuccess,
        TimerId::EmpowerDuration,
        TimerId::TerrainThunk,
        TimerId::HardLanding,
        TimerId::DashLanding,
        TimerId::FallTime,
        TimerId::FloatingCheck,
        TimerId::LandingFailSafe,
    ];

    /// Count-up timers accumulate elapsed time instead of counting down.
    pub fn counts_up(self) -> bool {
        matches!(
            self,
            TimerId::FallTime | TimerId::FloatingCheck | TimerId::LandingFailSafe
        )
    }

    fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Countdown {
    pub duration: f32,
    pub remaining: f32,
}

impl Countdown {
    pub fn is_active(&self) -> bool {
        self.remaining > 0.0
    }

    /// Fraction of the armed duration still left, 0 when idle.
    pub fn fraction_left(&self) -> f32 {
        if self.duration <= 0.0 {
            0.0
        } else {
            self.remaining / self.duration
        }
    }
}

/// Per-hero timer storage. Countdowns are clamped at zero and report their
/// expiry exactly once; count-ups only accumulate while running.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TimerBank {
    countdowns: [Countdown; TimerId::COUNT],
    running: [bool; TimerId::COUNT],
}

impl TimerBank {
    pub fn arm(&mut self, id: TimerId, duration: f32) {
        let slot = &mut self.countdowns[id.index()];
        let duration = duration.max(0.0);
        slot.duration = duration;
        if id.counts_up() {
            slot.remaining = 0.0;
            self.running[id.index()] = true;
        } else {
            slot.remaining = duration;
        }
    }

    /// Disarm without reporting expiry. Safe on idle timers.
    pub fn cancel(&mut self, id: TimerId) {
        self.countdowns[id.index()].remaining = 0.0;
        self.running[id.index()] = false;
    }

    pub fn is_active(&self, id: TimerId) -> bool {
        if id.counts_up() {
            self.running[id.index()]
        } else {
            self.countdowns[id.index()].is_active()
        }
    }

    pub fn is_idle(&self, id: TimerId) -> bool {
        !self.is_active(id)
    }

    pub fn remaining(&self, id: TimerId) -> f32 {
        self.countdowns[id.index()].remaining
    }

    /// Accumulated time of a count-up timer.
    pub fn elapsed(&self, id: TimerId) -> f32 {
        self.countdowns[id.index()].remaining
    }

    pub fn get(&self, id: TimerId) -> Countdown {
        self.countdowns[id.index()]
    }

    /// Start a count-up if it is not already running.
    pub fn ensure_running(&mut self, id: TimerId) {
        if !self.running[id.index()] {
            self.arm(id, 0.0);
        }
    }

    /// Advance every timer by `dt`. Returns the countdowns that hit zero.
    pub fn tick(&mut self, dt: f32) -> Vec<TimerId> {
        let mut expired = Vec::new();
        for id in TimerId::ALL {
            if self.advance(id, dt) {
                expired.push(id);
            }
        }
        expired
    }

    /// Advance one timer. Returns true if it expired on this call.
    pub fn tick_one(&mut self, id: TimerId, dt: f32) -> bool {
        self.advance(id, dt)
    }

    fn advance(&mut self, id: TimerId, dt: f32) -> bool {
        let index = id.index();
        let slot = &mut self.countdowns[index];
        if id.counts_up() {
            if self.running[index] {
                slot.remaining += dt;
            }
            return false;
        }
        if slot.remaining <= 0.0 {
            return false;
        }
        slot.remaining = (slot.remaining - dt).max(0.0);
        slot.remaining == 0.0
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn all_zero(&self) -> bool {
        self.countdowns.iter().all(|slot| slot.remaining == 0.0)
            && self.running.iter().all(|running| !running)
    }
}
