//! Hero domain: condition flags and the enum-keyed flag accessor.

use serde::Serialize;
use std::str::FromStr;

use crate::hero::body::Facing;

/// Which dash variant is active. Storing it as one optional value keeps
/// forward and back dashes mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DashKind {
    Forward,
    Down,
    Back,
}

/// Side the hero is being pushed toward by a horizontal recoil.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RecoilSide {
    Left,
    Right,
}

impl RecoilSide {
    pub fn sign(self) -> f32 {
        match self {
            RecoilSide::Left => -1.0,
            RecoilSide::Right => 1.0,
        }
    }

    /// Recoil that pushes away from a strike in the given facing.
    pub fn away_from(facing: Facing) -> Self {
        match facing {
            Facing::Right => RecoilSide::Left,
            Facing::Left => RecoilSide::Right,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DeathKind {
    Dead,
    HazardDeath,
}

/// Independent facts about the hero. Exclusive groups live in `Option` fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConditionFlags {
    // Locomotion
    pub on_ground: bool,
    pub falling: bool,
    pub jumping: bool,
    pub dash: Option<DashKind>,
    pub wall_sliding: bool,
    pub touching_wall: bool,
    pub bouncing: bool,

    // Combat
    pub attacking: bool,
    pub up_attacking: bool,
    pub down_attacking: bool,
    pub alt_attack: bool,
    pub empowered: bool,

    // Survival
    pub invulnerable: bool,
    pub recoiling: bool,
    pub recoil_frozen: bool,
    pub recoil: Option<RecoilSide>,
    pub death: Option<DeathKind>,
    pub hazard_respawning: bool,

    // Meta
    pub transitioning: bool,
    pub is_paused: bool,
    pub control_relinquished: bool,
    pub in_walk_zone: bool,
}

impl ConditionFlags {
    pub fn dashing(&self) -> bool {
        matches!(self.dash, Some(DashKind::Forward | DashKind::Down))
    }

    pub fn back_dashing(&self) -> bool {
        self.dash == Some(DashKind::Back)
    }

    pub fn recoiling_left(&self) -> bool {
        self.recoil == Some(RecoilSide::Left)
    }

    pub fn recoiling_right(&self) -> bool {
        self.recoil == Some(RecoilSide::Right)
    }

    pub fn dead(&self) -> bool {
        self.death == Some(DeathKind::Dead)
    }

    pub fn hazard_death(&self) -> bool {
        self.death == Some(DeathKind::HazardDeath)
    }

    pub fn any_death(&self) -> bool {
        self.death.is_some()
    }

    /// Tagged view of the mutually exclusive locomotion concerns.
    pub fn locomotion(&self) -> Locomotion {
        if self.recoiling {
            Locomotion::Recoiling
        } else if self.dash.is_some() {
            Locomotion::Dashing
        } else if self.wall_sliding {
            Locomotion::WallSliding
        } else if self.jumping {
            Locomotion::Jumping
        } else if self.falling {
            Locomotion::Falling
        } else if self.on_ground {
            Locomotion::Grounded
        } else {
            Locomotion::Floating
        }
    }

    /// Checks the exclusion rules. The storage makes them hold already; this
    /// catches a flag combination that no transition should produce.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.death.is_some() && self.hazard_respawning {
            return Err("hazard respawn while a death is in progress");
        }
        if self.recoil_frozen && !self.recoiling {
            return Err("recoil freeze without recoil");
        }
        if self.wall_sliding && self.on_ground {
            return Err("wall sliding while grounded");
        }
        Ok(())
    }

    pub fn get(&self, flag: HeroFlag) -> bool {
        match flag {
            HeroFlag::OnGround => self.on_ground,
            HeroFlag::Falling => self.falling,
            HeroFlag::Jumping => self.jumping,
            HeroFlag::Dashing => self.dashing(),
            HeroFlag::BackDashing => self.back_dashing(),
            HeroFlag::WallSliding => self.wall_sliding,
            HeroFlag::TouchingWall => self.touching_wall,
            HeroFlag::Bouncing => self.bouncing,
            HeroFlag::Attacking => self.attacking,
            HeroFlag::UpAttacking => self.up_attacking,
            HeroFlag::DownAttacking => self.down_attacking,
            HeroFlag::AltAttack => self.alt_attack,
            HeroFlag::Empowered => self.empowered,
            HeroFlag::Invulnerable => self.invulnerable,
            HeroFlag::Recoiling => self.recoiling,
            HeroFlag::RecoilFrozen => self.recoil_frozen,
            HeroFlag::RecoilingLeft => self.recoiling_left(),
            HeroFlag::RecoilingRight => self.recoiling_right(),
            HeroFlag::Dead => self.dead(),
            HeroFlag::HazardDeath => self.hazard_death(),
            HeroFlag::HazardRespawning => self.hazard_respawning,
            HeroFlag::Transitioning => self.transitioning,
            HeroFlag::IsPaused => self.is_paused,
            HeroFlag::ControlRelinquished => self.control_relinquished,
            HeroFlag::InWalkZone => self.in_walk_zone,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locomotion {
    Grounded,
    Jumping,
    Falling,
    Floating,
    Dashing,
    WallSliding,
    Recoiling,
}

/// Closed key set for loosely coupled readers and writers of the flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeroFlag {
    OnGround,
    Falling,
    Jumping,
    Dashing,
    BackDashing,
    WallSliding,
    TouchingWall,
    Bouncing,
    Attacking,
    UpAttacking,
    DownAttacking,
    AltAttack,
    Empowered,
    Invulnerable,
    Recoiling,
    RecoilFrozen,
    RecoilingLeft,
    RecoilingRight,
    Dead,
    HazardDeath,
    HazardRespawning,
    Transitioning,
    IsPaused,
    ControlRelinquished,
    InWalkZone,
}

impl HeroFlag {
    pub const ALL: [HeroFlag; 25] = [
        HeroFlag::OnGround,
        HeroFlag::Falling,
        HeroFlag::Jumping,
        HeroFlag::Dashing,
        HeroFlag::BackDashing,
        HeroFlag::WallSliding,
        HeroFlag::TouchingWall,
        HeroFlag::Bouncing,
        HeroFlag::Attacking,
        HeroFlag::UpAttacking,
        HeroFlag::DownAttacking,
        HeroFlag::AltAttack,
        HeroFlag::Empowered,
        HeroFlag::Invulnerable,
        HeroFlag::Recoiling,
        HeroFlag::RecoilFrozen,
        HeroFlag::RecoilingLeft,
        HeroFlag::RecoilingRight,
        HeroFlag::Dead,
        HeroFlag::HazardDeath,
        HeroFlag::HazardRespawning,
        HeroFlag::Transitioning,
        HeroFlag::IsPaused,
        HeroFlag::ControlRelinquished,
        HeroFlag::InWalkZone,
    ];

    pub fn name(self) -> &'static str {
        match self {
            HeroFlag::OnGround => "on_ground",
            HeroFlag::Falling => "falling",
            HeroFlag::Jumping => "jumping",
            HeroFlag::Dashing => "dashing",
            HeroFlag::BackDashing => "back_dashing",
            HeroFlag::WallSliding => "wall_sliding",
            HeroFlag::TouchingWall => "touching_wall",
            HeroFlag::Bouncing => "bouncing",
            HeroFlag::Attacking => "attacking",
            HeroFlag::UpAttacking => "up_attacking",
            HeroFlag::DownAttacking => "down_attacking",
            HeroFlag::AltAttack => "alt_attack",
            HeroFlag::Empowered => "empowered",
            HeroFlag::Invulnerable => "invulnerable",
            HeroFlag::Recoiling => "recoiling",
            HeroFlag::RecoilFrozen => "recoil_frozen",
            HeroFlag::RecoilingLeft => "recoiling_left",
            HeroFlag::RecoilingRight => "recoiling_right",
            HeroFlag::Dead => "dead",
            HeroFlag::HazardDeath => "hazard_death",
            HeroFlag::HazardRespawning => "hazard_respawning",
            HeroFlag::Transitioning => "transitioning",
            HeroFlag::IsPaused => "is_paused",
            HeroFlag::ControlRelinquished => "control_relinquished",
            HeroFlag::InWalkZone => "in_walk_zone",
        }
    }
}

/// Error returned when a flag name is not in the lookup table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownFlag(pub String);

impl std::fmt::Display for UnknownFlag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Unknown hero flag '{}'", self.0)
    }
}

impl FromStr for HeroFlag {
    type Err = UnknownFlag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HeroFlag::ALL
            .iter()
            .copied()
            .find(|flag| flag.name() == s)
            .ok_or_else(|| UnknownFlag(s.to_string()))
    }
}
