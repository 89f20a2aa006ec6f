//! Hero domain: system modules wiring the controller into the world.

pub(crate) mod dispatch;
pub(crate) mod effects;
pub(crate) mod hurtbox;
pub(crate) mod input;
pub(crate) mod physics;
pub(crate) mod slashes;

pub(crate) use dispatch::{dispatch_hero_signals, sync_pause_flag};
pub(crate) use effects::{apply_clip_tint, fade_hero_effects, spawn_hero_effects};
pub(crate) use hurtbox::{collect_hurtbox_hits, flush_buffered_hits};
pub(crate) use input::read_input;
pub(crate) use physics::tick_hero;
pub(crate) use slashes::{cleanup_expired_slashes, detect_slash_contacts, spawn_slashes};
