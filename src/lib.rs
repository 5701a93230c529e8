//! Battle Arena - combat and progression core for a top-down arena shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, combat, waves, ultimate, upgrades)
//! - `tuning`: Data-driven game balance
//!
//! Rendering, audio and raw input capture live in the host. The simulation
//! consumes tick deltas plus input intents and returns presentation effects.

pub mod sim;
pub mod tuning;

pub use sim::{Effect, SimState, TickInput, on_overlap, restart, tick};
pub use tuning::{Difficulty, Tuning};

use glam::Vec2;

/// Fixed engine constants (timings, geometry). Balance values live in [`Tuning`].
pub mod consts {
    /// Longest single simulation step; larger tick deltas are split into steps of this size
    pub const MAX_STEP_MS: u32 = 250;

    /// Enemy decision period
    pub const AI_INTERVAL_MS: u64 = 1000;
    /// Ultimate countdown period
    pub const ULTIMATE_TICK_MS: u64 = 1000;
    /// Grace window after a non-fatal player hit
    pub const INVULNERABILITY_MS: u64 = 500;
    /// Duration of an enemy lateral dash
    pub const LATERAL_MOVE_MS: u64 = 500;
    /// Player fade-out on death
    pub const FADE_OUT_MS: u64 = 500;
    /// Hit blink: alpha toggles this often, this many times (ends visible)
    pub const BLINK_STEP_MS: u64 = 100;
    pub const BLINK_STEPS: u8 = 6;

    /// Enemy decision policy
    pub const BASE_SHOOT_CHANCE: f32 = 0.3;
    pub const SHOOT_CHANCE_PER_LEVEL: f32 = 0.05;
    pub const MAX_SHOOT_CHANCE: f32 = 0.8;
    pub const LATERAL_CHANCE: f32 = 0.3;
    pub const LATERAL_SPEED: f32 = 150.0;

    /// An upgrade prompt opens every this many levels
    pub const UPGRADE_EVERY_LEVELS: u32 = 5;

    /// Spawn geometry
    pub const SPAWN_MARGIN: f32 = 50.0;
    pub const ENEMY_SPAWN_Y: f32 = 80.0;
    pub const PLAYER_BOTTOM_OFFSET: f32 = 60.0;

    /// Projectiles
    pub const PLAYER_PROJECTILE_SPEED: f32 = 400.0;
    pub const ENEMY_PROJECTILE_SPEED: f32 = 300.0;
    pub const SHOT_SPACING: f32 = 10.0;
    pub const MUZZLE_OFFSET: f32 = 20.0;
    pub const PROJECTILE_RADIUS: f32 = 5.0;

    /// Collision half-extents of the ship sprites
    pub const PLAYER_HALF_EXTENT: f32 = 22.0;
    pub const ENEMY_HALF_EXTENT: f32 = 18.0;
}

/// Clamp a point so a box of `half_extent` stays inside a `width` x `height` arena
#[inline]
pub fn clamp_to_arena(pos: Vec2, half_extent: f32, width: f32, height: f32) -> Vec2 {
    Vec2::new(
        pos.x.clamp(half_extent, (width - half_extent).max(half_extent)),
        pos.y.clamp(half_extent, (height - half_extent).max(half_extent)),
    )
}

/// True when a point lies outside the arena by more than `margin`
#[inline]
pub fn outside_arena(pos: Vec2, margin: f32, width: f32, height: f32) -> bool {
    pos.x < -margin || pos.y < -margin || pos.x > width + margin || pos.y > height + margin
}
