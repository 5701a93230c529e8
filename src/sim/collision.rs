//! Built-in kinematics and overlap detection
//!
//! Stands in for a host physics engine: moves everything by its velocity,
//! keeps ships inside the arena and reports projectile overlaps as
//! axis-aligned box intersections. Hosts with their own physics can skip
//! this and feed overlaps through `on_overlap` instead.

use glam::Vec2;

use super::effects::Effect;
use super::state::{EntityId, ProjectileOwner, SimState};
use crate::consts::*;
use crate::{clamp_to_arena, outside_arena};

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn around(center: Vec2, half_extent: f32) -> Self {
        let half = Vec2::splat(half_extent);
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Touching edges do not count as overlap
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }
}

/// Reflect horizontal velocity when a box hits a side wall
pub fn bounce_off_walls(pos: Vec2, vel: Vec2, half_extent: f32, width: f32) -> Vec2 {
    let hit_left = pos.x <= half_extent && vel.x < 0.0;
    let hit_right = pos.x >= width - half_extent && vel.x > 0.0;
    if hit_left || hit_right {
        Vec2::new(-vel.x, vel.y)
    } else {
        vel
    }
}

/// Advance positions by `dt` seconds. Projectiles that leave the arena are
/// destroyed.
pub fn integrate(state: &mut SimState, dt: f32, effects: &mut Vec<Effect>) {
    let width = state.tuning.arena_width;
    let height = state.tuning.arena_height;

    if state.player.alive {
        let player = &mut state.player;
        player.pos = clamp_to_arena(player.pos + player.vel * dt, PLAYER_HALF_EXTENT, width, height);
    }

    for enemy in &mut state.enemies {
        let moved = enemy.pos + enemy.vel * dt;
        enemy.pos = clamp_to_arena(moved, ENEMY_HALF_EXTENT, width, height);
        enemy.vel = bounce_off_walls(enemy.pos, enemy.vel, ENEMY_HALF_EXTENT, width);
    }

    for projectile in &mut state.projectiles {
        projectile.pos += projectile.vel * dt;
    }
    state.projectiles.retain(|p| {
        let gone = outside_arena(p.pos, PROJECTILE_RADIUS, width, height);
        if gone {
            effects.push(Effect::Destroy { id: p.id });
        }
        !gone
    });
}

/// Every (projectile, target) pair currently overlapping, in id order.
/// Resolved projectiles are skipped.
pub fn find_overlaps(state: &SimState) -> Vec<(EntityId, EntityId)> {
    let player_box = Aabb::around(state.player.pos, PLAYER_HALF_EXTENT);
    let mut pairs = Vec::new();

    for projectile in state.projectiles.iter().filter(|p| !p.resolved) {
        let shot_box = Aabb::around(projectile.pos, PROJECTILE_RADIUS);
        match projectile.owner {
            ProjectileOwner::Player => {
                for enemy in &state.enemies {
                    if shot_box.overlaps(&Aabb::around(enemy.pos, ENEMY_HALF_EXTENT)) {
                        pairs.push((projectile.id, enemy.id));
                    }
                }
            }
            ProjectileOwner::Enemy => {
                if state.player.alive && shot_box.overlaps(&player_box) {
                    pairs.push((projectile.id, state.player.id));
                }
            }
        }
    }
    pairs
}
