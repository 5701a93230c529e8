//! Enemy decision engine
//!
//! Polled once per AI interval for every living enemy. Each decision is one
//! uniform draw; nothing but the enemy's velocity carries over.

use glam::Vec2;
use rand::Rng;

use super::combat::spawn_projectile;
use super::effects::Effect;
use super::schedule::TimerKind;
use super::state::{EntityId, ProjectileOwner, SimState};
use crate::consts::*;

/// Outcome of one decision
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EnemyAction {
    /// Fire straight down
    Shoot,
    /// Dash sideways; negative is left
    Strafe { vx: f32 },
    /// Stop and wait
    Hold,
}

/// Probability of shooting at a given level, capped
pub fn shoot_chance(level: u32) -> f32 {
    let steps = level.saturating_sub(1) as f32;
    (BASE_SHOOT_CHANCE + SHOOT_CHANCE_PER_LEVEL * steps).min(MAX_SHOOT_CHANCE)
}

/// Map a draw `r` in [0, 1) to an action. `go_left` is only consulted for strafes.
pub fn decide(r: f32, level: u32, go_left: impl FnOnce() -> bool) -> EnemyAction {
    let shoot = shoot_chance(level);
    if r < shoot {
        EnemyAction::Shoot
    } else if r < shoot + LATERAL_CHANCE {
        let vx = if go_left() {
            -LATERAL_SPEED
        } else {
            LATERAL_SPEED
        };
        EnemyAction::Strafe { vx }
    } else {
        EnemyAction::Hold
    }
}

/// AI interval elapsed: every living enemy decides, in id order
pub fn run(state: &mut SimState, effects: &mut Vec<Effect>) {
    let ids: Vec<EntityId> = state.enemies.iter().map(|e| e.id).collect();
    let level = state.level;
    for id in ids {
        let r: f32 = state.rng().random();
        let action = decide(r, level, || state.rng().random_bool(0.5));
        apply(state, id, action, effects);
    }
}

fn apply(state: &mut SimState, id: EntityId, action: EnemyAction, effects: &mut Vec<Effect>) {
    let Some(enemy) = state.enemy_mut(id) else {
        return;
    };
    match action {
        EnemyAction::Shoot => {
            let origin = enemy.pos + Vec2::new(0.0, MUZZLE_OFFSET);
            spawn_projectile(
                state,
                ProjectileOwner::Enemy,
                origin,
                Vec2::new(0.0, ENEMY_PROJECTILE_SPEED),
                effects,
            );
        }
        EnemyAction::Strafe { vx } => {
            enemy.vel.x = vx;
            state
                .scheduler
                .after(LATERAL_MOVE_MS, Some(id), TimerKind::LateralStop);
        }
        EnemyAction::Hold => enemy.vel.x = 0.0,
    }
}

/// Lateral dash timer fired; the enemy may already be gone
pub fn on_lateral_stop(state: &mut SimState, id: EntityId) {
    if let Some(enemy) = state.enemy_mut(id) {
        enemy.vel.x = 0.0;
    }
}
