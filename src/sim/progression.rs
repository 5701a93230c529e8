//! Waves and levels
//!
//! Level N spawns N enemies. Clearing a wave advances the level, spawns the
//! next wave and, every few levels, opens the upgrade prompt.

use glam::Vec2;
use rand::Rng;

use super::effects::{Effect, EntityKind, HudSlot, level_text};
use super::state::{Enemy, EntityId, SimState};
use super::upgrade;
use crate::consts::*;

/// True when reaching `level` should open the upgrade prompt
pub fn upgrade_due(level: u32) -> bool {
    level > 1 && (level - 1) % UPGRADE_EVERY_LEVELS == 0
}

/// Spawn `count` enemies across the top of the arena
pub fn spawn_wave(state: &mut SimState, count: u32, effects: &mut Vec<Effect>) -> Vec<EntityId> {
    let health = state.tuning.enemy_health;
    let lo = SPAWN_MARGIN;
    let hi = (state.tuning.arena_width - SPAWN_MARGIN).max(lo);

    let mut spawned = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let x = state.rng().random_range(lo..=hi);
        let pos = Vec2::new(x, ENEMY_SPAWN_Y);
        let id = state.next_entity_id();
        state.enemies.push(Enemy::new(id, pos, health));
        effects.push(Effect::Spawn {
            id,
            kind: EntityKind::Enemy,
            pos,
        });
        spawned.push(id);
    }
    log::info!(
        "Wave {}: spawned {} enemies with {} hp",
        state.level,
        count,
        health
    );
    spawned
}

/// The last enemy of the wave died
pub fn on_wave_cleared(state: &mut SimState, effects: &mut Vec<Effect>) {
    if !state.enemies.is_empty() {
        log::trace!("Wave clear requested with {} enemies alive", state.enemies.len());
        return;
    }
    state.level += 1;
    log::info!("Level up: {}", state.level);
    effects.push(Effect::hud(HudSlot::Level, level_text(state.level)));

    let count = state.level;
    spawn_wave(state, count, effects);

    if upgrade_due(state.level) {
        upgrade::prompt(state, effects);
    }
}
