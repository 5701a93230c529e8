//! Projectile spawning and hit resolution
//!
//! A projectile resolves at most once. Resolution marks it and emits its
//! destruction; the tick sweeps resolved projectiles out afterwards, so a
//! second overlap in the same tick finds the flag set and does nothing.

use glam::Vec2;

use super::effects::{Effect, EntityKind, GAME_OVER_TEXT, HudSlot, health_text};
use super::invulnerability;
use super::schedule::TimerKind;
use super::state::{EntityId, FULL_HEALTH_TINT, GamePhase, Projectile, ProjectileOwner, SimState};
use crate::consts::*;

/// What a resolution call did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// Stale ids, already-resolved projectile, or friendly fire
    Ignored,
    /// Projectile consumed but the player was immune
    Absorbed,
    EnemyDamaged { remaining: i32 },
    /// `wave_cleared` is set when this kill emptied the wave
    EnemyKilled { wave_cleared: bool },
    PlayerDamaged { remaining: i32 },
    PlayerKilled,
}

/// Tint tier for a ship's remaining health fraction
pub fn tint_for_health(health: i32, max_health: i32) -> u32 {
    if health >= max_health {
        return FULL_HEALTH_TINT;
    }
    if health <= 0 {
        return 0x000000;
    }
    let fraction = health as f32 / max_health.max(1) as f32;
    if fraction > 0.8 {
        0xffcccc
    } else if fraction > 0.6 {
        0xff9999
    } else if fraction > 0.4 {
        0xff6666
    } else {
        0xff3333
    }
}

pub fn spawn_projectile(
    state: &mut SimState,
    owner: ProjectileOwner,
    pos: Vec2,
    vel: Vec2,
    effects: &mut Vec<Effect>,
) -> EntityId {
    let id = state.next_entity_id();
    state.projectiles.push(Projectile {
        id,
        owner,
        pos,
        vel,
        resolved: false,
    });
    let kind = match owner {
        ProjectileOwner::Player => EntityKind::PlayerProjectile,
        ProjectileOwner::Enemy => EntityKind::EnemyProjectile,
    };
    effects.push(Effect::Spawn { id, kind, pos });
    id
}

/// Fire the player's current shot count as a horizontal spread
pub fn fire_player_volley(state: &mut SimState, effects: &mut Vec<Effect>) {
    if !state.player.alive {
        return;
    }
    let shots = state.player.shots;
    let origin = state.player.pos;
    let start_x = origin.x - (shots.saturating_sub(1) as f32 * SHOT_SPACING) / 2.0;
    for i in 0..shots {
        let pos = Vec2::new(start_x + i as f32 * SHOT_SPACING, origin.y - MUZZLE_OFFSET);
        spawn_projectile(
            state,
            ProjectileOwner::Player,
            pos,
            Vec2::new(0.0, -PLAYER_PROJECTILE_SPEED),
            effects,
        );
    }
}

/// Apply one projectile/target overlap
pub fn resolve_hit(
    state: &mut SimState,
    projectile_id: EntityId,
    target_id: EntityId,
    effects: &mut Vec<Effect>,
) -> HitOutcome {
    let Some(projectile) = state.projectiles.iter_mut().find(|p| p.id == projectile_id) else {
        log::trace!("Overlap with unknown projectile {:?}", projectile_id);
        return HitOutcome::Ignored;
    };
    if projectile.resolved {
        return HitOutcome::Ignored;
    }

    let hits_player = target_id == state.player.id;
    let valid = match projectile.owner {
        ProjectileOwner::Enemy => {
            hits_player && state.player.alive && state.phase == GamePhase::Playing
        }
        ProjectileOwner::Player => {
            !hits_player && state.enemies.iter().any(|e| e.id == target_id)
        }
    };
    if !valid {
        return HitOutcome::Ignored;
    }

    projectile.resolved = true;
    effects.push(Effect::Destroy { id: projectile_id });

    if hits_player {
        hit_player(state, effects)
    } else {
        hit_enemy(state, target_id, effects)
    }
}

fn hit_enemy(state: &mut SimState, id: EntityId, effects: &mut Vec<Effect>) -> HitOutcome {
    let damage = state.player.damage;
    let Some(enemy) = state.enemy_mut(id) else {
        return HitOutcome::Ignored;
    };
    let remaining = enemy.take_damage(damage);
    enemy.tint = tint_for_health(remaining, enemy.max_health);
    effects.push(Effect::SetTint {
        id,
        rgb: enemy.tint,
    });
    log::debug!("Enemy {:?} hit for {}, {} left", id, damage, remaining);

    if remaining > 0 {
        return HitOutcome::EnemyDamaged { remaining };
    }

    state.enemies.retain(|e| e.id != id);
    state.scheduler.cancel_owned_by(id);
    effects.push(Effect::Destroy { id });

    state.kills += 1;
    if state.ultimate.record_kill() {
        log::info!("Ultimate ready after {} kills", state.kills);
    }
    if !state.ultimate.is_active() {
        effects.push(Effect::hud(HudSlot::Ultimate, state.ultimate.hud_text()));
    }

    HitOutcome::EnemyKilled {
        wave_cleared: state.enemies.is_empty(),
    }
}

fn hit_player(state: &mut SimState, effects: &mut Vec<Effect>) -> HitOutcome {
    if state.player.invulnerable || state.ultimate.is_active() {
        log::debug!(
            "Player hit absorbed (invulnerable: {}, ultimate: {})",
            state.player.invulnerable,
            state.ultimate.is_active()
        );
        return HitOutcome::Absorbed;
    }

    let remaining = state.player.take_damage(state.tuning.enemy_hit_damage);
    effects.push(Effect::hud(HudSlot::Health, health_text(remaining)));
    log::debug!("Player hit; current health: {}", remaining);

    if remaining > 0 {
        invulnerability::start(state, effects);
        HitOutcome::PlayerDamaged { remaining }
    } else {
        begin_player_death(state, effects);
        HitOutcome::PlayerKilled
    }
}

/// Health reached zero: freeze the player and fade it out
pub fn begin_player_death(state: &mut SimState, effects: &mut Vec<Effect>) {
    if state.phase != GamePhase::Playing {
        return;
    }
    state.phase = GamePhase::Dying;
    state.player.vel = Vec2::ZERO;
    state.scheduler.cancel_owned_by(state.player.id);
    state
        .scheduler
        .after(FADE_OUT_MS, None, TimerKind::PlayerFadeComplete);
    effects.push(Effect::FadeOut {
        id: state.player.id,
        duration_ms: FADE_OUT_MS,
    });
    log::info!("Player destroyed at level {}", state.level);
}

/// Fade finished: remove the player and end the run
pub fn on_fade_complete(state: &mut SimState, effects: &mut Vec<Effect>) {
    if state.phase != GamePhase::Dying {
        return;
    }
    state.player.alive = false;
    state.player.invulnerable = false;
    state.player.alpha = 0.0;
    state.phase = GamePhase::GameOver;
    effects.push(Effect::Destroy {
        id: state.player.id,
    });
    effects.push(Effect::hud(HudSlot::GameOver, GAME_OVER_TEXT));
    log::info!(
        "Game over: level {}, {} kills (seed {})",
        state.level,
        state.kills,
        state.seed
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Enemy;
    use crate::tuning::Tuning;

    fn with_enemy(health: i32) -> (SimState, EntityId) {
        let mut state = SimState::new(5, Tuning::default());
        let id = state.next_entity_id();
        state.enemies.push(Enemy::new(id, Vec2::new(200.0, 80.0), health));
        (state, id)
    }

    fn shot(state: &mut SimState, owner: ProjectileOwner) -> EntityId {
        let mut effects = Vec::new();
        spawn_projectile(state, owner, Vec2::ZERO, Vec2::ZERO, &mut effects)
    }

    #[test]
    fn test_tint_tiers() {
        assert_eq!(tint_for_health(50, 50), 0xffffff);
        assert_eq!(tint_for_health(45, 50), 0xffcccc);
        assert_eq!(tint_for_health(40, 50), 0xff9999);
        assert_eq!(tint_for_health(30, 50), 0xff6666);
        assert_eq!(tint_for_health(10, 50), 0xff3333);
        assert_eq!(tint_for_health(0, 50), 0x000000);
        assert_eq!(tint_for_health(-10, 50), 0x000000);
    }

    #[test]
    fn test_enemy_hit_and_kill() {
        let (mut state, enemy) = with_enemy(30);
        let mut effects = Vec::new();

        let p1 = shot(&mut state, ProjectileOwner::Player);
        assert_eq!(
            resolve_hit(&mut state, p1, enemy, &mut effects),
            HitOutcome::EnemyDamaged { remaining: 10 }
        );
        let p2 = shot(&mut state, ProjectileOwner::Player);
        assert_eq!(
            resolve_hit(&mut state, p2, enemy, &mut effects),
            HitOutcome::EnemyKilled { wave_cleared: true }
        );
        assert_eq!(state.kills, 1);
        assert_eq!(state.ultimate.progress(), 1);
        assert!(effects.contains(&Effect::Destroy { id: enemy }));
        assert!(effects.contains(&Effect::hud(HudSlot::Ultimate, "Ultimate: 1/20")));
    }

    #[test]
    fn test_projectile_resolves_once() {
        let (mut state, enemy) = with_enemy(100);
        let mut effects = Vec::new();
        let p = shot(&mut state, ProjectileOwner::Player);

        resolve_hit(&mut state, p, enemy, &mut effects);
        let health = state.enemy(enemy).map(|e| e.health);
        assert_eq!(
            resolve_hit(&mut state, p, enemy, &mut effects),
            HitOutcome::Ignored
        );
        assert_eq!(state.enemy(enemy).map(|e| e.health), health);
    }

    #[test]
    fn test_friendly_fire_ignored_and_not_consumed() {
        let (mut state, enemy) = with_enemy(50);
        let mut effects = Vec::new();
        let player_id = state.player.id;

        let enemy_shot = shot(&mut state, ProjectileOwner::Enemy);
        assert_eq!(
            resolve_hit(&mut state, enemy_shot, enemy, &mut effects),
            HitOutcome::Ignored
        );
        let player_shot = shot(&mut state, ProjectileOwner::Player);
        assert_eq!(
            resolve_hit(&mut state, player_shot, player_id, &mut effects),
            HitOutcome::Ignored
        );
        assert!(state.projectiles.iter().all(|p| !p.resolved));
    }

    #[test]
    fn test_player_hit_opens_invulnerability() {
        let mut state = SimState::new(5, Tuning::default());
        let mut effects = Vec::new();
        let player_id = state.player.id;

        let p1 = shot(&mut state, ProjectileOwner::Enemy);
        assert_eq!(
            resolve_hit(&mut state, p1, player_id, &mut effects),
            HitOutcome::PlayerDamaged { remaining: 90 }
        );
        assert!(state.player.invulnerable);

        let p2 = shot(&mut state, ProjectileOwner::Enemy);
        assert_eq!(
            resolve_hit(&mut state, p2, player_id, &mut effects),
            HitOutcome::Absorbed
        );
        assert_eq!(state.player.health, 90);
        assert!(state.projectile(p2).is_some_and(|p| p.resolved));
    }

    #[test]
    fn test_ultimate_makes_player_immune() {
        let mut state = SimState::new(5, Tuning::default());
        let mut effects = Vec::new();
        let player_id = state.player.id;
        for _ in 0..state.tuning.ultimate_kills {
            state.ultimate.record_kill();
        }
        state.ultimate.activate(30);

        let p = shot(&mut state, ProjectileOwner::Enemy);
        assert_eq!(
            resolve_hit(&mut state, p, player_id, &mut effects),
            HitOutcome::Absorbed
        );
        assert_eq!(state.player.health, 100);
        assert!(!state.player.invulnerable);
    }

    #[test]
    fn test_fatal_hit_starts_death_not_invulnerability() {
        let mut state = SimState::new(5, Tuning::default());
        let mut effects = Vec::new();
        let player_id = state.player.id;
        state.player.health = 10;

        let p = shot(&mut state, ProjectileOwner::Enemy);
        assert_eq!(
            resolve_hit(&mut state, p, player_id, &mut effects),
            HitOutcome::PlayerKilled
        );
        assert!(!state.player.invulnerable);
        assert_eq!(state.phase, GamePhase::Dying);
        assert!(effects.contains(&Effect::hud(HudSlot::Health, "Health: 0")));

        on_fade_complete(&mut state, &mut effects);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(!state.player.alive);
        assert!(effects.contains(&Effect::Destroy { id: player_id }));
    }

    #[test]
    fn test_volley_spread_is_centered() {
        let mut state = SimState::new(5, Tuning::default());
        let mut effects = Vec::new();
        state.player.shots = 3;
        fire_player_volley(&mut state, &mut effects);

        let xs: Vec<f32> = state.projectiles.iter().map(|p| p.pos.x).collect();
        let cx = state.player.pos.x;
        assert_eq!(xs, vec![cx - 10.0, cx, cx + 10.0]);
        assert!(state.projectiles.iter().all(|p| p.vel.y < 0.0));
        assert_eq!(effects.len(), 3);
    }
}
