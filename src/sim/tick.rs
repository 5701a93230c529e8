//! Simulation tick and external entry points
//!
//! One call advances the whole simulation: pause/restart handling, timers,
//! discrete input, movement, overlap resolution, progression. Every step
//! appends presentation effects to the returned list.

use glam::Vec2;

use super::effects::{Effect, EntityKind, HELP_TEXT, HudSlot, PAUSE_TEXT, health_text, level_text};
use super::schedule::TimerKind;
use super::state::{EntityId, GamePhase, ProjectileOwner, SimState};
use super::{ai, collision, combat, invulnerability, progression, ultimate, upgrade};
use crate::consts::*;
use crate::tuning::Tuning;

/// Input for a single tick. Movement flags are held keys; the rest are
/// key presses seen since the previous tick.
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    /// Fire one volley
    pub fire: bool,
    /// Activate the ultimate
    pub ultimate: bool,
    /// Upgrade prompt key (1, 2 or 3 are valid)
    pub upgrade_key: Option<u8>,
    /// Pause toggle
    pub pause: bool,
    /// Start over (honoured after game over)
    pub restart: bool,
    /// Dev mode toggle
    pub dev_toggle: bool,
    /// Dev stat adjustment
    pub dev_adjust: Option<DevAdjust>,
    /// Idle/demo mode - a built-in pilot plays
    pub idle_mode: bool,
}

/// Dev mode stat tweaks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DevAdjust {
    SpeedUp,
    SpeedDown,
    DamageUp,
    DamageDown,
    ShotsUp,
    ShotsDown,
}

/// Create a run and the effects that present its first frame
pub fn start(seed: u64, tuning: Tuning) -> (SimState, Vec<Effect>) {
    let mut state = SimState::new(seed, tuning);
    let mut effects = Vec::new();
    begin_run(&mut state, &mut effects);
    (state, effects)
}

/// Throw the current run away and start wave 1 with the successor seed
pub fn restart(state: &mut SimState) -> Vec<Effect> {
    let mut effects = Vec::new();

    // Clear whatever the host is still showing
    if state.player.alive {
        effects.push(Effect::Destroy {
            id: state.player.id,
        });
    }
    for enemy in &state.enemies {
        effects.push(Effect::Destroy { id: enemy.id });
    }
    for projectile in &state.projectiles {
        effects.push(Effect::Destroy { id: projectile.id });
    }
    for slot in [HudSlot::GameOver, HudSlot::Pause, HudSlot::Upgrade, HudSlot::Dev] {
        effects.push(Effect::HideHudText { slot });
    }

    let seed = state.successor_seed();
    let tuning = state.tuning.clone();
    *state = SimState::new(seed, tuning);
    begin_run(state, &mut effects);
    log::info!("Game restarted with seed: {}", seed);
    effects
}

fn begin_run(state: &mut SimState, effects: &mut Vec<Effect>) {
    effects.push(Effect::Spawn {
        id: state.player.id,
        kind: EntityKind::Player,
        pos: state.player.pos,
    });
    effects.push(Effect::hud(HudSlot::Health, health_text(state.player.health)));
    effects.push(Effect::hud(HudSlot::Level, level_text(state.level)));
    effects.push(Effect::hud(HudSlot::Ultimate, state.ultimate.hud_text()));
    effects.push(Effect::hud(HudSlot::Help, HELP_TEXT));

    let count = state.level;
    progression::spawn_wave(state, count, effects);
    state.scheduler.every(AI_INTERVAL_MS, None, TimerKind::EnemyAi);
}

/// Advance the simulation by `dt_ms` milliseconds
pub fn tick(state: &mut SimState, input: &TickInput, dt_ms: u32) -> Vec<Effect> {
    let mut effects = Vec::new();

    if input.restart && state.phase == GamePhase::GameOver {
        return restart(state);
    }

    // Handle pause toggle
    if input.pause && state.phase != GamePhase::GameOver {
        state.paused = !state.paused;
        if state.paused {
            state.player.vel = Vec2::ZERO;
            effects.push(Effect::hud(HudSlot::Pause, PAUSE_TEXT));
            return effects;
        }
        effects.push(Effect::HideHudText {
            slot: HudSlot::Pause,
        });
    }
    if state.paused || state.phase == GamePhase::GameOver {
        return effects;
    }

    // Idle/demo mode - the pilot decides this tick's input
    let input = if input.idle_mode {
        idle_pilot(state, input)
    } else {
        input.clone()
    };

    handle_dev_keys(state, &input, &mut effects);

    // The prompt freezes the clock; only its keys get through
    if state.upgrade.is_awaiting() {
        if let Some(key) = input.upgrade_key {
            upgrade::choose(state, key, &mut effects);
        }
        return effects;
    }

    // The whole delta is simulated, in steps no longer than MAX_STEP_MS.
    // Presses act once, on the first step.
    let mut remaining = dt_ms;
    let mut first = true;
    loop {
        let step_ms = remaining.min(MAX_STEP_MS);
        remaining -= step_ms;
        step(state, &input, step_ms, first, &mut effects);
        first = false;

        // A prompt or game over stops the clock for the rest of the delta
        if remaining == 0 || state.upgrade.is_awaiting() || state.phase == GamePhase::GameOver {
            break;
        }
    }

    effects
}

fn step(
    state: &mut SimState,
    input: &TickInput,
    dt_ms: u32,
    first: bool,
    effects: &mut Vec<Effect>,
) {
    run_timers(state, dt_ms, effects);
    if state.is_suspended() {
        return;
    }

    if first && input.ultimate {
        ultimate::activate(state, effects);
    }

    let speed = state.player.speed;
    let mut vel = Vec2::ZERO;
    if input.left {
        vel.x = -speed;
    } else if input.right {
        vel.x = speed;
    }
    if input.up {
        vel.y = -speed;
    } else if input.down {
        vel.y = speed;
    }
    state.player.vel = vel;

    if first && input.fire {
        combat::fire_player_volley(state, effects);
    }

    collision::integrate(state, dt_ms as f32 / 1000.0, effects);

    for (projectile, target) in collision::find_overlaps(state) {
        resolve_and_progress(state, projectile, target, effects);
        if state.is_suspended() {
            break;
        }
    }
    sweep_resolved(state);
}

/// Overlap reported by a host physics engine
pub fn on_overlap(state: &mut SimState, projectile: EntityId, target: EntityId) -> Vec<Effect> {
    let mut effects = Vec::new();
    if state.is_suspended() {
        log::trace!("Overlap {:?}/{:?} while suspended", projectile, target);
        return effects;
    }
    resolve_and_progress(state, projectile, target, &mut effects);
    sweep_resolved(state);
    effects
}

fn resolve_and_progress(
    state: &mut SimState,
    projectile: EntityId,
    target: EntityId,
    effects: &mut Vec<Effect>,
) {
    let outcome = combat::resolve_hit(state, projectile, target, effects);
    if matches!(outcome, combat::HitOutcome::EnemyKilled { wave_cleared: true }) {
        progression::on_wave_cleared(state, effects);
    }
}

fn sweep_resolved(state: &mut SimState) {
    state.projectiles.retain(|p| !p.resolved);
}

fn run_timers(state: &mut SimState, dt_ms: u32, effects: &mut Vec<Effect>) {
    let until = state.scheduler.now_ms() + u64::from(dt_ms);
    while let Some(fired) = state.scheduler.pop_due(until) {
        match fired.kind {
            TimerKind::EnemyAi => {
                if state.phase == GamePhase::Playing {
                    ai::run(state, effects);
                }
            }
            TimerKind::UltimateCountdown => ultimate::on_countdown(state, effects),
            TimerKind::InvulnerabilityEnd => invulnerability::on_end(state),
            TimerKind::LateralStop => {
                if let Some(owner) = fired.owner {
                    ai::on_lateral_stop(state, owner);
                }
            }
            TimerKind::Blink { remaining } => invulnerability::on_blink(state, remaining, effects),
            TimerKind::PlayerFadeComplete => combat::on_fade_complete(state, effects),
        }
        if state.phase == GamePhase::GameOver {
            break;
        }
    }
    state.scheduler.settle(until);
}

fn handle_dev_keys(state: &mut SimState, input: &TickInput, effects: &mut Vec<Effect>) {
    if input.dev_toggle {
        state.dev_mode = !state.dev_mode;
        log::info!("Dev mode: {}", state.dev_mode);
        if !state.dev_mode {
            effects.push(Effect::HideHudText { slot: HudSlot::Dev });
            return;
        }
        effects.push(Effect::hud(HudSlot::Dev, dev_text(state)));
    }
    if !state.dev_mode {
        return;
    }
    let Some(adjust) = input.dev_adjust else {
        return;
    };

    let player = &mut state.player;
    match adjust {
        DevAdjust::SpeedUp => player.speed += 10.0,
        DevAdjust::SpeedDown => player.speed = (player.speed - 10.0).max(50.0),
        DevAdjust::DamageUp => player.damage += 1,
        DevAdjust::DamageDown => player.damage = (player.damage - 1).max(1),
        DevAdjust::ShotsUp => player.base_shots += 1,
        DevAdjust::ShotsDown => player.base_shots = player.base_shots.saturating_sub(1).max(1),
    }
    let bonus = state.shot_bonus();
    state.player.refresh_shot_count(bonus);
    effects.push(Effect::hud(HudSlot::Dev, dev_text(state)));
}

fn dev_text(state: &SimState) -> String {
    format!(
        "Dev Mode:\nSpeed: {}\nDamage: {}\nProjectiles: {}",
        state.player.speed, state.player.damage, state.player.base_shots
    )
}

/// Built-in pilot for idle/demo mode
fn idle_pilot(state: &mut SimState, input: &TickInput) -> TickInput {
    let mut input = input.clone();

    if state.upgrade.is_awaiting() {
        input.upgrade_key = Some(state.idle_upgrade_pick);
        state.idle_upgrade_pick = state.idle_upgrade_pick % 3 + 1;
        return input;
    }

    let px = state.player.pos.x;
    let py = state.player.pos.y;

    // Sidestep the closest enemy shot that is about to land
    let threat = state
        .projectiles
        .iter()
        .filter(|p| p.owner == ProjectileOwner::Enemy && !p.resolved)
        .filter(|p| p.pos.y < py && py - p.pos.y < 140.0)
        .filter(|p| (p.pos.x - px).abs() < PLAYER_HALF_EXTENT + PROJECTILE_RADIUS)
        .min_by(|a, b| {
            (py - a.pos.y)
                .partial_cmp(&(py - b.pos.y))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|p| p.pos.x);

    // Otherwise line up under the nearest enemy
    let target = state
        .enemies
        .iter()
        .min_by(|a, b| {
            (a.pos.x - px)
                .abs()
                .partial_cmp(&(b.pos.x - px).abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|e| e.pos.x);

    input.left = false;
    input.right = false;
    if let Some(shot_x) = threat {
        let room_left = shot_x - PLAYER_HALF_EXTENT * 3.0 > 0.0;
        input.left = shot_x >= px && room_left;
        input.right = !input.left;
    } else if let Some(x) = target {
        input.left = x < px - 4.0;
        input.right = x > px + 4.0;
    }

    let in_flight = state
        .projectiles
        .iter()
        .filter(|p| p.owner == ProjectileOwner::Player)
        .count() as u32;
    input.fire = target.is_some() && in_flight < state.player.shots * 3;
    input.ultimate = state.ultimate.is_ready();
    input
}
