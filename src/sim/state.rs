//! Simulation state and entity types
//!
//! Everything a run needs lives in [`SimState`]; nothing is global.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::schedule::Scheduler;
use super::ultimate::Ultimate;
use super::upgrade::UpgradeState;
use crate::consts::*;
use crate::tuning::Tuning;

/// Stable identifier for any entity; never reused within a run
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct EntityId(pub u32);

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Normal play (may still be paused or awaiting an upgrade choice)
    Playing,
    /// Player health hit zero, fade-out running
    Dying,
    /// Run ended, waiting for restart
    GameOver,
}

/// Tint of an undamaged ship
pub const FULL_HEALTH_TINT: u32 = 0xffffff;

/// The player's ship
#[derive(Debug, Clone)]
pub struct Player {
    pub id: EntityId,
    pub pos: Vec2,
    pub vel: Vec2,
    pub health: i32,
    /// Movement speed in px/s
    pub speed: f32,
    /// Damage per projectile
    pub damage: i32,
    /// Permanent projectiles per shot
    pub base_shots: u32,
    /// Projectiles per shot right now (base plus any ultimate bonus)
    pub shots: u32,
    pub invulnerable: bool,
    pub alive: bool,
    /// Presentation alpha (blink / fade)
    pub alpha: f32,
}

impl Player {
    pub fn new(id: EntityId, tuning: &Tuning) -> Self {
        Self {
            id,
            pos: Vec2::new(
                tuning.arena_width / 2.0,
                tuning.arena_height - PLAYER_BOTTOM_OFFSET,
            ),
            vel: Vec2::ZERO,
            health: tuning.player_health,
            speed: tuning.player_speed,
            damage: tuning.player_damage,
            base_shots: tuning.base_shots,
            shots: tuning.base_shots,
            invulnerable: false,
            alive: true,
            alpha: 1.0,
        }
    }

    /// Subtract damage and return the remaining health (may go negative)
    pub fn take_damage(&mut self, amount: i32) -> i32 {
        self.health -= amount.max(0);
        self.health
    }

    /// Recompute the active shot count from the base plus a temporary bonus
    pub fn refresh_shot_count(&mut self, bonus: u32) {
        self.shots = self.base_shots + bonus;
    }
}

/// An enemy ship
#[derive(Debug, Clone)]
pub struct Enemy {
    pub id: EntityId,
    pub pos: Vec2,
    pub vel: Vec2,
    pub health: i32,
    pub max_health: i32,
    /// Damage tier tint, 0xRRGGBB
    pub tint: u32,
}

impl Enemy {
    pub fn new(id: EntityId, pos: Vec2, health: i32) -> Self {
        Self {
            id,
            pos,
            vel: Vec2::ZERO,
            health,
            max_health: health,
            tint: FULL_HEALTH_TINT,
        }
    }

    /// Subtract damage and return the remaining health (may go negative)
    pub fn take_damage(&mut self, amount: i32) -> i32 {
        self.health -= amount.max(0);
        self.health
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }
}

/// Who fired a projectile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectileOwner {
    Player,
    Enemy,
}

/// A projectile in flight
#[derive(Debug, Clone)]
pub struct Projectile {
    pub id: EntityId,
    pub owner: ProjectileOwner,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Set on first hit; a resolved projectile never deals damage again
    pub resolved: bool,
}

/// Complete simulation state for one run
#[derive(Debug, Clone)]
pub struct SimState {
    /// Seed of the current run
    pub seed: u64,
    pub tuning: Tuning,
    rng: Pcg32,
    /// Current level (wave number), starts at 1
    pub level: u32,
    /// Total enemies destroyed this run
    pub kills: u32,
    pub phase: GamePhase,
    pub paused: bool,
    pub dev_mode: bool,
    pub player: Player,
    /// Living enemies (sorted by id)
    pub enemies: Vec<Enemy>,
    /// Projectiles in flight (sorted by id)
    pub projectiles: Vec<Projectile>,
    pub ultimate: Ultimate,
    pub upgrade: UpgradeState,
    pub scheduler: Scheduler,
    /// Next upgrade the idle pilot picks (1..=3)
    pub(crate) idle_upgrade_pick: u8,
    next_id: u32,
}

impl SimState {
    /// Create a bare run: player placed, no enemies, no timers
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let player = Player::new(EntityId(1), &tuning);
        let ultimate = Ultimate::new(tuning.ultimate_kills);
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            level: 1,
            kills: 0,
            phase: GamePhase::Playing,
            paused: false,
            dev_mode: false,
            player,
            enemies: Vec::new(),
            projectiles: Vec::new(),
            ultimate,
            upgrade: UpgradeState::Inactive,
            scheduler: Scheduler::new(),
            idle_upgrade_pick: 1,
            next_id: 2,
            tuning,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn rng(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }

    pub fn enemy(&self, id: EntityId) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.id == id)
    }

    pub fn enemy_mut(&mut self, id: EntityId) -> Option<&mut Enemy> {
        self.enemies.iter_mut().find(|e| e.id == id)
    }

    pub fn projectile(&self, id: EntityId) -> Option<&Projectile> {
        self.projectiles.iter().find(|p| p.id == id)
    }

    pub fn living_enemies(&self) -> usize {
        self.enemies.len()
    }

    /// True when movement and combat are frozen
    pub fn is_suspended(&self) -> bool {
        self.paused || self.upgrade.is_awaiting() || self.phase != GamePhase::Playing
    }

    /// Extra projectiles per shot granted by the ultimate right now
    pub fn shot_bonus(&self) -> u32 {
        if self.ultimate.is_active() {
            self.tuning.ultimate_bonus_shots
        } else {
            0
        }
    }

    /// Ensure entity lists are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.enemies.sort_by_key(|e| e.id);
        self.projectiles.sort_by_key(|p| p.id);
    }

    /// Seed for the run that follows this one
    pub fn successor_seed(&self) -> u64 {
        self.seed
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407)
    }
}
