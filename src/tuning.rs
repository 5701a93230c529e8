//! Game balance and difficulty presets
//!
//! Loaded from JSON when a tuning file is supplied, otherwise defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Difficulty preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Casual,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Casual => "Casual",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "casual" | "easy" => Some(Difficulty::Casual),
            "normal" | "med" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Starting health of every enemy
    pub fn enemy_health(&self) -> i32 {
        match self {
            Difficulty::Casual => 50,
            Difficulty::Normal => 50,
            Difficulty::Hard => 100,
        }
    }

    /// Damage one enemy projectile deals to the player
    pub fn enemy_hit_damage(&self) -> i32 {
        match self {
            Difficulty::Casual => 5,
            Difficulty::Normal => 10,
            Difficulty::Hard => 10,
        }
    }
}

/// Balance values for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Preset the enemy values were derived from
    pub difficulty: Difficulty,

    // === Arena ===
    pub arena_width: f32,
    pub arena_height: f32,

    // === Player ===
    pub player_health: i32,
    /// Movement speed in px/s
    pub player_speed: f32,
    /// Damage per player projectile
    pub player_damage: i32,
    /// Simultaneous projectiles per shot
    pub base_shots: u32,

    // === Enemies ===
    pub enemy_health: i32,
    pub enemy_hit_damage: i32,

    // === Ultimate ===
    /// Kills needed to charge the ultimate
    pub ultimate_kills: u32,
    pub ultimate_duration_secs: u32,
    /// Extra projectiles per shot while the ultimate is active
    pub ultimate_bonus_shots: u32,

    // === Upgrades ===
    pub upgrade_damage: i32,
    pub upgrade_speed: f32,
    pub upgrade_shots: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self::from_difficulty(Difficulty::Normal)
    }
}

impl Tuning {
    /// Create tuning from a difficulty preset (applies preset enemy values)
    pub fn from_difficulty(difficulty: Difficulty) -> Self {
        Self {
            difficulty,

            arena_width: 1280.0,
            arena_height: 720.0,

            player_health: 100,
            player_speed: 250.0,
            player_damage: 20,
            base_shots: 1,

            enemy_health: difficulty.enemy_health(),
            enemy_hit_damage: difficulty.enemy_hit_damage(),

            ultimate_kills: 20,
            ultimate_duration_secs: 30,
            ultimate_bonus_shots: 2,

            upgrade_damage: 5,
            upgrade_speed: 50.0,
            upgrade_shots: 1,
        }
    }

    /// Apply a difficulty preset (updates difficulty-dependent values)
    pub fn apply_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
        self.enemy_health = difficulty.enemy_health();
        self.enemy_hit_damage = difficulty.enemy_hit_damage();
    }

    /// Parse tuning from JSON. Missing enemy values come from the file's
    /// difficulty preset, everything else missing takes its default.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        let has_enemy_health = value.get("enemy_health").is_some();
        let has_enemy_hit_damage = value.get("enemy_hit_damage").is_some();

        let mut tuning: Tuning = serde_json::from_value(value)?;
        if !has_enemy_health {
            tuning.enemy_health = tuning.difficulty.enemy_health();
        }
        if !has_enemy_hit_damage {
            tuning.enemy_hit_damage = tuning.difficulty.enemy_hit_damage();
        }
        Ok(tuning.sanitized())
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load tuning from a JSON file, falling back to defaults
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning from {}", path.display());
                    tuning
                }
                Err(e) => {
                    log::warn!("Invalid tuning file {}: {} - using defaults", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Cannot read tuning file {}: {} - using defaults", path.display(), e);
                Self::default()
            }
        }
    }

    /// Clamp values that would break the simulation's invariants
    fn sanitized(mut self) -> Self {
        self.arena_width = self.arena_width.max(2.0 * crate::consts::SPAWN_MARGIN);
        self.arena_height = self.arena_height.max(2.0 * crate::consts::PLAYER_BOTTOM_OFFSET);
        self.player_health = self.player_health.max(1);
        self.enemy_health = self.enemy_health.max(1);
        self.player_damage = self.player_damage.max(1);
        self.base_shots = self.base_shots.max(1);
        self.ultimate_kills = self.ultimate_kills.max(1);
        self.ultimate_duration_secs = self.ultimate_duration_secs.max(1);
        self
    }
}
