//! Presentation instructions emitted by the simulation
//!
//! The host renders these; the simulation never draws anything itself.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::EntityId;

/// What kind of sprite a spawned entity needs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Player,
    Enemy,
    PlayerProjectile,
    EnemyProjectile,
}

/// Fixed HUD text locations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HudSlot {
    Health,
    Level,
    Ultimate,
    Help,
    Upgrade,
    Dev,
    Pause,
    GameOver,
}

/// A single presentation instruction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum Effect {
    Spawn { id: EntityId, kind: EntityKind, pos: Vec2 },
    Destroy { id: EntityId },
    /// Multiplicative tint, 0xRRGGBB
    SetTint { id: EntityId, rgb: u32 },
    SetAlpha { id: EntityId, alpha: f32 },
    /// Tween alpha to zero over the duration
    FadeOut { id: EntityId, duration_ms: u64 },
    SetHudText { slot: HudSlot, text: String },
    HideHudText { slot: HudSlot },
}

impl Effect {
    pub fn hud(slot: HudSlot, text: impl Into<String>) -> Self {
        Effect::SetHudText {
            slot,
            text: text.into(),
        }
    }
}

pub const HELP_TEXT: &str =
    "Press SPACE to shoot. Press X to use ultimate when ready. Press P to Pause. Press R to Restart.";
pub const UPGRADE_PROMPT_TEXT: &str =
    "Choose an Upgrade:\n1) +5 Damage\n2) +50 Speed\n3) +1 Projectile";
pub const PAUSE_TEXT: &str = "Game Paused\nPress P to Resume";
pub const GAME_OVER_TEXT: &str = "Game Over!\nPress R to Play Again";

pub fn health_text(health: i32) -> String {
    format!("Health: {}", health.max(0))
}

pub fn level_text(level: u32) -> String {
    format!("Level: {}", level)
}
