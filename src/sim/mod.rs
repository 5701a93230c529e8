//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time advances only through `tick` deltas
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod ai;
pub mod collision;
pub mod combat;
pub mod effects;
pub mod invulnerability;
pub mod progression;
pub mod schedule;
pub mod state;
pub mod tick;
pub mod ultimate;
pub mod upgrade;

pub use ai::{EnemyAction, shoot_chance};
pub use combat::{HitOutcome, resolve_hit};
pub use effects::{Effect, EntityKind, HudSlot};
pub use progression::{on_wave_cleared, spawn_wave, upgrade_due};
pub use schedule::{Scheduler, TimerId, TimerKind};
pub use state::{Enemy, EntityId, GamePhase, Player, Projectile, ProjectileOwner, SimState};
pub use tick::{DevAdjust, TickInput, on_overlap, restart, start, tick};
pub use ultimate::{Ultimate, UltimateState};
pub use upgrade::{UpgradeChoice, UpgradeState};
