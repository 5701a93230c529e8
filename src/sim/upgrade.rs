//! Upgrade prompt: a blocking choice between three permanent boosts

use serde::{Deserialize, Serialize};

use super::effects::{Effect, HudSlot, UPGRADE_PROMPT_TEXT};
use super::state::SimState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum UpgradeState {
    #[default]
    Inactive,
    /// Simulation suspended until a valid key arrives
    AwaitingChoice,
}

impl UpgradeState {
    pub fn is_awaiting(&self) -> bool {
        *self == UpgradeState::AwaitingChoice
    }
}

/// The three permanent boosts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpgradeChoice {
    Damage,
    Speed,
    ExtraShot,
}

impl UpgradeChoice {
    /// Keys 1, 2 and 3; anything else is not a choice
    pub fn from_key(key: u8) -> Option<Self> {
        match key {
            1 => Some(UpgradeChoice::Damage),
            2 => Some(UpgradeChoice::Speed),
            3 => Some(UpgradeChoice::ExtraShot),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UpgradeChoice::Damage => "Damage",
            UpgradeChoice::Speed => "Speed",
            UpgradeChoice::ExtraShot => "Projectile",
        }
    }
}

/// Open the prompt. Ignored if one is already open.
pub fn prompt(state: &mut SimState, effects: &mut Vec<Effect>) {
    if state.upgrade.is_awaiting() {
        return;
    }
    state.upgrade = UpgradeState::AwaitingChoice;
    state.player.vel = glam::Vec2::ZERO;
    log::info!("Level {}: upgrade prompt open", state.level);
    effects.push(Effect::hud(HudSlot::Upgrade, UPGRADE_PROMPT_TEXT));
}

/// Handle an upgrade key. Returns the applied choice, or None when there is
/// no prompt or the key is not one of the three choices.
pub fn choose(state: &mut SimState, key: u8, effects: &mut Vec<Effect>) -> Option<UpgradeChoice> {
    if !state.upgrade.is_awaiting() {
        return None;
    }
    let Some(choice) = UpgradeChoice::from_key(key) else {
        log::trace!("Ignoring upgrade key {}", key);
        return None;
    };

    apply(state, choice);
    state.upgrade = UpgradeState::Inactive;
    log::info!(
        "Upgrade chosen: {} (damage {}, speed {}, shots {})",
        choice.as_str(),
        state.player.damage,
        state.player.speed,
        state.player.base_shots
    );
    effects.push(Effect::HideHudText {
        slot: HudSlot::Upgrade,
    });
    Some(choice)
}

fn apply(state: &mut SimState, choice: UpgradeChoice) {
    let tuning = &state.tuning;
    let player = &mut state.player;
    match choice {
        UpgradeChoice::Damage => player.damage += tuning.upgrade_damage,
        UpgradeChoice::Speed => player.speed += tuning.upgrade_speed,
        UpgradeChoice::ExtraShot => {
            player.base_shots += tuning.upgrade_shots;
            let bonus = if state.ultimate.is_active() {
                tuning.ultimate_bonus_shots
            } else {
                0
            };
            player.refresh_shot_count(bonus);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    fn prompted() -> (SimState, Vec<Effect>) {
        let mut state = SimState::new(3, Tuning::default());
        let mut effects = Vec::new();
        prompt(&mut state, &mut effects);
        (state, effects)
    }

    #[test]
    fn test_prompt_suspends_simulation() {
        let (state, effects) = prompted();
        assert!(state.upgrade.is_awaiting());
        assert!(state.is_suspended());
        assert_eq!(effects, vec![Effect::hud(HudSlot::Upgrade, UPGRADE_PROMPT_TEXT)]);
    }

    #[test]
    fn test_invalid_key_ignored() {
        let (mut state, mut effects) = prompted();
        assert_eq!(choose(&mut state, 4, &mut effects), None);
        assert_eq!(choose(&mut state, 0, &mut effects), None);
        assert!(state.upgrade.is_awaiting());
        assert_eq!(state.player.damage, 20);
    }

    #[test]
    fn test_damage_choice() {
        let (mut state, mut effects) = prompted();
        assert_eq!(choose(&mut state, 1, &mut effects), Some(UpgradeChoice::Damage));
        assert_eq!(state.player.damage, 25);
        assert!(!state.upgrade.is_awaiting());
        assert_eq!(
            effects.last(),
            Some(&Effect::HideHudText { slot: HudSlot::Upgrade })
        );
    }

    #[test]
    fn test_speed_choice() {
        let (mut state, mut effects) = prompted();
        choose(&mut state, 2, &mut effects);
        assert_eq!(state.player.speed, 300.0);
    }

    #[test]
    fn test_extra_shot_raises_active_count() {
        let (mut state, mut effects) = prompted();
        choose(&mut state, 3, &mut effects);
        assert_eq!(state.player.base_shots, 2);
        assert_eq!(state.player.shots, 2);
    }

    #[test]
    fn test_only_one_choice_per_prompt() {
        let (mut state, mut effects) = prompted();
        choose(&mut state, 1, &mut effects);
        assert_eq!(choose(&mut state, 1, &mut effects), None);
        assert_eq!(state.player.damage, 25);
    }
}
