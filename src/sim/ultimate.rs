//! Ultimate ability: kill-charged, timed buff
//!
//! Charging -> Ready when progress saturates, Ready -> Active on activation,
//! Active -> Charging (or Ready) when the countdown reaches zero. Ready and
//! Active are variants of one enum so they can never both hold.

use serde::{Deserialize, Serialize};

use super::effects::{Effect, HudSlot};
use super::schedule::{TimerId, TimerKind};
use super::state::SimState;
use crate::consts::ULTIMATE_TICK_MS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UltimateState {
    /// Accumulating kills
    Charging,
    /// Progress saturated, waiting for activation
    Ready,
    /// Buff running
    Active { remaining_secs: u32 },
}

/// Result of one countdown step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Countdown {
    Running(u32),
    Expired,
    /// Not active; nothing to count
    Idle,
}

#[derive(Debug, Clone)]
pub struct Ultimate {
    progress: u32,
    threshold: u32,
    state: UltimateState,
    countdown_timer: Option<TimerId>,
}

impl Ultimate {
    pub fn new(threshold: u32) -> Self {
        Self {
            progress: 0,
            threshold: threshold.max(1),
            state: UltimateState::Charging,
            countdown_timer: None,
        }
    }

    pub fn progress(&self) -> u32 {
        self.progress
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    pub fn state(&self) -> UltimateState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == UltimateState::Ready
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, UltimateState::Active { .. })
    }

    pub fn remaining_secs(&self) -> Option<u32> {
        match self.state {
            UltimateState::Active { remaining_secs } => Some(remaining_secs),
            _ => None,
        }
    }

    /// Count one kill toward the threshold. Returns true when this kill made
    /// the ultimate ready. Kills during the active window still accumulate.
    pub fn record_kill(&mut self) -> bool {
        self.progress = (self.progress + 1).min(self.threshold);
        if self.progress == self.threshold && self.state == UltimateState::Charging {
            self.state = UltimateState::Ready;
            return true;
        }
        false
    }

    /// Ready -> Active. Resets progress. Returns false in any other state.
    pub fn activate(&mut self, duration_secs: u32) -> bool {
        if self.state != UltimateState::Ready {
            return false;
        }
        self.state = UltimateState::Active {
            remaining_secs: duration_secs.max(1),
        };
        self.progress = 0;
        true
    }

    /// One second elapsed
    pub fn countdown(&mut self) -> Countdown {
        let UltimateState::Active { remaining_secs } = self.state else {
            return Countdown::Idle;
        };
        let remaining_secs = remaining_secs.saturating_sub(1);
        if remaining_secs == 0 {
            self.state = if self.progress == self.threshold {
                UltimateState::Ready
            } else {
                UltimateState::Charging
            };
            Countdown::Expired
        } else {
            self.state = UltimateState::Active { remaining_secs };
            Countdown::Running(remaining_secs)
        }
    }

    /// HUD line for the current state
    pub fn hud_text(&self) -> String {
        match self.state {
            UltimateState::Charging => format!("Ultimate: {}/{}", self.progress, self.threshold),
            UltimateState::Ready => "Ultimate: Ready! Press X".to_string(),
            UltimateState::Active { remaining_secs } => {
                format!("ULTIMATE ACTIVE: {}s", remaining_secs)
            }
        }
    }
}

/// Activation input. No-op unless ready.
pub fn activate(state: &mut SimState, effects: &mut Vec<Effect>) {
    let duration = state.tuning.ultimate_duration_secs;
    if !state.ultimate.activate(duration) {
        log::trace!("Ultimate not ready ({:?})", state.ultimate.state());
        return;
    }

    let bonus = state.shot_bonus();
    state.player.refresh_shot_count(bonus);
    let timer = state
        .scheduler
        .every(ULTIMATE_TICK_MS, None, TimerKind::UltimateCountdown);
    state.ultimate.countdown_timer = Some(timer);

    log::info!(
        "Ultimate activated: {}s, {} shots",
        duration,
        state.player.shots
    );
    effects.push(Effect::hud(HudSlot::Ultimate, state.ultimate.hud_text()));
}

/// Countdown timer fired
pub fn on_countdown(state: &mut SimState, effects: &mut Vec<Effect>) {
    match state.ultimate.countdown() {
        Countdown::Running(_) => {
            effects.push(Effect::hud(HudSlot::Ultimate, state.ultimate.hud_text()));
        }
        Countdown::Expired => deactivate(state, effects),
        Countdown::Idle => {
            // Stale timer from a run that already ended the buff
            if let Some(timer) = state.ultimate.countdown_timer.take() {
                state.scheduler.cancel(timer);
            }
        }
    }
}

fn deactivate(state: &mut SimState, effects: &mut Vec<Effect>) {
    if let Some(timer) = state.ultimate.countdown_timer.take() {
        state.scheduler.cancel(timer);
    }
    let bonus = state.shot_bonus();
    state.player.refresh_shot_count(bonus);
    log::info!("Ultimate expired, back to {} shots", state.player.shots);
    effects.push(Effect::hud(HudSlot::Ultimate, state.ultimate.hud_text()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    #[test]
    fn test_progress_saturates_and_flips_ready() {
        let mut ult = Ultimate::new(3);
        assert!(!ult.record_kill());
        assert!(!ult.record_kill());
        assert!(ult.record_kill());
        assert!(ult.is_ready());
        assert!(!ult.record_kill());
        assert_eq!(ult.progress(), 3);
    }

    #[test]
    fn test_activate_requires_ready() {
        let mut ult = Ultimate::new(2);
        assert!(!ult.activate(30));
        ult.record_kill();
        ult.record_kill();
        assert!(ult.activate(30));
        assert!(ult.is_active());
        assert!(!ult.is_ready());
        assert_eq!(ult.progress(), 0);
        assert!(!ult.activate(30));
    }

    #[test]
    fn test_countdown_expires_to_charging() {
        let mut ult = Ultimate::new(1);
        ult.record_kill();
        ult.activate(2);
        assert_eq!(ult.countdown(), Countdown::Running(1));
        assert_eq!(ult.hud_text(), "ULTIMATE ACTIVE: 1s");
        assert_eq!(ult.countdown(), Countdown::Expired);
        assert_eq!(ult.state(), UltimateState::Charging);
        assert_eq!(ult.countdown(), Countdown::Idle);
    }

    #[test]
    fn test_kills_while_active_become_ready_after_expiry() {
        let mut ult = Ultimate::new(2);
        ult.record_kill();
        ult.record_kill();
        ult.activate(1);
        assert!(!ult.record_kill());
        assert!(!ult.record_kill());
        assert!(ult.is_active());
        assert!(!ult.is_ready());
        assert_eq!(ult.countdown(), Countdown::Expired);
        assert!(ult.is_ready());
    }

    #[test]
    fn test_activation_raises_shots_and_expiry_restores() {
        let mut state = SimState::new(1, Tuning::default());
        let mut effects = Vec::new();
        for _ in 0..state.tuning.ultimate_kills {
            state.ultimate.record_kill();
        }

        activate(&mut state, &mut effects);
        assert_eq!(state.player.shots, 3);
        assert_eq!(
            effects.last(),
            Some(&Effect::hud(HudSlot::Ultimate, "ULTIMATE ACTIVE: 30s"))
        );

        for _ in 0..30 {
            on_countdown(&mut state, &mut effects);
        }
        assert!(!state.ultimate.is_active());
        assert_eq!(state.player.shots, 1);
        assert_eq!(
            effects.last(),
            Some(&Effect::hud(HudSlot::Ultimate, "Ultimate: 0/20"))
        );
        assert!(state.scheduler.is_empty());
    }
}
