//! Post-hit grace window on the player, plus the blink that shows it
//!
//! The window is fixed length from the hit that opened it. Hits landing inside
//! the window are rejected by the combat resolver and never extend it.

use super::effects::Effect;
use super::schedule::TimerKind;
use super::state::SimState;
use crate::consts::{BLINK_STEP_MS, BLINK_STEPS, INVULNERABILITY_MS};

/// Open the grace window after a non-fatal hit
pub fn start(state: &mut SimState, effects: &mut Vec<Effect>) {
    if state.player.invulnerable {
        return;
    }
    let owner = Some(state.player.id);
    state.player.invulnerable = true;
    state
        .scheduler
        .after(INVULNERABILITY_MS, owner, TimerKind::InvulnerabilityEnd);

    state.player.alpha = 0.0;
    effects.push(Effect::SetAlpha {
        id: state.player.id,
        alpha: 0.0,
    });
    state.scheduler.after(
        BLINK_STEP_MS,
        owner,
        TimerKind::Blink {
            remaining: BLINK_STEPS - 2,
        },
    );
}

pub fn on_end(state: &mut SimState) {
    if !state.player.alive {
        return;
    }
    state.player.invulnerable = false;
    log::debug!("Player invulnerability ended");
}

pub fn on_blink(state: &mut SimState, remaining: u8, effects: &mut Vec<Effect>) {
    if !state.player.alive {
        return;
    }
    // Last toggle always lands visible
    let alpha = if remaining == 0 || state.player.alpha < 0.5 {
        1.0
    } else {
        0.0
    };
    state.player.alpha = alpha;
    effects.push(Effect::SetAlpha {
        id: state.player.id,
        alpha,
    });
    if remaining > 0 {
        state.scheduler.after(
            BLINK_STEP_MS,
            Some(state.player.id),
            TimerKind::Blink {
                remaining: remaining - 1,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    #[test]
    fn test_window_closes_after_delay() {
        let mut state = SimState::new(1, Tuning::default());
        let mut effects = Vec::new();
        start(&mut state, &mut effects);
        assert!(state.player.invulnerable);

        let fired = state.scheduler.pop_due(INVULNERABILITY_MS - 1);
        assert!(matches!(fired.map(|f| f.kind), Some(TimerKind::Blink { .. })));

        let mut closed = false;
        while let Some(f) = state.scheduler.pop_due(INVULNERABILITY_MS) {
            if f.kind == TimerKind::InvulnerabilityEnd {
                on_end(&mut state);
                closed = true;
            }
        }
        assert!(closed);
        assert!(!state.player.invulnerable);
    }

    #[test]
    fn test_restart_while_open_does_not_extend() {
        let mut state = SimState::new(1, Tuning::default());
        let mut effects = Vec::new();
        start(&mut state, &mut effects);
        let pending = state.scheduler.len();
        start(&mut state, &mut effects);
        assert_eq!(state.scheduler.len(), pending);
    }

    #[test]
    fn test_blink_ends_visible() {
        let mut state = SimState::new(1, Tuning::default());
        let mut effects = Vec::new();
        start(&mut state, &mut effects);
        while let Some(f) = state.scheduler.pop_due(10_000) {
            match f.kind {
                TimerKind::Blink { remaining } => on_blink(&mut state, remaining, &mut effects),
                TimerKind::InvulnerabilityEnd => on_end(&mut state),
                _ => {}
            }
        }
        let alphas: Vec<f32> = effects
            .iter()
            .filter_map(|e| match e {
                Effect::SetAlpha { alpha, .. } => Some(*alpha),
                _ => None,
            })
            .collect();
        assert_eq!(alphas, vec![0.0, 1.0, 0.0, 1.0, 0.0, 1.0]);
        assert_eq!(state.player.alpha, 1.0);
    }
}
